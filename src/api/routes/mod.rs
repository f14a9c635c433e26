pub mod health;
pub mod leaderboards;
pub mod maps;
pub mod players;
pub mod refresh;
