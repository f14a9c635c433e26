//! Core data models for the leaderboard engine.

mod ids;
mod leaderboard;
mod map;
mod record;
mod snapshot;
mod summary;

pub use ids::*;
pub use leaderboard::*;
pub use map::*;
pub use record::*;
pub use snapshot::*;
pub use summary::*;
