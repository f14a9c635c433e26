//! Leaderboard models.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::IdentityKey;

/// The stat a record is ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    /// Fastest completion time
    Speed,
    /// Fewest jumps
    Jump,
}

impl std::fmt::Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatKind::Speed => write!(f, "speed"),
            StatKind::Jump => write!(f, "jump"),
        }
    }
}

impl FromStr for StatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "speed" => Ok(StatKind::Speed),
            "jump" | "jumps" => Ok(StatKind::Jump),
            other => Err(format!("unknown stat: {}", other)),
        }
    }
}

/// Leaderboard category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Every finished record counts
    GamesCompleted,
    /// Distinct maps finished
    UniqueMapsCompleted,
    /// Every player on a best record
    Overall,
    /// Players on solo best records
    Solo,
    /// The capping player on a best record
    Capping,
}

/// Stable identifier of one board in a [`LeaderboardSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardId {
    GamesCompleted,
    UniqueMaps,
    Speed(Category),
    Jump(Category),
    Combined(Category),
}

impl BoardId {
    /// Every board, in display order.
    pub const ALL: [BoardId; 11] = [
        BoardId::Speed(Category::Overall),
        BoardId::Speed(Category::Solo),
        BoardId::Speed(Category::Capping),
        BoardId::Jump(Category::Overall),
        BoardId::Jump(Category::Solo),
        BoardId::Jump(Category::Capping),
        BoardId::Combined(Category::Overall),
        BoardId::Combined(Category::Solo),
        BoardId::Combined(Category::Capping),
        BoardId::GamesCompleted,
        BoardId::UniqueMaps,
    ];

    /// Human-readable board title.
    pub fn title(&self) -> &'static str {
        match self {
            BoardId::GamesCompleted => "Games Completed",
            BoardId::UniqueMaps => "Unique Maps Completed",
            BoardId::Speed(Category::Solo) => "Solo Speed Records",
            BoardId::Speed(Category::Capping) => "Capping Speed Records",
            BoardId::Speed(_) => "Overall Speed Records",
            BoardId::Jump(Category::Solo) => "Solo Jump Records",
            BoardId::Jump(Category::Capping) => "Capping Jump Records",
            BoardId::Jump(_) => "Overall Jump Records",
            BoardId::Combined(Category::Solo) => "Overall Solo Records",
            BoardId::Combined(Category::Capping) => "Overall Capping Records",
            BoardId::Combined(_) => "Overall Records (Speed + Jumps)",
        }
    }
}

impl std::fmt::Display for BoardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suffix = |c: &Category| match c {
            Category::Solo => "solo",
            Category::Capping => "capping",
            _ => "overall",
        };
        match self {
            BoardId::GamesCompleted => write!(f, "games-completed"),
            BoardId::UniqueMaps => write!(f, "unique-maps"),
            BoardId::Speed(c) => write!(f, "speed-{}", suffix(c)),
            BoardId::Jump(c) => write!(f, "jump-{}", suffix(c)),
            BoardId::Combined(c) => write!(f, "combined-{}", suffix(c)),
        }
    }
}

impl FromStr for BoardId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        BoardId::ALL
            .into_iter()
            .find(|b| b.to_string() == wanted)
            .ok_or_else(|| format!("unknown leaderboard: {}", s))
    }
}

/// One identity's row on a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// Identity key the score is credited to
    pub key: IdentityKey,

    /// First-seen display name
    pub name: String,

    pub score: u32,

    /// User id, when the identity is stable enough to link to a profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Whether the identity carries a real user id
    pub has_player_id: bool,
}

/// Scores keyed by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: BTreeMap<IdentityKey, LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: BTreeMap<IdentityKey, LeaderboardEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &IdentityKey) -> Option<&LeaderboardEntry> {
        self.entries.get(key)
    }

    /// Score for an identity (0 when absent).
    pub fn score(&self, key: &IdentityKey) -> u32 {
        self.entries.get(key).map(|e| e.score).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LeaderboardEntry> {
        self.entries.values()
    }

    /// Sum of all scores.
    pub fn total(&self) -> u32 {
        self.entries.values().map(|e| e.score).sum()
    }

    /// Entries by score (descending), then name, then key.
    pub fn ranked(&self) -> Vec<&LeaderboardEntry> {
        let mut sorted: Vec<_> = self.entries.values().collect();
        sorted.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.key.cmp(&b.key))
        });
        sorted
    }

    /// Add another board's scores into this one. Existing names are kept.
    pub fn absorb(&mut self, other: &Leaderboard) {
        for (key, entry) in &other.entries {
            self.entries
                .entry(key.clone())
                .and_modify(|e| e.score += entry.score)
                .or_insert_with(|| entry.clone());
        }
    }
}

/// The overall, solo and capping boards for one stat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatBoards {
    pub overall: Leaderboard,
    pub solo: Leaderboard,
    pub capping: Leaderboard,
}

impl StatBoards {
    /// Speed and jump boards summed per identity.
    pub fn combine(speed: &StatBoards, jump: &StatBoards) -> StatBoards {
        let merge = |a: &Leaderboard, b: &Leaderboard| {
            let mut out = a.clone();
            out.absorb(b);
            out
        };
        StatBoards {
            overall: merge(&speed.overall, &jump.overall),
            solo: merge(&speed.solo, &jump.solo),
            capping: merge(&speed.capping, &jump.capping),
        }
    }
}

fn pick(boards: &StatBoards, category: Category) -> &Leaderboard {
    match category {
        Category::Solo => &boards.solo,
        Category::Capping => &boards.capping,
        _ => &boards.overall,
    }
}

/// Every leaderboard computed from one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderboardSet {
    pub games_completed: Leaderboard,
    pub unique_maps_completed: Leaderboard,
    pub speed: StatBoards,
    pub jump: StatBoards,
    pub combined: StatBoards,
}

impl LeaderboardSet {
    /// Look up a board by id.
    pub fn board(&self, id: BoardId) -> &Leaderboard {
        match id {
            BoardId::GamesCompleted => &self.games_completed,
            BoardId::UniqueMaps => &self.unique_maps_completed,
            BoardId::Speed(c) => pick(&self.speed, c),
            BoardId::Jump(c) => pick(&self.jump, c),
            BoardId::Combined(c) => pick(&self.combined, c),
        }
    }
}
