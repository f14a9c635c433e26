//! Map metadata model.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::record::null_as_default;

/// Category tag marking maps that can be beaten without jumping.
pub const ZERO_JUMP_CATEGORY: &str = "0 jump";

/// Physics mode of a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MapKind {
    Grav,
    Classic,
    #[default]
    Unknown,
}

impl MapKind {
    /// Parse case-insensitively; anything unrecognized is `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "grav" => MapKind::Grav,
            "classic" => MapKind::Classic,
            _ => MapKind::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for MapKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(MapKind::parse).unwrap_or_default())
    }
}

impl std::fmt::Display for MapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapKind::Grav => write!(f, "Grav"),
            MapKind::Classic => write!(f, "Classic"),
            MapKind::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Static metadata for one map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub map_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,

    #[serde(default)]
    pub grav_or_classic: MapKind,

    /// Free-form tags (e.g. "0 jump")
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,

    /// Difficulty rating, number or text upstream
    #[serde(default)]
    pub difficulty: Option<serde_json::Value>,

    /// Balls required to finish
    #[serde(default)]
    pub balls_req: Option<serde_json::Value>,

    /// Group preset used to launch the map
    #[serde(default)]
    pub preset: Option<String>,
}

impl MapMetadata {
    pub fn new(map_name: impl Into<String>, kind: MapKind) -> Self {
        Self {
            map_name: map_name.into(),
            grav_or_classic: kind,
            ..Default::default()
        }
    }

    /// Builder method to add a category tag.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn is_classic(&self) -> bool {
        self.grav_or_classic == MapKind::Classic
    }

    pub fn is_zero_jump(&self) -> bool {
        self.categories
            .iter()
            .any(|c| c.trim().eq_ignore_ascii_case(ZERO_JUMP_CATEGORY))
    }

    /// Whether jump records are tracked on this map.
    pub fn tracks_jumps(&self) -> bool {
        !self.is_classic() && !self.is_zero_jump()
    }
}

/// Map metadata keyed by map id.
pub type MapIndex = BTreeMap<String, MapMetadata>;
