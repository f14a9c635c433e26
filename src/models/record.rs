//! Session record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A player slot on a session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    /// In-game name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Registered user id (absent for guests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl PlayerRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user_id: None,
        }
    }

    /// Builder method to set the user id.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// The user id, treating an empty string as absent.
    pub fn user_id(&self) -> Option<&str> {
        non_empty(self.user_id.as_deref())
    }
}

/// One completed or attempted game round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Replay uuid
    pub uuid: String,

    /// Map identifier (string or number upstream)
    #[serde(deserialize_with = "string_or_number")]
    pub map_id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub map_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub map_author: String,

    /// When the round was played
    pub timestamp: DateTime<Utc>,

    /// Completion time in milliseconds (None = did not finish)
    #[serde(default)]
    pub record_time: Option<u64>,

    /// Jumps used
    #[serde(default)]
    pub total_jumps: Option<u32>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub is_solo: bool,

    /// Name of the player who capped
    #[serde(default)]
    pub capping_player: Option<String>,

    #[serde(default)]
    pub capping_player_user_id: Option<String>,

    /// Participants in encounter order
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<PlayerRef>,
}

impl SessionRecord {
    /// Create a new record with no stats and no players.
    pub fn new(uuid: impl Into<String>, map_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            uuid: uuid.into(),
            map_id: map_id.into(),
            map_name: String::new(),
            map_author: String::new(),
            timestamp,
            record_time: None,
            total_jumps: None,
            is_solo: false,
            capping_player: None,
            capping_player_user_id: None,
            players: Vec::new(),
        }
    }

    /// Builder method to set map name and author.
    pub fn with_map(mut self, name: impl Into<String>, author: impl Into<String>) -> Self {
        self.map_name = name.into();
        self.map_author = author.into();
        self
    }

    /// Builder method to set the completion time.
    pub fn with_time(mut self, record_time: u64) -> Self {
        self.record_time = Some(record_time);
        self
    }

    /// Builder method to set the jump count.
    pub fn with_jumps(mut self, total_jumps: u32) -> Self {
        self.total_jumps = Some(total_jumps);
        self
    }

    pub fn solo(mut self) -> Self {
        self.is_solo = true;
        self
    }

    /// Builder method to set the capping player.
    pub fn with_capper(mut self, player: PlayerRef) -> Self {
        self.capping_player = Some(player.name);
        self.capping_player_user_id = player.user_id;
        self
    }

    /// Builder method to append a player.
    pub fn with_player(mut self, player: PlayerRef) -> Self {
        self.players.push(player);
        self
    }

    /// Whether the round finished (has a completion time).
    pub fn is_completed(&self) -> bool {
        self.record_time.is_some()
    }

    /// The capping player as a synthetic player slot.
    pub fn capping_ref(&self) -> Option<PlayerRef> {
        let name = non_empty(self.capping_player.as_deref())?;
        Some(PlayerRef {
            name: name.to_string(),
            user_id: non_empty(self.capping_player_user_id.as_deref()).map(str::to_string),
        })
    }

    /// Every slot on the record: players first, then the capping slot.
    pub fn all_slots(&self) -> Vec<PlayerRef> {
        let mut slots = self.players.clone();
        slots.extend(self.capping_ref());
        slots
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Deserialize an explicit `null` the same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserialization() {
        let json = r#"{
            "uuid": "abc",
            "map_id": 94012,
            "map_name": "Gravity Falls",
            "map_author": "Ko",
            "timestamp": "2025-03-01T12:00:00Z",
            "record_time": 61234,
            "total_jumps": null,
            "is_solo": false,
            "capping_player": "Bob",
            "capping_player_user_id": "u1",
            "players": [{"name": "Bob", "user_id": "u1"}, {"name": "Some Ball 3"}]
        }"#;

        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.map_id, "94012");
        assert_eq!(record.record_time, Some(61234));
        assert_eq!(record.total_jumps, None);
        assert_eq!(record.players.len(), 2);
        assert_eq!(record.players[1].user_id, None);
    }

    #[test]
    fn test_record_minimal_fields() {
        let json = r#"{"uuid": "x", "map_id": "m1", "timestamp": "2025-01-01T00:00:00Z"}"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();

        assert!(!record.is_completed());
        assert!(!record.is_solo);
        assert!(record.players.is_empty());
        assert!(record.capping_ref().is_none());
    }

    #[test]
    fn test_record_null_fields_read_as_defaults() {
        let json = r#"{
            "uuid": "n1",
            "map_id": "m1",
            "map_name": null,
            "map_author": null,
            "timestamp": "2025-01-01T00:00:00Z",
            "record_time": 4200,
            "is_solo": null,
            "capping_player": null,
            "players": null
        }"#;

        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.map_name, "");
        assert_eq!(record.map_author, "");
        assert!(!record.is_solo);
        assert!(record.players.is_empty());
        assert!(record.is_completed());

        let player: PlayerRef = serde_json::from_str(r#"{"name": null, "user_id": "u7"}"#).unwrap();
        assert_eq!(player.name, "");
        assert_eq!(player.user_id(), Some("u7"));
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let record = SessionRecord {
            capping_player: Some("Bob".to_string()),
            capping_player_user_id: Some(String::new()),
            ..SessionRecord::new("a", "m1", Utc::now())
        };
        assert_eq!(record.capping_ref(), Some(PlayerRef::new("Bob")));

        let blank = SessionRecord {
            capping_player: Some(String::new()),
            ..SessionRecord::new("b", "m1", Utc::now())
        };
        assert!(blank.capping_ref().is_none());

        let player = PlayerRef::new("Eve").with_user_id("");
        assert_eq!(player.user_id(), None);
    }

    #[test]
    fn test_all_slots_appends_capper() {
        let record = SessionRecord::new("a", "m1", Utc::now())
            .with_player(PlayerRef::new("Ann"))
            .with_capper(PlayerRef::new("Bob").with_user_id("u1"));

        let slots = record.all_slots();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].user_id(), Some("u1"));
    }
}
