//! Player identity keys.

use serde::{Serialize, Serializer};
use std::fmt;

/// Label shared by every anonymous ("Some Ball N") player.
pub const ANONYMOUS_LABEL: &str = "Some Balls";

/// The key two player references must share to count as the same person.
///
/// Ids and bare names live in separate variants so a name can never
/// collide with somebody else's user id.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdentityKey {
    /// Every anonymous player, regardless of user id.
    Anonymous,
    /// A registered player, keyed by user id.
    UserId(String),
    /// A player without a user id, keyed by exact name.
    Name(String),
}

impl IdentityKey {
    pub fn user_id(id: impl Into<String>) -> Self {
        Self::UserId(id.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        match self {
            IdentityKey::Anonymous => ANONYMOUS_LABEL,
            IdentityKey::UserId(id) => id,
            IdentityKey::Name(name) => name,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, IdentityKey::Anonymous)
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Debug for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKey::Anonymous => write!(f, "IdentityKey(anonymous)"),
            IdentityKey::UserId(id) => write!(f, "IdentityKey(id:{})", id),
            IdentityKey::Name(name) => write!(f, "IdentityKey(name:{})", name),
        }
    }
}

impl Serialize for IdentityKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
