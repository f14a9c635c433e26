//! Player identity resolution.
//!
//! Leaderboards key players by [`IdentityKey`]: every anonymous
//! "Some Ball" collapses into one bucket, registered players are keyed
//! by user id, and guests by their exact name. Profile lookups go
//! through [`merge`] instead, which matches loosely (trimmed,
//! lowercase) and understands configured alias groups.

pub mod merge;

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{IdentityKey, PlayerRef, ANONYMOUS_LABEL};

pub use merge::{resolve_merge_group, EffectiveIdentity, MergeGroup, MergeGroups};

fn anonymous_name() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^Some Ball(?:\s*\d+)?$").unwrap())
}

/// Whether a name is one of the game's placeholder "Some Ball" names.
pub fn is_anonymous_name(name: &str) -> bool {
    anonymous_name().is_match(name)
}

/// Leaderboard key for a player slot.
pub fn resolve_key(player: &PlayerRef) -> IdentityKey {
    if is_anonymous_name(&player.name) {
        return IdentityKey::Anonymous;
    }
    match player.user_id() {
        Some(id) => IdentityKey::user_id(id),
        None => IdentityKey::name(player.name.as_str()),
    }
}

/// Name shown on leaderboards for a player slot.
pub fn resolve_display_name(player: &PlayerRef) -> &str {
    if is_anonymous_name(&player.name) {
        ANONYMOUS_LABEL
    } else {
        &player.name
    }
}

/// Whether the slot can be linked to a profile page.
pub fn has_stable_identity(player: &PlayerRef) -> bool {
    player.user_id().is_some() && !is_anonymous_name(&player.name)
}

/// Normalize a name or id for loose comparison.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
