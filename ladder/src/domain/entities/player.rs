//! Player domain entity
//!
//! A club member holding a rating. The pure pairing and rating code only sees
//! players through the [`Rated`] trait and never mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PlayerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything that can be paired by rating
pub trait Rated {
    fn id(&self) -> PlayerId;
    fn rating(&self) -> i32;
}

/// Minimal rating-bearing entity: an id plus a rating snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatedEntity {
    pub id: PlayerId,
    pub rating: i32,
}

impl RatedEntity {
    pub fn new(id: PlayerId, rating: i32) -> Self {
        Self { id, rating }
    }
}

impl Rated for RatedEntity {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn rating(&self) -> i32 {
        self.rating
    }
}

/// A registered club player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub nickname: Option<String>,
    pub is_active: bool,
    pub current_rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Snapshot of this player as a plain rated entity
    pub fn as_rated(&self) -> RatedEntity {
        RatedEntity::new(self.id, self.current_rating)
    }

    /// Name shown in listings, preferring the nickname
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.name)
    }
}

impl Rated for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn rating(&self) -> i32 {
        self.current_rating
    }
}

/// Data needed to register a new player
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub name: String,
    pub nickname: Option<String>,
    /// Falls back to the configured default rating when absent
    pub initial_rating: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_player(nickname: Option<&str>) -> Player {
        Player {
            id: PlayerId::new(),
            name: "Maria Souza".to_string(),
            nickname: nickname.map(str::to_string),
            is_active: true,
            current_rating: 1750,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn display_name_prefers_nickname() {
        assert_eq!(make_player(Some("Mari")).display_name(), "Mari");
        assert_eq!(make_player(None).display_name(), "Maria Souza");
    }

    #[test]
    fn as_rated_snapshots_current_rating() {
        let player = make_player(None);
        let rated = player.as_rated();
        assert_eq!(rated.id, player.id);
        assert_eq!(rated.rating, 1750);
        assert_eq!(Rated::rating(&player), 1750);
    }

    #[test]
    fn player_id_display() {
        let id = PlayerId(Uuid::nil());
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000000");
    }
}
