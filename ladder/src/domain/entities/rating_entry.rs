//! Rating history entity
//!
//! Provides an audit trail for every rating change of a player.
//! Corrections never delete entries; they append a reversal instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::player::PlayerId;

/// Unique identifier for a rating history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RatingEntryId(pub Uuid);

impl RatingEntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RatingEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for RatingEntryId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RatingEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a rating changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingReason {
    /// Result of a fortnightly ladder challenge
    LadderChallenge,
    /// Result of a tournament game
    Tournament,
    /// Inverse of an earlier change that was corrected
    Reversal,
    /// Manual correction by the administrator
    Adjustment,
}

impl std::fmt::Display for RatingReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingReason::LadderChallenge => write!(f, "ladder_challenge"),
            RatingReason::Tournament => write!(f, "tournament"),
            RatingReason::Reversal => write!(f, "reversal"),
            RatingReason::Adjustment => write!(f, "adjustment"),
        }
    }
}

impl std::str::FromStr for RatingReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ladder_challenge" => Ok(RatingReason::LadderChallenge),
            "tournament" => Ok(RatingReason::Tournament),
            "reversal" => Ok(RatingReason::Reversal),
            "adjustment" => Ok(RatingReason::Adjustment),
            _ => Err(format!("Unknown rating reason: {}", s)),
        }
    }
}

/// A recorded rating change
#[derive(Debug, Clone, Serialize)]
pub struct RatingEntry {
    pub id: RatingEntryId,
    pub player_id: PlayerId,
    pub previous_rating: i32,
    pub new_rating: i32,
    pub variation: i32,
    pub reason: RatingReason,
    /// Match that caused the change (ladder or tournament match id)
    pub reference_id: Option<Uuid>,
    /// For reversals, the entry being undone
    pub reverses: Option<RatingEntryId>,
    pub created_at: DateTime<Utc>,
}

impl RatingEntry {
    pub fn is_reversal(&self) -> bool {
        self.reason == RatingReason::Reversal
    }
}

/// Data needed to record a rating change
#[derive(Debug, Clone)]
pub struct NewRatingEntry {
    pub player_id: PlayerId,
    pub previous_rating: i32,
    pub new_rating: i32,
    pub variation: i32,
    pub reason: RatingReason,
    pub reference_id: Option<Uuid>,
    pub reverses: Option<RatingEntryId>,
}
