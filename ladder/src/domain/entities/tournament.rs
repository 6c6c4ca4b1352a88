//! Tournament domain entities
//!
//! A tournament owns its rounds and matches. Standings are derived from the
//! recorded results and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::outcome::TournamentResult;
use super::player::PlayerId;

/// Unique identifier for a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TournamentId(pub Uuid);

impl TournamentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TournamentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TournamentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a tournament match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TournamentMatchId(pub Uuid);

impl TournamentMatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TournamentMatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TournamentMatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    Draft,
    Active,
    Completed,
}

impl std::fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentStatus::Draft => write!(f, "draft"),
            TournamentStatus::Active => write!(f, "active"),
            TournamentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Ordering rules applied to players tied on points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiebreakCriterion {
    /// Higher rating at the start of the tournament first
    InitialRating,
    /// Winner of the direct game first
    HeadToHead,
    /// Random draw
    Random,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSettings {
    /// Points awarded for a bye, 1.0 or 0.5
    pub bye_points: f64,
    /// Whether walkover results may be recorded
    pub allow_no_show: bool,
    pub tiebreak_criteria: Vec<TiebreakCriterion>,
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            bye_points: 1.0,
            allow_no_show: true,
            tiebreak_criteria: vec![
                TiebreakCriterion::InitialRating,
                TiebreakCriterion::HeadToHead,
                TiebreakCriterion::Random,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    Pending,
    Completed,
}

/// One board of a round, or a bye
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentMatch {
    pub id: TournamentMatchId,
    pub table_number: u32,
    pub white_id: PlayerId,
    /// `None` for a bye
    pub black_id: Option<PlayerId>,
    pub white_rating_snapshot: i32,
    pub black_rating_snapshot: Option<i32>,
    pub result: Option<TournamentResult>,
    pub white_score: f64,
    pub black_score: f64,
    pub vp_used: Option<u32>,
    /// Rating change applied to white (black got the negation)
    pub rating_delta: Option<i32>,
}

impl TournamentMatch {
    pub fn is_bye(&self) -> bool {
        self.black_id.is_none()
    }

    /// A bye counts as resolved as soon as it is created
    pub fn is_resolved(&self) -> bool {
        self.is_bye() || self.result.is_some()
    }

    pub fn involves(&self, player: &PlayerId) -> bool {
        self.white_id == *player || self.black_id == Some(*player)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub number: u32,
    pub status: RoundStatus,
    pub matches: Vec<TournamentMatch>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Round {
    pub fn all_resolved(&self) -> bool {
        self.matches.iter().all(TournamentMatch::is_resolved)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    pub participants: Vec<PlayerId>,
    /// Participants who checked in; only they get paired
    pub present_players: Vec<PlayerId>,
    /// Participant ratings when the tournament started
    pub initial_ratings: Vec<(PlayerId, i32)>,
    pub rounds: Vec<Round>,
    pub settings: TournamentSettings,
    pub created_at: DateTime<Utc>,
    /// Bumped on every save; writers must present the version they loaded
    #[serde(default)]
    pub version: u64,
}

impl Tournament {
    pub fn find_match(&self, id: &TournamentMatchId) -> Option<(usize, usize)> {
        self.rounds.iter().enumerate().find_map(|(r, round)| {
            round
                .matches
                .iter()
                .position(|m| m.id == *id)
                .map(|m| (r, m))
        })
    }

    pub fn initial_rating_of(&self, player: &PlayerId) -> Option<i32> {
        self.initial_ratings
            .iter()
            .find(|(id, _)| id == player)
            .map(|(_, rating)| *rating)
    }
}

/// Data needed to create a tournament
#[derive(Debug, Clone)]
pub struct NewTournament {
    pub name: String,
    pub participants: Vec<PlayerId>,
    pub settings: TournamentSettings,
}

/// A row of the tournament standings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub player_name: String,
    pub rating: i32,
    pub initial_rating: i32,
    pub points: f64,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub opponents: Vec<PlayerId>,
    /// 1-based
    pub position: usize,
}
