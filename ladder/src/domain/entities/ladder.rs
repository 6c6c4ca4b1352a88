//! Fortnightly ladder entities
//!
//! A ladder cycle spans half a month. During a cycle every active player is
//! paired once against a rank-determined opponent.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::outcome::MatchOutcome;
use super::player::PlayerId;

/// Unique identifier for a ladder cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LadderCycleId(pub Uuid);

impl LadderCycleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LadderCycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LadderCycleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Half of the month a cycle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fortnight {
    /// Days 1 to 15
    First,
    /// Day 16 to the end of the month
    Second,
}

impl Fortnight {
    pub fn from_date(date: NaiveDate) -> Self {
        if date.day() <= 15 {
            Fortnight::First
        } else {
            Fortnight::Second
        }
    }
}

/// Lifecycle of a ladder cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleStatus {
    Active,
    Completed,
    Cancelled,
}

impl std::fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleStatus::Active => write!(f, "active"),
            CycleStatus::Completed => write!(f, "completed"),
            CycleStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LadderCycle {
    pub id: LadderCycleId,
    pub month: u32,
    pub year: i32,
    pub fortnight: Fortnight,
    pub status: CycleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LadderCycle {
    /// A fresh active cycle for the fortnight containing `date`
    pub fn starting_on(date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: LadderCycleId::new(),
            month: date.month(),
            year: date.year(),
            fortnight: Fortnight::from_date(date),
            status: CycleStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == CycleStatus::Active
    }

    /// Short label such as "2/10/2026" (fortnight/month/year)
    pub fn label(&self) -> String {
        let half = match self.fortnight {
            Fortnight::First => 1,
            Fortnight::Second => 2,
        };
        format!("{}/{}/{}", half, self.month, self.year)
    }
}

/// Unique identifier for a ladder match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LadderMatchId(pub Uuid);

impl LadderMatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LadderMatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LadderMatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Piece colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// A ladder challenge between two players
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LadderMatch {
    pub id: LadderMatchId,
    pub cycle_id: LadderCycleId,
    pub white_id: PlayerId,
    pub black_id: PlayerId,
    /// 1-based ranking positions when the match was created
    pub white_position: usize,
    pub black_position: usize,
    pub white_rating_snapshot: i32,
    pub black_rating_snapshot: i32,
    /// Always the worse-ranked player
    pub responsible_id: PlayerId,
    pub outcome: Option<MatchOutcome>,
    pub vp_used: Option<u32>,
    pub applied_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LadderMatch {
    pub fn is_resolved(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn involves(&self, player: &PlayerId) -> bool {
        self.white_id == *player || self.black_id == *player
    }
}

/// Data needed to create a ladder match
#[derive(Debug, Clone)]
pub struct NewLadderMatch {
    pub cycle_id: LadderCycleId,
    pub white_id: PlayerId,
    pub black_id: PlayerId,
    pub white_position: usize,
    pub black_position: usize,
    pub white_rating_snapshot: i32,
    pub black_rating_snapshot: i32,
    pub responsible_id: PlayerId,
}

/// Last colours used when two players met in the ladder
///
/// Stored with the pair in canonical order (`player_a < player_b`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorHistory {
    pub player_a: PlayerId,
    pub player_b: PlayerId,
    pub last_color_of_a: Color,
    pub updated_at: DateTime<Utc>,
}

impl ColorHistory {
    pub fn new(white: PlayerId, black: PlayerId) -> Self {
        let (player_a, player_b, last_color_of_a) = if white <= black {
            (white, black, Color::White)
        } else {
            (black, white, Color::Black)
        };
        Self {
            player_a,
            player_b,
            last_color_of_a,
            updated_at: Utc::now(),
        }
    }

    pub fn last_color_of(&self, player: &PlayerId) -> Option<Color> {
        if self.player_a == *player {
            Some(self.last_color_of_a)
        } else if self.player_b == *player {
            Some(self.last_color_of_a.opposite())
        } else {
            None
        }
    }
}
