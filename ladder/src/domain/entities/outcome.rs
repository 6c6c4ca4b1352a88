//! Match outcomes
//!
//! Results are a closed set of variants internally. The "1-0" / "0-1" / "0-0"
//! labels only exist at the boundary through `Display` and `FromStr`.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Terminal result of a rated game between a first and a second player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// "1-0"
    DecisiveFirst,
    /// "0-1"
    DecisiveSecond,
    /// "0-0"
    Draw,
}

impl MatchOutcome {
    /// The same result seen from the other side of the board
    pub fn mirrored(self) -> Self {
        match self {
            MatchOutcome::DecisiveFirst => MatchOutcome::DecisiveSecond,
            MatchOutcome::DecisiveSecond => MatchOutcome::DecisiveFirst,
            MatchOutcome::Draw => MatchOutcome::Draw,
        }
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchOutcome::DecisiveFirst => write!(f, "1-0"),
            MatchOutcome::DecisiveSecond => write!(f, "0-1"),
            MatchOutcome::Draw => write!(f, "0-0"),
        }
    }
}

impl std::str::FromStr for MatchOutcome {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1-0" => Ok(MatchOutcome::DecisiveFirst),
            "0-1" => Ok(MatchOutcome::DecisiveSecond),
            "0-0" | "½-½" | "1/2-1/2" => Ok(MatchOutcome::Draw),
            other => Err(ParseError::UnknownOutcome(other.to_string())),
        }
    }
}

/// Result of a tournament game, including walkovers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentResult {
    WhiteWins,
    BlackWins,
    Draw,
    /// Black did not show up
    WalkoverWhite,
    /// White did not show up
    WalkoverBlack,
}

impl TournamentResult {
    pub fn is_walkover(self) -> bool {
        matches!(
            self,
            TournamentResult::WalkoverWhite | TournamentResult::WalkoverBlack
        )
    }

    /// Board points for (white, black)
    pub fn scores(self) -> (f64, f64) {
        match self {
            TournamentResult::WhiteWins | TournamentResult::WalkoverWhite => (1.0, 0.0),
            TournamentResult::BlackWins | TournamentResult::WalkoverBlack => (0.0, 1.0),
            TournamentResult::Draw => (0.5, 0.5),
        }
    }

    /// Rated outcome, `None` for walkovers which never move ratings
    pub fn rated_outcome(self) -> Option<MatchOutcome> {
        match self {
            TournamentResult::WhiteWins => Some(MatchOutcome::DecisiveFirst),
            TournamentResult::BlackWins => Some(MatchOutcome::DecisiveSecond),
            TournamentResult::Draw => Some(MatchOutcome::Draw),
            TournamentResult::WalkoverWhite | TournamentResult::WalkoverBlack => None,
        }
    }
}

impl std::fmt::Display for TournamentResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentResult::WhiteWins => write!(f, "A"),
            TournamentResult::BlackWins => write!(f, "B"),
            TournamentResult::Draw => write!(f, "E"),
            TournamentResult::WalkoverWhite => write!(f, "WO_A"),
            TournamentResult::WalkoverBlack => write!(f, "WO_B"),
        }
    }
}

impl std::str::FromStr for TournamentResult {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" | "WHITE" => Ok(TournamentResult::WhiteWins),
            "B" | "BLACK" => Ok(TournamentResult::BlackWins),
            "E" | "DRAW" => Ok(TournamentResult::Draw),
            "WO_A" => Ok(TournamentResult::WalkoverWhite),
            "WO_B" => Ok(TournamentResult::WalkoverBlack),
            _ => Err(ParseError::UnknownResult(s.to_string())),
        }
    }
}
