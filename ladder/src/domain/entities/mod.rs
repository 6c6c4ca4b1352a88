//! Domain entities
//!
//! Pure domain models for players, ratings, ladder cycles and tournaments.

pub mod ladder;
pub mod outcome;
pub mod pairing;
pub mod player;
pub mod rating_entry;
pub mod tournament;
pub mod vp_table;

pub use ladder::{
    Color, ColorHistory, CycleStatus, Fortnight, LadderCycle, LadderCycleId, LadderMatch,
    LadderMatchId, NewLadderMatch,
};
pub use outcome::{MatchOutcome, TournamentResult};
pub use pairing::PairingResult;
pub use player::{NewPlayer, Player, PlayerId, Rated, RatedEntity};
pub use rating_entry::{NewRatingEntry, RatingEntry, RatingEntryId, RatingReason};
pub use tournament::{
    NewTournament, Round, RoundStatus, Standing, TiebreakCriterion, Tournament, TournamentId,
    TournamentMatch, TournamentMatchId, TournamentSettings, TournamentStatus,
};
pub use vp_table::{RatingSystemConfig, VpTable, VpTableEntry, VpTableError, MAX_VP};
