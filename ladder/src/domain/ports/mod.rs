//! Domain ports (traits)
//!
//! Port traits define the storage interfaces the services require.
//! The caller's data store provides concrete implementations.

pub mod repositories;

pub use repositories::{
    ColorHistoryRepository, LadderCycleRepository, LadderMatchRepository, PlayerRepository,
    RatingEntryRepository, TournamentRepository,
};
