//! Ladder core
//!
//! Rating core of a chess club: maximum-distance pairing for ladder cycles and
//! tournament first rounds, and the municipal VP rating update.
//! Uses hexagonal (ports & adapters) architecture; storage is supplied by the
//! caller through the traits in [`domain::ports`].

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod telemetry;

#[cfg(test)]
mod test_utils;

pub use app::{
    compute_rating_change, compute_with_config, generate_pairings, validate_zero_sum,
    RatingChange,
};
pub use config::Config;
pub use domain::entities::{MatchOutcome, PairingResult, Rated, RatedEntity, VpTable, VpTableEntry};
pub use error::{AppError, DomainError};
