//! Application layer
//!
//! Pure pairing and rating functions plus the services that apply them
//! through the repository ports.

pub mod ladder_service;
pub mod pairing;
pub mod ranking_service;
pub mod rating;
pub mod rating_config;
pub mod rating_service;
pub mod tournament_service;

pub use ladder_service::{LadderResult, LadderService};
pub use pairing::{generate_pairings, middle_unpaired};
pub use ranking_service::{current_ranking, RankingService};
pub use rating::{
    compute_rating_change, compute_with_config, lookup_vp, validate_zero_sum, RatingChange,
};
pub use rating_config::*;
pub use rating_service::{RatingChangeResult, RatingService};
pub use tournament_service::{RecordedResult, TournamentService};
