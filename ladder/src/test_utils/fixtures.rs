//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::Utc;

use crate::app::rating_config::DEFAULT_INITIAL_RATING;
use crate::domain::entities::{Player, PlayerId};

/// Create an active player with a specific name at the default rating
pub fn test_player_named(name: &str) -> Player {
    let now = Utc::now();
    Player {
        id: PlayerId::new(),
        name: name.to_string(),
        nickname: None,
        is_active: true,
        current_rating: DEFAULT_INITIAL_RATING,
        created_at: now,
        updated_at: now,
    }
}

/// Create an active player with a specific rating
pub fn test_player_with_rating(rating: i32) -> Player {
    Player {
        current_rating: rating,
        ..test_player_named(&format!("player-{}", rating))
    }
}
