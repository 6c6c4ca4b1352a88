//! Pairing result
//!
//! One board produced by the pairing generator, frozen at pairing time.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// An ordered pair of players with their rating snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingResult {
    pub first: PlayerId,
    pub second: PlayerId,
    pub first_rating: i32,
    pub second_rating: i32,
    /// 0-based rank in the rating-sorted input
    pub first_rank: usize,
    pub second_rank: usize,
    /// `|first_rating - second_rating|`
    pub delta: u32,
}

impl PairingResult {
    pub fn involves(&self, player: &PlayerId) -> bool {
        self.first == *player || self.second == *player
    }
}
