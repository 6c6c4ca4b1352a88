//! Rating configuration constants
//!
//! Defaults of the municipal VP system and player registration.

use crate::domain::entities::{RatingSystemConfig, VpTable, VpTableEntry};

/// Rating given to a new player when none is supplied
pub const DEFAULT_INITIAL_RATING: i32 = 1200;

/// VP used when the table is malformed or no band matches
pub const DEFAULT_BASE_VP: u32 = 20;

/// A draw moves `ceil(vp / DRAW_VP_DIVISOR)` points from the favourite
pub const DRAW_VP_DIVISOR: u32 = 4;

/// An expected win moves `vp / FAVOURITE_VP_DIVISOR` points, rounded half away from zero
pub const FAVOURITE_VP_DIVISOR: u32 = 2;

/// Municipal VP table bands as (min_delta, max_delta, vp); `None` is unbounded
pub const MUNICIPAL_VP_BANDS: [(u32, Option<u32>, u32); 8] = [
    (0, Some(9), 20),
    (10, Some(24), 22),
    (25, Some(49), 24),
    (50, Some(99), 28),
    (100, Some(149), 32),
    (150, Some(199), 36),
    (200, Some(299), 40),
    (300, None, 44),
];

pub fn municipal_vp_table() -> VpTable {
    MUNICIPAL_VP_BANDS
        .iter()
        .map(|&(min_delta, max_delta, vp)| VpTableEntry {
            min_delta,
            max_delta,
            vp,
        })
        .collect::<Vec<_>>()
        .into()
}

impl Default for RatingSystemConfig {
    fn default() -> Self {
        Self {
            vp_table: municipal_vp_table(),
            base_vp: DEFAULT_BASE_VP,
            zero_sum_check: true,
        }
    }
}
