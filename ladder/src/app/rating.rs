//! Municipal VP rating computation
//!
//! Pure function from two ratings and an outcome to a pair of rating deltas.
//! One unsigned magnitude is computed per game and handed to both sides with
//! opposite signs, so every change is exactly zero-sum.

use serde::Serialize;

use crate::app::rating_config::{DRAW_VP_DIVISOR, FAVOURITE_VP_DIVISOR};
use crate::domain::entities::{MatchOutcome, RatingSystemConfig, VpTable, MAX_VP};

/// Rating deltas for both sides of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingChange {
    pub change_a: i32,
    pub change_b: i32,
    /// VP value the change was computed from
    pub vp: u32,
}

/// VP for a rating gap, falling back to `base_vp` on a malformed table.
///
/// Tables with a VP above [`MAX_VP`] are malformed; a `base_vp` above it is
/// reduced to [`MAX_VP`] with a warning.
pub fn lookup_vp(table: &VpTable, delta: u32, base_vp: u32) -> u32 {
    let base_vp = if base_vp > MAX_VP {
        tracing::warn!(base_vp, max = MAX_VP, "Base VP out of range, using the maximum");
        MAX_VP
    } else {
        base_vp
    };

    if let Err(err) = table.validate() {
        tracing::warn!(error = %err, delta, base_vp, "Malformed VP table, using base VP");
        return base_vp;
    }

    match table.band_for(delta) {
        Some(entry) => {
            tracing::debug!(delta, vp = entry.vp, "VP band matched");
            entry.vp
        }
        None => {
            tracing::debug!(delta, base_vp, "No VP band matched, using base VP");
            base_vp
        }
    }
}

/// `vp / 2` rounded half away from zero
fn favourite_share(vp: u32) -> u32 {
    vp / FAVOURITE_VP_DIVISOR + u32::from(vp % FAVOURITE_VP_DIVISOR * 2 >= FAVOURITE_VP_DIVISOR)
}

/// `ceil(vp / 4)`
fn draw_share(vp: u32) -> u32 {
    vp.div_ceil(DRAW_VP_DIVISOR)
}

/// Magnitudes never exceed `MAX_VP`, which fits in an `i32`
fn signed(magnitude: u32) -> i32 {
    i32::try_from(magnitude.min(MAX_VP)).unwrap_or(i32::MAX)
}

/// Points moved by a decisive game. A strictly higher-rated winner takes half
/// the VP; an equal or lower-rated winner takes all of it.
fn decisive_magnitude(vp: u32, winner_rating: i32, loser_rating: i32) -> i32 {
    if winner_rating > loser_rating {
        signed(favourite_share(vp))
    } else {
        signed(vp)
    }
}

/// Rating change for a single game between `a` and `b`
pub fn compute_rating_change(
    rating_a: i32,
    rating_b: i32,
    outcome: MatchOutcome,
    vp_table: &VpTable,
    base_vp: u32,
) -> RatingChange {
    let delta = rating_a.abs_diff(rating_b);
    let vp = lookup_vp(vp_table, delta, base_vp);

    let change_a = match outcome {
        MatchOutcome::DecisiveFirst => decisive_magnitude(vp, rating_a, rating_b),
        MatchOutcome::DecisiveSecond => -decisive_magnitude(vp, rating_b, rating_a),
        MatchOutcome::Draw => match rating_a.cmp(&rating_b) {
            std::cmp::Ordering::Greater => -signed(draw_share(vp)),
            std::cmp::Ordering::Less => signed(draw_share(vp)),
            std::cmp::Ordering::Equal => 0,
        },
    };

    RatingChange {
        change_a,
        change_b: -change_a,
        vp,
    }
}

/// [`compute_rating_change`] with the table and base VP from the settings
pub fn compute_with_config(
    rating_a: i32,
    rating_b: i32,
    outcome: MatchOutcome,
    config: &RatingSystemConfig,
) -> RatingChange {
    compute_rating_change(rating_a, rating_b, outcome, &config.vp_table, config.base_vp)
}

/// Post-hoc check that two deltas cancel out exactly
pub fn validate_zero_sum(change_a: i32, change_b: i32) -> bool {
    i64::from(change_a) + i64::from(change_b) == 0
}
