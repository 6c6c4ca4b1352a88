//! Maximum-distance pairing
//!
//! Sorts players by rating and pairs rank 1 with the last rank, rank 2 with the
//! second-last, and so on. Used for ladder cycles and tournament first rounds.

use crate::domain::entities::{PairingResult, Rated};

/// Indices of `entities` in descending rating order.
///
/// The sort is stable, so players with equal ratings keep the order in which
/// the caller supplied them.
fn ranked_indices<T: Rated>(entities: &[T]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..entities.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(entities[i].rating()));
    order
}

/// Pair players for a ladder cycle or a tournament's first round.
///
/// Returns an empty list for fewer than two players. With an odd count the
/// middle-ranked player is left out (see [`middle_unpaired`]).
pub fn generate_pairings<T: Rated>(entities: &[T]) -> Vec<PairingResult> {
    if entities.len() < 2 {
        return Vec::new();
    }

    let order = ranked_indices(entities);
    let len = order.len();

    (0..len / 2)
        .map(|rank| {
            let opponent_rank = len - 1 - rank;
            let first = &entities[order[rank]];
            let second = &entities[order[opponent_rank]];

            PairingResult {
                first: first.id(),
                second: second.id(),
                first_rating: first.rating(),
                second_rating: second.rating(),
                first_rank: rank,
                second_rank: opponent_rank,
                delta: first.rating().abs_diff(second.rating()),
            }
        })
        .collect()
}

/// The player left without an opponent when the count is odd
pub fn middle_unpaired<T: Rated>(entities: &[T]) -> Option<&T> {
    if entities.len() % 2 == 0 {
        return None;
    }
    let order = ranked_indices(entities);
    Some(&entities[order[entities.len() / 2]])
}
