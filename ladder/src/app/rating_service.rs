//! Rating ledger service
//!
//! All rating modifications flow through this service so that every change is
//! written with a compare-and-swap on the stored rating and recorded in the
//! player's rating history.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{
    NewRatingEntry, PlayerId, RatingEntry, RatingEntryId, RatingReason,
};
use crate::domain::ports::{PlayerRepository, RatingEntryRepository};
use crate::error::{AppError, DomainError};

/// Result of a rating change operation
#[derive(Debug, Clone)]
pub struct RatingChangeResult {
    pub player_id: PlayerId,
    pub old_rating: i32,
    pub new_rating: i32,
    pub delta: i32,
    pub reason: RatingReason,
    pub entry: RatingEntry,
}

pub struct RatingService<PR, RER>
where
    PR: PlayerRepository,
    RER: RatingEntryRepository,
{
    players: Arc<PR>,
    entries: Arc<RER>,
}

impl<PR, RER> RatingService<PR, RER>
where
    PR: PlayerRepository,
    RER: RatingEntryRepository,
{
    pub fn new(players: Arc<PR>, entries: Arc<RER>) -> Self {
        Self { players, entries }
    }

    /// Apply a rating delta to a player with full audit logging.
    ///
    /// Fails with `DomainError::Conflict` if the stored rating changed between
    /// the read and the write; nothing is recorded in that case.
    pub async fn apply_change(
        &self,
        player_id: &PlayerId,
        delta: i32,
        reason: RatingReason,
        reference_id: Option<Uuid>,
    ) -> Result<RatingChangeResult, AppError> {
        self.write_change(player_id, delta, reason, reference_id, None)
            .await
    }

    async fn write_change(
        &self,
        player_id: &PlayerId,
        delta: i32,
        reason: RatingReason,
        reference_id: Option<Uuid>,
        reverses: Option<RatingEntryId>,
    ) -> Result<RatingChangeResult, AppError> {
        let player = self
            .players
            .find_by_id(player_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Player not found: {}", player_id)))?;

        let old_rating = player.current_rating;
        let new_rating = old_rating.checked_add(delta).ok_or_else(|| {
            DomainError::Validation(format!(
                "Rating overflow: {} {:+} for player {}",
                old_rating, delta, player_id
            ))
        })?;

        self.players
            .compare_and_set_rating(player_id, old_rating, new_rating)
            .await?;

        let entry = self
            .entries
            .create(&NewRatingEntry {
                player_id: *player_id,
                previous_rating: old_rating,
                new_rating,
                variation: delta,
                reason,
                reference_id,
                reverses,
            })
            .await?;

        tracing::info!(
            player_id = %player_id,
            reason = %reason,
            old_rating = old_rating,
            new_rating = new_rating,
            delta = delta,
            "Rating change applied"
        );

        Ok(RatingChangeResult {
            player_id: *player_id,
            old_rating,
            new_rating,
            delta,
            reason,
            entry,
        })
    }

    /// Undo every change caused by `reference_id` by applying inverse deltas.
    ///
    /// Entries already reversed are skipped, so calling this twice is harmless.
    pub async fn revert_reference(
        &self,
        reference_id: Uuid,
    ) -> Result<Vec<RatingChangeResult>, AppError> {
        let entries = self.entries.find_by_reference(reference_id).await?;

        let reversed: HashSet<_> = entries.iter().filter_map(|e| e.reverses).collect();

        let mut results = Vec::new();
        for entry in entries
            .iter()
            .filter(|e| !e.is_reversal() && !reversed.contains(&e.id))
        {
            let result = self
                .write_change(
                    &entry.player_id,
                    -entry.variation,
                    RatingReason::Reversal,
                    Some(reference_id),
                    Some(entry.id),
                )
                .await?;
            results.push(result);
        }

        tracing::info!(
            reference_id = %reference_id,
            reversed = results.len(),
            "Rating changes reverted"
        );

        Ok(results)
    }

    /// Roll back whatever part of a result was written before `cause` stopped it.
    ///
    /// Leaves every rating touched under `reference_id` as it was before the
    /// attempt, so the caller can retry the whole result.
    pub async fn roll_back(&self, reference_id: Uuid, cause: &AppError) {
        match self.revert_reference(reference_id).await {
            Ok(reverted) => tracing::warn!(
                reference_id = %reference_id,
                error = %cause,
                reverted = reverted.len(),
                "Partial rating change rolled back"
            ),
            Err(err) => tracing::error!(
                reference_id = %reference_id,
                error = %cause,
                rollback_error = %err,
                "Failed to roll back partial rating change"
            ),
        }
    }

    /// Rating history of a player, oldest first
    pub async fn history(&self, player_id: &PlayerId) -> Result<Vec<RatingEntry>, AppError> {
        Ok(self.entries.find_by_player(player_id).await?)
    }
}
