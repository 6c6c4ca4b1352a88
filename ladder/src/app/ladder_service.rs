//! Fortnightly ladder service
//!
//! Drives a ladder cycle through its states: open, matches generated, results
//! applied, closed. The pairing and rating computations stay pure; this
//! service only feeds them stored data and persists what they return.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::app::pairing::{generate_pairings, middle_unpaired};
use crate::app::rating::{compute_with_config, validate_zero_sum, RatingChange};
use crate::app::ranking_service::current_ranking;
use crate::app::rating_service::{RatingChangeResult, RatingService};
use crate::domain::entities::{
    Color, ColorHistory, CycleStatus, LadderCycle, LadderCycleId, LadderMatch, LadderMatchId,
    MatchOutcome, NewLadderMatch, PairingResult, RatingReason, RatingSystemConfig,
};
use crate::domain::ports::{
    ColorHistoryRepository, LadderCycleRepository, LadderMatchRepository, PlayerRepository,
    RatingEntryRepository,
};
use crate::error::{AppError, DomainError};

/// Outcome of recording a ladder result
#[derive(Debug, Clone)]
pub struct LadderResult {
    pub ladder_match: LadderMatch,
    pub change: RatingChange,
    pub white: RatingChangeResult,
    pub black: RatingChangeResult,
}

pub struct LadderService<PR, RER, LCR, LMR, CHR>
where
    PR: PlayerRepository,
    RER: RatingEntryRepository,
    LCR: LadderCycleRepository,
    LMR: LadderMatchRepository,
    CHR: ColorHistoryRepository,
{
    players: Arc<PR>,
    cycles: Arc<LCR>,
    matches: Arc<LMR>,
    colors: Arc<CHR>,
    ratings: RatingService<PR, RER>,
    config: RatingSystemConfig,
}

impl<PR, RER, LCR, LMR, CHR> LadderService<PR, RER, LCR, LMR, CHR>
where
    PR: PlayerRepository,
    RER: RatingEntryRepository,
    LCR: LadderCycleRepository,
    LMR: LadderMatchRepository,
    CHR: ColorHistoryRepository,
{
    pub fn new(
        players: Arc<PR>,
        rating_entries: Arc<RER>,
        cycles: Arc<LCR>,
        matches: Arc<LMR>,
        colors: Arc<CHR>,
        config: RatingSystemConfig,
    ) -> Self {
        Self {
            ratings: RatingService::new(players.clone(), rating_entries),
            players,
            cycles,
            matches,
            colors,
            config,
        }
    }

    pub async fn active_cycle(&self) -> Result<Option<LadderCycle>, AppError> {
        Ok(self.cycles.find_active().await?)
    }

    /// Open the cycle for the fortnight containing `today`.
    pub async fn open_cycle(&self, today: NaiveDate) -> Result<LadderCycle, AppError> {
        if let Some(active) = self.cycles.find_active().await? {
            return Err(DomainError::Conflict(format!(
                "Cycle {} is still active",
                active.label()
            ))
            .into());
        }

        let cycle = LadderCycle::starting_on(today);
        self.cycles.create(&cycle).await?;

        tracing::info!(cycle_id = %cycle.id, cycle = %cycle.label(), "Ladder cycle opened");

        Ok(cycle)
    }

    async fn load_cycle(&self, cycle_id: &LadderCycleId) -> Result<LadderCycle, AppError> {
        Ok(self
            .cycles
            .find_by_id(cycle_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Ladder cycle not found: {}", cycle_id)))?)
    }

    async fn load_active_cycle(&self, cycle_id: &LadderCycleId) -> Result<LadderCycle, AppError> {
        let cycle = self.load_cycle(cycle_id).await?;
        if !cycle.is_active() {
            return Err(DomainError::Validation(format!(
                "Ladder cycle {} is {}",
                cycle.label(),
                cycle.status
            ))
            .into());
        }
        Ok(cycle)
    }

    async fn load_match(&self, match_id: &LadderMatchId) -> Result<LadderMatch, AppError> {
        Ok(self
            .matches
            .find_by_id(match_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Ladder match not found: {}", match_id)))?)
    }

    /// Colour of the better-ranked player: white, unless the two met before,
    /// in which case both switch colours.
    async fn first_player_color(&self, pairing: &PairingResult) -> Result<Color, AppError> {
        let previous = self
            .colors
            .find_for_pair(&pairing.first, &pairing.second)
            .await?;

        Ok(previous
            .and_then(|history| history.last_color_of(&pairing.first))
            .map(Color::opposite)
            .unwrap_or(Color::White))
    }

    /// Pair every active player of the ranking for this cycle.
    pub async fn generate_matches(
        &self,
        cycle_id: &LadderCycleId,
    ) -> Result<Vec<LadderMatch>, AppError> {
        let cycle = self.load_active_cycle(cycle_id).await?;

        if !self.matches.find_by_cycle(cycle_id).await?.is_empty() {
            return Err(DomainError::Conflict(format!(
                "Matches already generated for cycle {}",
                cycle.label()
            ))
            .into());
        }

        let ranking = current_ranking(&self.players.find_active().await?);
        if ranking.len() < 2 {
            return Err(DomainError::Validation(format!(
                "Need at least 2 active players, found {}",
                ranking.len()
            ))
            .into());
        }

        if let Some(idle) = middle_unpaired(&ranking) {
            tracing::debug!(player_id = %idle.id, "Odd player count, player left unpaired this cycle");
        }

        let mut created = Vec::new();
        for pairing in generate_pairings(&ranking) {
            let first_color = self.first_player_color(&pairing).await?;

            let first = (pairing.first, pairing.first_rank + 1, pairing.first_rating);
            let second = (pairing.second, pairing.second_rank + 1, pairing.second_rating);
            let (white, black) = match first_color {
                Color::White => (first, second),
                Color::Black => (second, first),
            };

            let ladder_match = self
                .matches
                .create(&NewLadderMatch {
                    cycle_id: *cycle_id,
                    white_id: white.0,
                    black_id: black.0,
                    white_position: white.1,
                    black_position: black.1,
                    white_rating_snapshot: white.2,
                    black_rating_snapshot: black.2,
                    responsible_id: pairing.second,
                })
                .await?;

            self.colors
                .upsert(&ColorHistory::new(white.0, black.0))
                .await?;

            created.push(ladder_match);
        }

        tracing::info!(
            cycle_id = %cycle_id,
            matches = created.len(),
            players = ranking.len(),
            "Ladder matches generated"
        );

        Ok(created)
    }

    /// Apply `outcome` from the match snapshots. If any write fails part way,
    /// the ratings already moved for this match are rolled back before the
    /// error is returned.
    async fn apply_outcome(
        &self,
        ladder_match: &LadderMatch,
        outcome: MatchOutcome,
    ) -> Result<LadderResult, AppError> {
        let change = compute_with_config(
            ladder_match.white_rating_snapshot,
            ladder_match.black_rating_snapshot,
            outcome,
            &self.config,
        );

        if self.config.zero_sum_check && !validate_zero_sum(change.change_a, change.change_b) {
            return Err(DomainError::Internal(format!(
                "Rating change is not zero-sum: {:+} / {:+}",
                change.change_a, change.change_b
            ))
            .into());
        }

        match self.write_outcome(ladder_match, outcome, change).await {
            Ok(result) => Ok(result),
            Err(err) => {
                self.ratings.roll_back(ladder_match.id.0, &err).await;
                Err(err)
            }
        }
    }

    async fn write_outcome(
        &self,
        ladder_match: &LadderMatch,
        outcome: MatchOutcome,
        change: RatingChange,
    ) -> Result<LadderResult, AppError> {
        let reference = Some(ladder_match.id.0);
        let white = self
            .ratings
            .apply_change(
                &ladder_match.white_id,
                change.change_a,
                RatingReason::LadderChallenge,
                reference,
            )
            .await?;
        let black = self
            .ratings
            .apply_change(
                &ladder_match.black_id,
                change.change_b,
                RatingReason::LadderChallenge,
                reference,
            )
            .await?;

        let updated = self
            .matches
            .set_outcome(&ladder_match.id, outcome, change.vp, Utc::now())
            .await?;

        tracing::info!(
            match_id = %ladder_match.id,
            outcome = %outcome,
            vp = change.vp,
            white_delta = change.change_a,
            black_delta = change.change_b,
            "Ladder result applied"
        );

        Ok(LadderResult {
            ladder_match: updated,
            change,
            white,
            black,
        })
    }

    /// Record the result of an unresolved match and apply the rating change.
    ///
    /// Ratings are computed from the snapshots taken when the match was created.
    pub async fn record_result(
        &self,
        match_id: &LadderMatchId,
        outcome: MatchOutcome,
    ) -> Result<LadderResult, AppError> {
        let ladder_match = self.load_match(match_id).await?;
        if ladder_match.is_resolved() {
            return Err(DomainError::Conflict(format!(
                "Ladder match {} already has a result",
                match_id
            ))
            .into());
        }
        self.load_active_cycle(&ladder_match.cycle_id).await?;

        self.apply_outcome(&ladder_match, outcome).await
    }

    /// Replace the result of a resolved match: the earlier rating changes are
    /// reversed with inverse deltas, then the new outcome is applied. If the new
    /// outcome cannot be applied, the previous one is put back.
    pub async fn edit_result(
        &self,
        match_id: &LadderMatchId,
        outcome: MatchOutcome,
    ) -> Result<LadderResult, AppError> {
        let ladder_match = self.load_match(match_id).await?;
        let Some(previous) = ladder_match.outcome else {
            return Err(DomainError::Validation(format!(
                "Ladder match {} has no result to edit",
                match_id
            ))
            .into());
        };
        self.load_active_cycle(&ladder_match.cycle_id).await?;

        tracing::info!(
            match_id = %match_id,
            previous = %previous,
            outcome = %outcome,
            "Editing ladder result"
        );

        match self.replace_outcome(&ladder_match, outcome).await {
            Ok(result) => Ok(result),
            Err(err) => {
                self.restore_outcome(&ladder_match, previous, &err).await;
                Err(err)
            }
        }
    }

    async fn replace_outcome(
        &self,
        ladder_match: &LadderMatch,
        outcome: MatchOutcome,
    ) -> Result<LadderResult, AppError> {
        self.ratings.revert_reference(ladder_match.id.0).await?;
        self.apply_outcome(ladder_match, outcome).await
    }

    /// Bring the ratings of a match back to its stored outcome after a failed edit
    async fn restore_outcome(
        &self,
        ladder_match: &LadderMatch,
        previous: MatchOutcome,
        cause: &AppError,
    ) {
        self.ratings.roll_back(ladder_match.id.0, cause).await;
        if let Err(err) = self.apply_outcome(ladder_match, previous).await {
            tracing::error!(
                match_id = %ladder_match.id,
                previous = %previous,
                error = %err,
                "Failed to restore previous ladder result"
            );
        }
    }

    /// Close a cycle once every match has a result
    pub async fn close_cycle(&self, cycle_id: &LadderCycleId) -> Result<(), AppError> {
        let cycle = self.load_active_cycle(cycle_id).await?;

        let pending = self
            .matches
            .find_by_cycle(cycle_id)
            .await?
            .iter()
            .filter(|m| !m.is_resolved())
            .count();
        if pending > 0 {
            return Err(DomainError::Validation(format!(
                "Cycle {} still has {} match(es) without result",
                cycle.label(),
                pending
            ))
            .into());
        }

        self.cycles
            .update_status(cycle_id, CycleStatus::Completed)
            .await?;

        tracing::info!(cycle_id = %cycle_id, cycle = %cycle.label(), "Ladder cycle closed");

        Ok(())
    }

    /// Cancel a cycle in which no result has been applied yet
    pub async fn cancel_cycle(&self, cycle_id: &LadderCycleId) -> Result<(), AppError> {
        let cycle = self.load_active_cycle(cycle_id).await?;

        let applied = self
            .matches
            .find_by_cycle(cycle_id)
            .await?
            .iter()
            .filter(|m| m.is_resolved())
            .count();
        if applied > 0 {
            return Err(DomainError::Validation(format!(
                "Cycle {} already has {} applied result(s)",
                cycle.label(),
                applied
            ))
            .into());
        }

        self.cycles
            .update_status(cycle_id, CycleStatus::Cancelled)
            .await?;

        tracing::info!(cycle_id = %cycle_id, cycle = %cycle.label(), "Ladder cycle cancelled");

        Ok(())
    }

    pub async fn matches_for_cycle(
        &self,
        cycle_id: &LadderCycleId,
    ) -> Result<Vec<LadderMatch>, AppError> {
        Ok(self.matches.find_by_cycle(cycle_id).await?)
    }

    /// Matches with a result, most recently applied first.
    /// Without a cycle id, every cycle is searched.
    pub async fn resolved_matches(
        &self,
        cycle_id: Option<&LadderCycleId>,
    ) -> Result<Vec<LadderMatch>, AppError> {
        let cycle_ids = match cycle_id {
            Some(id) => vec![*id],
            None => self
                .cycles
                .find_all()
                .await?
                .into_iter()
                .map(|c| c.id)
                .collect(),
        };

        let mut resolved = Vec::new();
        for id in &cycle_ids {
            resolved.extend(
                self.matches
                    .find_by_cycle(id)
                    .await?
                    .into_iter()
                    .filter(LadderMatch::is_resolved),
            );
        }
        resolved.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));

        Ok(resolved)
    }
}
