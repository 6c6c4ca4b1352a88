//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! The surrounding application provides implementations backed by its data store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{
    ColorHistory, CycleStatus, LadderCycle, LadderCycleId, LadderMatch, LadderMatchId,
    MatchOutcome, NewLadderMatch, NewPlayer, NewRatingEntry, Player, PlayerId, RatingEntry,
    Tournament, TournamentId,
};
use crate::error::DomainError;

/// Repository for Player entities
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Find a player by ID
    async fn find_by_id(&self, id: &PlayerId) -> Result<Option<Player>, DomainError>;

    /// List every player, active or not
    async fn find_all(&self) -> Result<Vec<Player>, DomainError>;

    /// List players eligible for pairing
    async fn find_active(&self) -> Result<Vec<Player>, DomainError>;

    /// Register a new player at the given starting rating
    async fn create(&self, player: &NewPlayer, initial_rating: i32)
        -> Result<Player, DomainError>;

    /// Write a new rating only if the stored rating still equals `expected`.
    /// Returns `DomainError::Conflict` when another writer got there first.
    async fn compare_and_set_rating(
        &self,
        id: &PlayerId,
        expected: i32,
        new_rating: i32,
    ) -> Result<(), DomainError>;

    /// Mark a player active or inactive
    async fn set_active(&self, id: &PlayerId, active: bool) -> Result<(), DomainError>;
}

/// Repository for rating history entries
#[async_trait]
pub trait RatingEntryRepository: Send + Sync {
    /// Record a rating change
    async fn create(&self, entry: &NewRatingEntry) -> Result<RatingEntry, DomainError>;

    /// History of a player, oldest first
    async fn find_by_player(&self, player_id: &PlayerId) -> Result<Vec<RatingEntry>, DomainError>;

    /// Entries caused by a given match, oldest first
    async fn find_by_reference(
        &self,
        reference_id: uuid::Uuid,
    ) -> Result<Vec<RatingEntry>, DomainError>;
}

/// Repository for ladder cycles
#[async_trait]
pub trait LadderCycleRepository: Send + Sync {
    async fn find_by_id(&self, id: &LadderCycleId) -> Result<Option<LadderCycle>, DomainError>;

    /// The single active cycle, if any
    async fn find_active(&self) -> Result<Option<LadderCycle>, DomainError>;

    /// All cycles, most recent first
    async fn find_all(&self) -> Result<Vec<LadderCycle>, DomainError>;

    async fn create(&self, cycle: &LadderCycle) -> Result<(), DomainError>;

    async fn update_status(
        &self,
        id: &LadderCycleId,
        status: CycleStatus,
    ) -> Result<(), DomainError>;
}

/// Repository for ladder matches
#[async_trait]
pub trait LadderMatchRepository: Send + Sync {
    async fn find_by_id(&self, id: &LadderMatchId) -> Result<Option<LadderMatch>, DomainError>;

    /// Matches of a cycle in creation order
    async fn find_by_cycle(
        &self,
        cycle_id: &LadderCycleId,
    ) -> Result<Vec<LadderMatch>, DomainError>;

    async fn create(&self, ladder_match: &NewLadderMatch) -> Result<LadderMatch, DomainError>;

    /// Store the outcome and the VP value it was rated with
    async fn set_outcome(
        &self,
        id: &LadderMatchId,
        outcome: MatchOutcome,
        vp_used: u32,
        applied_at: DateTime<Utc>,
    ) -> Result<LadderMatch, DomainError>;
}

/// Repository for ladder colour history
#[async_trait]
pub trait ColorHistoryRepository: Send + Sync {
    /// Colour record for an unordered pair of players
    async fn find_for_pair(
        &self,
        a: &PlayerId,
        b: &PlayerId,
    ) -> Result<Option<ColorHistory>, DomainError>;

    /// Insert or replace the record for the pair
    async fn upsert(&self, history: &ColorHistory) -> Result<(), DomainError>;
}

/// Repository for tournaments (stored as whole aggregates)
#[async_trait]
pub trait TournamentRepository: Send + Sync {
    async fn find_by_id(&self, id: &TournamentId) -> Result<Option<Tournament>, DomainError>;

    async fn create(&self, tournament: &Tournament) -> Result<(), DomainError>;

    /// Replace the stored aggregate if its version still equals
    /// `expected_version`. `tournament.version` is the version to store.
    /// Returns `DomainError::Conflict` when another writer saved first.
    async fn save(
        &self,
        tournament: &Tournament,
        expected_version: u64,
    ) -> Result<(), DomainError>;
}
