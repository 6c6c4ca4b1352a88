//! Mock implementations of port traits
//!
//! In-memory repositories that tests can pre-populate and inspect.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    ColorHistory, CycleStatus, LadderCycle, LadderCycleId, LadderMatch, LadderMatchId,
    MatchOutcome, NewLadderMatch, NewPlayer, NewRatingEntry, Player, PlayerId, RatingEntry,
    RatingEntryId, Tournament, TournamentId,
};
use crate::domain::ports::{
    ColorHistoryRepository, LadderCycleRepository, LadderMatchRepository, PlayerRepository,
    RatingEntryRepository, TournamentRepository,
};
use crate::error::DomainError;

// ============================================================================
// In-Memory Player Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryPlayerRepository {
    players: Arc<RwLock<HashMap<PlayerId, Player>>>,
    fail_next_write: Arc<AtomicBool>,
    fail_next_write_for: Arc<RwLock<HashSet<PlayerId>>>,
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a player for testing
    pub fn with_player(self, player: Player) -> Self {
        self.players.write().unwrap().insert(player.id, player);
        self
    }

    pub fn rating_of(&self, id: &PlayerId) -> Option<i32> {
        self.players
            .read()
            .unwrap()
            .get(id)
            .map(|p| p.current_rating)
    }

    /// Make the next compare-and-set lose its race
    pub fn fail_next_rating_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    /// Make the next compare-and-set for one player lose its race
    pub fn fail_next_rating_write_for(&self, id: &PlayerId) {
        self.fail_next_write_for.write().unwrap().insert(*id);
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn find_by_id(&self, id: &PlayerId) -> Result<Option<Player>, DomainError> {
        let players = self.players.read().unwrap();
        Ok(players.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Player>, DomainError> {
        let players = self.players.read().unwrap();
        Ok(players.values().cloned().collect())
    }

    async fn find_active(&self) -> Result<Vec<Player>, DomainError> {
        let players = self.players.read().unwrap();
        Ok(players.values().filter(|p| p.is_active).cloned().collect())
    }

    async fn create(
        &self,
        new_player: &NewPlayer,
        initial_rating: i32,
    ) -> Result<Player, DomainError> {
        let now = Utc::now();
        let player = Player {
            id: PlayerId::new(),
            name: new_player.name.clone(),
            nickname: new_player.nickname.clone(),
            is_active: true,
            current_rating: initial_rating,
            created_at: now,
            updated_at: now,
        };
        self.players
            .write()
            .unwrap()
            .insert(player.id, player.clone());
        Ok(player)
    }

    async fn compare_and_set_rating(
        &self,
        id: &PlayerId,
        expected: i32,
        new_rating: i32,
    ) -> Result<(), DomainError> {
        let mut players = self.players.write().unwrap();
        let player = players
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Player not found: {}", id)))?;

        let lost_race = self.fail_next_write.swap(false, Ordering::SeqCst)
            || self.fail_next_write_for.write().unwrap().remove(id);
        if lost_race || player.current_rating != expected {
            return Err(DomainError::Conflict(format!(
                "Rating of player {} changed concurrently",
                id
            )));
        }

        player.current_rating = new_rating;
        player.updated_at = Utc::now();
        Ok(())
    }

    async fn set_active(&self, id: &PlayerId, active: bool) -> Result<(), DomainError> {
        let mut players = self.players.write().unwrap();
        let player = players
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Player not found: {}", id)))?;
        player.is_active = active;
        player.updated_at = Utc::now();
        Ok(())
    }
}

// ============================================================================
// In-Memory Rating Entry Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryRatingEntryRepository {
    entries: Arc<RwLock<Vec<RatingEntry>>>,
}

impl InMemoryRatingEntryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded entry in creation order
    pub fn get_all_entries(&self) -> Vec<RatingEntry> {
        self.entries.read().unwrap().clone()
    }
}

#[async_trait]
impl RatingEntryRepository for InMemoryRatingEntryRepository {
    async fn create(&self, entry: &NewRatingEntry) -> Result<RatingEntry, DomainError> {
        let entry = RatingEntry {
            id: RatingEntryId::new(),
            player_id: entry.player_id,
            previous_rating: entry.previous_rating,
            new_rating: entry.new_rating,
            variation: entry.variation,
            reason: entry.reason,
            reference_id: entry.reference_id,
            reverses: entry.reverses,
            created_at: Utc::now(),
        };
        self.entries.write().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn find_by_player(&self, player_id: &PlayerId) -> Result<Vec<RatingEntry>, DomainError> {
        let entries = self.entries.read().unwrap();
        Ok(entries
            .iter()
            .filter(|e| e.player_id == *player_id)
            .cloned()
            .collect())
    }

    async fn find_by_reference(
        &self,
        reference_id: uuid::Uuid,
    ) -> Result<Vec<RatingEntry>, DomainError> {
        let entries = self.entries.read().unwrap();
        Ok(entries
            .iter()
            .filter(|e| e.reference_id == Some(reference_id))
            .cloned()
            .collect())
    }
}

// ============================================================================
// In-Memory Ladder Cycle Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryLadderCycleRepository {
    cycles: Arc<RwLock<Vec<LadderCycle>>>,
}

impl InMemoryLadderCycleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LadderCycleRepository for InMemoryLadderCycleRepository {
    async fn find_by_id(&self, id: &LadderCycleId) -> Result<Option<LadderCycle>, DomainError> {
        let cycles = self.cycles.read().unwrap();
        Ok(cycles.iter().find(|c| c.id == *id).cloned())
    }

    async fn find_active(&self) -> Result<Option<LadderCycle>, DomainError> {
        let cycles = self.cycles.read().unwrap();
        Ok(cycles.iter().find(|c| c.is_active()).cloned())
    }

    async fn find_all(&self) -> Result<Vec<LadderCycle>, DomainError> {
        let cycles = self.cycles.read().unwrap();
        Ok(cycles.iter().rev().cloned().collect())
    }

    async fn create(&self, cycle: &LadderCycle) -> Result<(), DomainError> {
        self.cycles.write().unwrap().push(cycle.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        id: &LadderCycleId,
        status: CycleStatus,
    ) -> Result<(), DomainError> {
        let mut cycles = self.cycles.write().unwrap();
        let cycle = cycles
            .iter_mut()
            .find(|c| c.id == *id)
            .ok_or_else(|| DomainError::NotFound(format!("Cycle not found: {}", id)))?;
        cycle.status = status;
        cycle.updated_at = Utc::now();
        Ok(())
    }
}

// ============================================================================
// In-Memory Ladder Match Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryLadderMatchRepository {
    matches: Arc<RwLock<Vec<LadderMatch>>>,
}

impl InMemoryLadderMatchRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LadderMatchRepository for InMemoryLadderMatchRepository {
    async fn find_by_id(&self, id: &LadderMatchId) -> Result<Option<LadderMatch>, DomainError> {
        let matches = self.matches.read().unwrap();
        Ok(matches.iter().find(|m| m.id == *id).cloned())
    }

    async fn find_by_cycle(
        &self,
        cycle_id: &LadderCycleId,
    ) -> Result<Vec<LadderMatch>, DomainError> {
        let matches = self.matches.read().unwrap();
        Ok(matches
            .iter()
            .filter(|m| m.cycle_id == *cycle_id)
            .cloned()
            .collect())
    }

    async fn create(&self, new_match: &NewLadderMatch) -> Result<LadderMatch, DomainError> {
        let now = Utc::now();
        let ladder_match = LadderMatch {
            id: LadderMatchId::new(),
            cycle_id: new_match.cycle_id,
            white_id: new_match.white_id,
            black_id: new_match.black_id,
            white_position: new_match.white_position,
            black_position: new_match.black_position,
            white_rating_snapshot: new_match.white_rating_snapshot,
            black_rating_snapshot: new_match.black_rating_snapshot,
            responsible_id: new_match.responsible_id,
            outcome: None,
            vp_used: None,
            applied_at: None,
            created_at: now,
            updated_at: now,
        };
        self.matches.write().unwrap().push(ladder_match.clone());
        Ok(ladder_match)
    }

    async fn set_outcome(
        &self,
        id: &LadderMatchId,
        outcome: MatchOutcome,
        vp_used: u32,
        applied_at: DateTime<Utc>,
    ) -> Result<LadderMatch, DomainError> {
        let mut matches = self.matches.write().unwrap();
        let ladder_match = matches
            .iter_mut()
            .find(|m| m.id == *id)
            .ok_or_else(|| DomainError::NotFound(format!("Match not found: {}", id)))?;
        ladder_match.outcome = Some(outcome);
        ladder_match.vp_used = Some(vp_used);
        ladder_match.applied_at = Some(applied_at);
        ladder_match.updated_at = Utc::now();
        Ok(ladder_match.clone())
    }
}

// ============================================================================
// In-Memory Color History Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryColorHistoryRepository {
    histories: Arc<RwLock<HashMap<(PlayerId, PlayerId), ColorHistory>>>,
}

impl InMemoryColorHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ColorHistoryRepository for InMemoryColorHistoryRepository {
    async fn find_for_pair(
        &self,
        a: &PlayerId,
        b: &PlayerId,
    ) -> Result<Option<ColorHistory>, DomainError> {
        let key = if a <= b { (*a, *b) } else { (*b, *a) };
        Ok(self.histories.read().unwrap().get(&key).cloned())
    }

    async fn upsert(&self, history: &ColorHistory) -> Result<(), DomainError> {
        self.histories
            .write()
            .unwrap()
            .insert((history.player_a, history.player_b), history.clone());
        Ok(())
    }
}

// ============================================================================
// In-Memory Tournament Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryTournamentRepository {
    tournaments: Arc<RwLock<HashMap<TournamentId, Tournament>>>,
    stale_reads: Arc<RwLock<HashMap<TournamentId, Tournament>>>,
}

impl InMemoryTournamentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `snapshot` to the next read of its tournament, as a concurrent
    /// writer that loaded it earlier would see it
    pub fn serve_stale_on_next_read(&self, snapshot: Tournament) {
        self.stale_reads
            .write()
            .unwrap()
            .insert(snapshot.id, snapshot);
    }
}

#[async_trait]
impl TournamentRepository for InMemoryTournamentRepository {
    async fn find_by_id(&self, id: &TournamentId) -> Result<Option<Tournament>, DomainError> {
        if let Some(stale) = self.stale_reads.write().unwrap().remove(id) {
            return Ok(Some(stale));
        }
        Ok(self.tournaments.read().unwrap().get(id).cloned())
    }

    async fn create(&self, tournament: &Tournament) -> Result<(), DomainError> {
        let mut tournaments = self.tournaments.write().unwrap();
        if tournaments.contains_key(&tournament.id) {
            return Err(DomainError::Conflict(format!(
                "Tournament already exists: {}",
                tournament.id
            )));
        }
        tournaments.insert(tournament.id, tournament.clone());
        Ok(())
    }

    async fn save(
        &self,
        tournament: &Tournament,
        expected_version: u64,
    ) -> Result<(), DomainError> {
        let mut tournaments = self.tournaments.write().unwrap();
        let stored = tournaments.get(&tournament.id).ok_or_else(|| {
            DomainError::NotFound(format!("Tournament not found: {}", tournament.id))
        })?;
        if stored.version != expected_version {
            return Err(DomainError::Conflict(format!(
                "Tournament {} was modified concurrently",
                tournament.id
            )));
        }
        tournaments.insert(tournament.id, tournament.clone());
        Ok(())
    }
}
