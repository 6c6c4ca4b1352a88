//! Tournament service
//!
//! Check-in, first-round pairing, result entry and standings.
//! Rated games go through the same VP computation as the ladder.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::app::pairing::{generate_pairings, middle_unpaired};
use crate::app::rating::{compute_with_config, validate_zero_sum, RatingChange};
use crate::app::rating_service::RatingService;
use crate::domain::entities::{
    NewTournament, Player, PlayerId, RatingReason, RatingSystemConfig, Round, RoundStatus,
    Standing, TiebreakCriterion, Tournament, TournamentId, TournamentMatch, TournamentMatchId,
    TournamentResult, TournamentStatus,
};
use crate::domain::ports::{PlayerRepository, RatingEntryRepository, TournamentRepository};
use crate::error::{AppError, DomainError};

/// Outcome of recording a tournament result
#[derive(Debug, Clone)]
pub struct RecordedResult {
    pub tournament_match: TournamentMatch,
    /// `None` for walkovers
    pub change: Option<RatingChange>,
    pub round_completed: bool,
}

pub struct TournamentService<PR, RER, TR>
where
    PR: PlayerRepository,
    RER: RatingEntryRepository,
    TR: TournamentRepository,
{
    players: Arc<PR>,
    tournaments: Arc<TR>,
    ratings: RatingService<PR, RER>,
    config: RatingSystemConfig,
}

impl<PR, RER, TR> TournamentService<PR, RER, TR>
where
    PR: PlayerRepository,
    RER: RatingEntryRepository,
    TR: TournamentRepository,
{
    pub fn new(
        players: Arc<PR>,
        rating_entries: Arc<RER>,
        tournaments: Arc<TR>,
        config: RatingSystemConfig,
    ) -> Self {
        Self {
            ratings: RatingService::new(players.clone(), rating_entries),
            players,
            tournaments,
            config,
        }
    }

    async fn load(&self, id: &TournamentId) -> Result<Tournament, AppError> {
        Ok(self
            .tournaments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Tournament not found: {}", id)))?)
    }

    async fn load_player(&self, id: &PlayerId) -> Result<Player, AppError> {
        Ok(self
            .players
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Player not found: {}", id)))?)
    }

    /// Save under optimistic locking: fails with `Conflict` if the stored
    /// tournament changed since it was loaded
    async fn store(&self, tournament: &mut Tournament) -> Result<(), AppError> {
        let expected = tournament.version;
        tournament.version += 1;
        self.tournaments.save(tournament, expected).await?;
        Ok(())
    }

    pub async fn create_tournament(&self, new: NewTournament) -> Result<Tournament, AppError> {
        if new.name.trim().is_empty() {
            return Err(DomainError::Validation("Tournament name is required".to_string()).into());
        }
        if new.settings.bye_points != 1.0 && new.settings.bye_points != 0.5 {
            return Err(DomainError::Validation(format!(
                "Bye points must be 1.0 or 0.5, got {}",
                new.settings.bye_points
            ))
            .into());
        }

        let mut participants = Vec::with_capacity(new.participants.len());
        for id in new.participants {
            if !participants.contains(&id) {
                self.load_player(&id).await?;
                participants.push(id);
            }
        }

        let tournament = Tournament {
            id: TournamentId::new(),
            name: new.name.trim().to_string(),
            status: TournamentStatus::Draft,
            participants,
            present_players: Vec::new(),
            initial_ratings: Vec::new(),
            rounds: Vec::new(),
            settings: new.settings,
            created_at: Utc::now(),
            version: 0,
        };
        self.tournaments.create(&tournament).await?;

        tracing::info!(
            tournament_id = %tournament.id,
            participants = tournament.participants.len(),
            "Tournament created"
        );

        Ok(tournament)
    }

    /// Mark a participant as present; only present players are paired
    pub async fn check_in(
        &self,
        tournament_id: &TournamentId,
        player_id: &PlayerId,
    ) -> Result<Tournament, AppError> {
        let mut tournament = self.load(tournament_id).await?;
        if !tournament.participants.contains(player_id) {
            return Err(DomainError::Validation(format!(
                "Player {} is not registered in tournament {}",
                player_id, tournament.name
            ))
            .into());
        }
        if !tournament.present_players.contains(player_id) {
            tournament.present_players.push(*player_id);
            self.store(&mut tournament).await?;
        }
        Ok(tournament)
    }

    /// Pair present players by maximum rating distance and open round 1.
    ///
    /// With an odd number of present players the middle-ranked one gets a bye
    /// worth the tournament's bye points.
    pub async fn generate_first_round(
        &self,
        tournament_id: &TournamentId,
    ) -> Result<Round, AppError> {
        let mut tournament = self.load(tournament_id).await?;
        if !tournament.rounds.is_empty() {
            return Err(DomainError::Conflict(format!(
                "Tournament {} already has rounds",
                tournament.name
            ))
            .into());
        }
        if tournament.present_players.len() < 2 {
            return Err(DomainError::Validation(format!(
                "Need at least 2 present players, found {}",
                tournament.present_players.len()
            ))
            .into());
        }

        let mut present = Vec::with_capacity(tournament.present_players.len());
        for id in &tournament.present_players {
            present.push(self.load_player(id).await?);
        }

        let mut matches: Vec<TournamentMatch> = generate_pairings(&present)
            .into_iter()
            .zip(1..)
            .map(|(pairing, table_number)| TournamentMatch {
                id: TournamentMatchId::new(),
                table_number,
                white_id: pairing.first,
                black_id: Some(pairing.second),
                white_rating_snapshot: pairing.first_rating,
                black_rating_snapshot: Some(pairing.second_rating),
                result: None,
                white_score: 0.0,
                black_score: 0.0,
                vp_used: None,
                rating_delta: None,
            })
            .collect();

        if let Some(bye_player) = middle_unpaired(&present) {
            matches.push(TournamentMatch {
                id: TournamentMatchId::new(),
                table_number: matches.len() as u32 + 1,
                white_id: bye_player.id,
                black_id: None,
                white_rating_snapshot: bye_player.current_rating,
                black_rating_snapshot: None,
                result: None,
                white_score: tournament.settings.bye_points,
                black_score: 0.0,
                vp_used: None,
                rating_delta: None,
            });
            tracing::info!(player_id = %bye_player.id, "Bye granted in round 1");
        }

        let mut initial_ratings = Vec::with_capacity(tournament.participants.len());
        for id in &tournament.participants {
            initial_ratings.push((*id, self.load_player(id).await?.current_rating));
        }

        let round = Round {
            number: 1,
            status: RoundStatus::Pending,
            matches,
            created_at: Utc::now(),
            completed_at: None,
        };

        tournament.initial_ratings = initial_ratings;
        tournament.rounds.push(round.clone());
        tournament.status = TournamentStatus::Active;
        self.store(&mut tournament).await?;

        tracing::info!(
            tournament_id = %tournament_id,
            boards = round.matches.len(),
            "First round generated"
        );

        Ok(round)
    }

    /// Record a game result and apply its rating change.
    ///
    /// Walkovers score the game but move no rating, and are only accepted when
    /// the tournament allows no-shows.
    pub async fn record_result(
        &self,
        tournament_id: &TournamentId,
        match_id: &TournamentMatchId,
        result: TournamentResult,
    ) -> Result<RecordedResult, AppError> {
        let tournament = self.load(tournament_id).await?;
        if tournament.status != TournamentStatus::Active {
            return Err(DomainError::Validation(format!(
                "Tournament {} is {}",
                tournament.name, tournament.status
            ))
            .into());
        }

        let (round_index, match_index) = tournament
            .find_match(match_id)
            .ok_or_else(|| DomainError::NotFound(format!("Match not found: {}", match_id)))?;
        let board = tournament.rounds[round_index].matches[match_index].clone();

        let (Some(black_id), Some(black_rating)) = (board.black_id, board.black_rating_snapshot)
        else {
            return Err(
                DomainError::Validation("A bye has no result to record".to_string()).into(),
            );
        };
        if board.result.is_some() {
            return Err(DomainError::Conflict(format!(
                "Match at table {} already has a result",
                board.table_number
            ))
            .into());
        }
        if result.is_walkover() && !tournament.settings.allow_no_show {
            return Err(DomainError::Validation(
                "Walkovers are not allowed in this tournament".to_string(),
            )
            .into());
        }

        let change = match result.rated_outcome() {
            Some(outcome) => {
                let change = compute_with_config(
                    board.white_rating_snapshot,
                    black_rating,
                    outcome,
                    &self.config,
                );
                if self.config.zero_sum_check
                    && !validate_zero_sum(change.change_a, change.change_b)
                {
                    return Err(DomainError::Internal(format!(
                        "Rating change is not zero-sum: {:+} / {:+}",
                        change.change_a, change.change_b
                    ))
                    .into());
                }
                Some(change)
            }
            None => None,
        };

        let slot = (round_index, match_index);
        let recorded = match self
            .write_result(tournament, slot, &board, black_id, result, change)
            .await
        {
            Ok(recorded) => recorded,
            Err(err) => {
                if change.is_some() {
                    self.ratings.roll_back(match_id.0, &err).await;
                }
                return Err(err);
            }
        };

        tracing::info!(
            tournament_id = %tournament_id,
            table = recorded.tournament_match.table_number,
            result = %result,
            "Tournament result recorded"
        );

        Ok(recorded)
    }

    /// Apply the rating change and store the result. Ratings move first; the
    /// caller rolls them back if the save loses to a concurrent writer.
    async fn write_result(
        &self,
        mut tournament: Tournament,
        (round_index, match_index): (usize, usize),
        board: &TournamentMatch,
        black_id: PlayerId,
        result: TournamentResult,
        change: Option<RatingChange>,
    ) -> Result<RecordedResult, AppError> {
        if let Some(change) = change {
            let reference = Some(board.id.0);
            self.ratings
                .apply_change(
                    &board.white_id,
                    change.change_a,
                    RatingReason::Tournament,
                    reference,
                )
                .await?;
            self.ratings
                .apply_change(&black_id, change.change_b, RatingReason::Tournament, reference)
                .await?;
        }

        let (white_score, black_score) = result.scores();
        let round = &mut tournament.rounds[round_index];
        {
            let m = &mut round.matches[match_index];
            m.result = Some(result);
            m.white_score = white_score;
            m.black_score = black_score;
            m.vp_used = change.map(|c| c.vp);
            m.rating_delta = change.map(|c| c.change_a);
        }

        let round_completed = round.all_resolved();
        if round_completed {
            round.status = RoundStatus::Completed;
            round.completed_at = Some(Utc::now());
            tracing::info!(
                tournament_id = %tournament.id,
                round = round.number,
                "Round completed"
            );
        }
        let tournament_match = round.matches[match_index].clone();

        self.store(&mut tournament).await?;

        Ok(RecordedResult {
            tournament_match,
            change,
            round_completed,
        })
    }

    /// Finish a tournament whose rounds are all completed
    pub async fn complete_tournament(&self, tournament_id: &TournamentId) -> Result<(), AppError> {
        let mut tournament = self.load(tournament_id).await?;
        if tournament.rounds.is_empty()
            || tournament
                .rounds
                .iter()
                .any(|r| r.status != RoundStatus::Completed)
        {
            return Err(DomainError::Validation(format!(
                "Tournament {} has unfinished rounds",
                tournament.name
            ))
            .into());
        }

        tournament.status = TournamentStatus::Completed;
        self.store(&mut tournament).await?;
        tracing::info!(tournament_id = %tournament_id, "Tournament completed");
        Ok(())
    }

    /// Standings with random tiebreaks drawn from an entropy-seeded RNG
    pub async fn standings(&self, tournament_id: &TournamentId) -> Result<Vec<Standing>, AppError> {
        let mut rng = StdRng::from_entropy();
        self.standings_with_rng(tournament_id, &mut rng).await
    }

    pub async fn standings_with_rng<R: Rng + Send>(
        &self,
        tournament_id: &TournamentId,
        rng: &mut R,
    ) -> Result<Vec<Standing>, AppError> {
        let tournament = self.load(tournament_id).await?;

        let mut rows = Vec::with_capacity(tournament.participants.len());
        for id in &tournament.participants {
            let player = self.load_player(id).await?;
            rows.push(Standing {
                player_id: *id,
                player_name: player.name.clone(),
                rating: player.current_rating,
                initial_rating: tournament
                    .initial_rating_of(id)
                    .unwrap_or(player.current_rating),
                points: 0.0,
                played: 0,
                wins: 0,
                draws: 0,
                losses: 0,
                opponents: Vec::new(),
                position: 0,
            });
        }

        tally(&tournament, &mut rows);
        Ok(rank_standings(&tournament, rows, rng))
    }
}

/// Accumulate points and game counts from every round
fn tally(tournament: &Tournament, rows: &mut [Standing]) {
    let index: HashMap<PlayerId, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.player_id, i))
        .collect();

    for m in tournament.rounds.iter().flat_map(|r| r.matches.iter()) {
        let Some(black_id) = m.black_id else {
            if let Some(&i) = index.get(&m.white_id) {
                rows[i].points += m.white_score;
            }
            continue;
        };

        for (me, opponent, my_score, their_score) in [
            (m.white_id, black_id, m.white_score, m.black_score),
            (black_id, m.white_id, m.black_score, m.white_score),
        ] {
            let Some(&i) = index.get(&me) else { continue };
            let row = &mut rows[i];
            row.opponents.push(opponent);
            if m.result.is_none() {
                continue;
            }
            row.played += 1;
            row.points += my_score;
            match my_score.partial_cmp(&their_score) {
                Some(std::cmp::Ordering::Greater) => row.wins += 1,
                Some(std::cmp::Ordering::Less) => row.losses += 1,
                _ => row.draws += 1,
            }
        }
    }
}

/// Points scored by `player` against the other members of `group`, in half points
fn head_to_head_half_points(tournament: &Tournament, player: &PlayerId, group: &[PlayerId]) -> i64 {
    tournament
        .rounds
        .iter()
        .flat_map(|r| r.matches.iter())
        .filter(|m| m.result.is_some())
        .filter_map(|m| {
            let black = m.black_id?;
            if m.white_id == *player && group.contains(&black) {
                Some(m.white_score)
            } else if black == *player && group.contains(&m.white_id) {
                Some(m.black_score)
            } else {
                None
            }
        })
        .map(half_points)
        .sum()
}

fn half_points(points: f64) -> i64 {
    (points * 2.0).round() as i64
}

/// Order `group` by a key (highest first), then refine each run of equal keys
/// with the remaining criteria. Ids settle whatever is still tied.
fn refine<R: Rng>(
    tournament: &Tournament,
    rows: &[Standing],
    group: Vec<usize>,
    criteria: &[TiebreakCriterion],
    rng: &mut R,
) -> Vec<usize> {
    if group.len() < 2 {
        return group;
    }
    let Some((criterion, rest)) = criteria.split_first() else {
        let mut group = group;
        group.sort_by_key(|&i| rows[i].player_id);
        return group;
    };

    let ids: Vec<PlayerId> = group.iter().map(|&i| rows[i].player_id).collect();
    let mut keyed: Vec<(i64, usize)> = group
        .iter()
        .map(|&i| {
            let key = match criterion {
                TiebreakCriterion::InitialRating => i64::from(rows[i].initial_rating),
                TiebreakCriterion::HeadToHead => {
                    head_to_head_half_points(tournament, &rows[i].player_id, &ids)
                }
                TiebreakCriterion::Random => i64::from(rng.gen::<u32>()),
            };
            (key, i)
        })
        .collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0));

    let mut ordered = Vec::with_capacity(keyed.len());
    for run in keyed.chunk_by(|a, b| a.0 == b.0) {
        let sub: Vec<usize> = run.iter().map(|&(_, i)| i).collect();
        ordered.extend(refine(tournament, rows, sub, rest, rng));
    }
    ordered
}

fn rank_standings<R: Rng>(
    tournament: &Tournament,
    rows: Vec<Standing>,
    rng: &mut R,
) -> Vec<Standing> {
    let mut by_points: Vec<usize> = (0..rows.len()).collect();
    by_points.sort_by(|&a, &b| half_points(rows[b].points).cmp(&half_points(rows[a].points)));

    let mut order = Vec::with_capacity(rows.len());
    let mut criteria = tournament.settings.tiebreak_criteria.clone();
    criteria.dedup();
    for run in by_points.chunk_by(|&a, &b| half_points(rows[a].points) == half_points(rows[b].points)) {
        order.extend(refine(tournament, &rows, run.to_vec(), &criteria, rng));
    }

    let mut slots: Vec<Option<Standing>> = rows.into_iter().map(Some).collect();
    order
        .into_iter()
        .enumerate()
        .filter_map(|(position, i)| {
            slots[i].take().map(|mut row| {
                row.position = position + 1;
                row
            })
        })
        .collect()
}
