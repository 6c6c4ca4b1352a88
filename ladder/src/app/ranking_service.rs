//! Ranking service
//!
//! Player registration and the current ladder ranking.

use std::sync::Arc;

use crate::domain::entities::{NewPlayer, Player, PlayerId};
use crate::domain::ports::PlayerRepository;
use crate::error::{AppError, DomainError};

/// Active players ordered by rating, highest first.
///
/// Ties go to the earlier-registered player, then to the lower id, so the
/// order never depends on how the store happened to return the rows.
pub fn current_ranking(players: &[Player]) -> Vec<Player> {
    let mut ranking: Vec<Player> = players.iter().filter(|p| p.is_active).cloned().collect();
    ranking.sort_by(|a, b| {
        b.current_rating
            .cmp(&a.current_rating)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    ranking
}

pub struct RankingService<PR: PlayerRepository> {
    players: Arc<PR>,
    default_rating: i32,
}

impl<PR: PlayerRepository> RankingService<PR> {
    pub fn new(players: Arc<PR>, default_rating: i32) -> Self {
        Self {
            players,
            default_rating,
        }
    }

    /// Register a player, starting at the configured default rating unless one is given
    pub async fn register_player(&self, new_player: NewPlayer) -> Result<Player, AppError> {
        let name = new_player.name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("Player name is required".to_string()).into());
        }

        let initial_rating = new_player.initial_rating.unwrap_or(self.default_rating);
        let player = self
            .players
            .create(
                &NewPlayer {
                    name: name.to_string(),
                    ..new_player
                },
                initial_rating,
            )
            .await?;

        tracing::info!(
            player_id = %player.id,
            rating = initial_rating,
            "Player registered"
        );

        Ok(player)
    }

    /// Take a player in or out of pairing eligibility
    pub async fn set_active(&self, player_id: &PlayerId, active: bool) -> Result<(), AppError> {
        self.players.set_active(player_id, active).await?;
        tracing::info!(player_id = %player_id, active = active, "Player activity changed");
        Ok(())
    }

    pub async fn ranking(&self) -> Result<Vec<Player>, AppError> {
        let players = self.players.find_all().await?;
        Ok(current_ranking(&players))
    }

    /// 1-based ranking position of a player, `None` if inactive or unknown
    pub async fn position_of(&self, player_id: &PlayerId) -> Result<Option<usize>, AppError> {
        let ranking = self.ranking().await?;
        Ok(ranking
            .iter()
            .position(|p| p.id == *player_id)
            .map(|i| i + 1))
    }
}
