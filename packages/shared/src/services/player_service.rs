use std::sync::Arc;

use crate::models::player::Player;
use crate::models::settlement::{SettlementOutcome, SettlementRecord};
use crate::repositories::errors::player_repository_errors::PlayerRepositoryError;
use crate::repositories::player_repository::PlayerRepository;
use crate::services::errors::player_service_errors::PlayerServiceError;

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 4;

/// Coins handed out alongside settlement: per round won, per 10-0 round, and
/// for taking every round of the match.
pub const COINS_PER_WIN: i32 = 10;
pub const COINS_PER_PERFECT_WIN: i32 = 5;
pub const COINS_ULTIMATE_WINNER: i32 = 25;

pub fn coin_award(record: &SettlementRecord, is_ultimate_winner: bool) -> i32 {
    let mut coins = COINS_PER_WIN * record.wins_added + COINS_PER_PERFECT_WIN * record.perfect_wins;
    if is_ultimate_winner {
        coins += COINS_ULTIMATE_WINNER;
    }
    coins
}

pub struct PlayerService {
    repository: Arc<dyn PlayerRepository + Send + Sync>,
}

impl PlayerService {
    pub fn new(repository: Arc<dyn PlayerRepository + Send + Sync>) -> Self {
        PlayerService { repository }
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Player, PlayerServiceError> {
        let username = username.trim();
        if username.len() < MIN_USERNAME_LEN {
            return Err(PlayerServiceError::ValidationError(format!(
                "Username must be at least {} characters",
                MIN_USERNAME_LEN
            )));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(PlayerServiceError::ValidationError(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if self
            .repository
            .username_exists(username)
            .await
            .map_err(|e| PlayerServiceError::RepositoryError(e.to_string()))?
        {
            return Err(PlayerServiceError::PlayerAlreadyExists);
        }
        let player = Player::new(username.to_string(), password.to_string());
        self.repository
            .create_player(&player)
            .await
            .map_err(|e| match e {
                PlayerRepositoryError::AlreadyExists => PlayerServiceError::PlayerAlreadyExists,
                _ => PlayerServiceError::RepositoryError(e.to_string()),
            })?;
        Ok(player)
    }

    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Player, PlayerServiceError> {
        if username.is_empty() || password.is_empty() {
            return Err(PlayerServiceError::ValidationError(
                "Username or password cannot be empty".to_string(),
            ));
        }
        match self.repository.get_player_by_username(username).await {
            Ok(player) if player.password == password => Ok(player),
            Ok(_) => Err(PlayerServiceError::InvalidCredentials),
            Err(PlayerRepositoryError::NotFound) => Err(PlayerServiceError::InvalidCredentials),
            Err(e) => Err(PlayerServiceError::RepositoryError(e.to_string())),
        }
    }

    pub async fn get_player_by_id(&self, player_id: &str) -> Result<Player, PlayerServiceError> {
        if player_id.is_empty() {
            return Err(PlayerServiceError::ValidationError(
                "Player ID cannot be empty".to_string(),
            ));
        }
        self.repository
            .get_player_by_id(player_id)
            .await
            .map_err(|e| match e {
                PlayerRepositoryError::NotFound => PlayerServiceError::PlayerNotFound,
                _ => PlayerServiceError::RepositoryError(e.to_string()),
            })
    }

    pub async fn get_player_by_username(
        &self,
        username: &str,
    ) -> Result<Player, PlayerServiceError> {
        if username.is_empty() {
            return Err(PlayerServiceError::ValidationError(
                "Username cannot be empty".to_string(),
            ));
        }
        self.repository
            .get_player_by_username(username)
            .await
            .map_err(|e| match e {
                PlayerRepositoryError::NotFound => PlayerServiceError::PlayerNotFound,
                _ => PlayerServiceError::RepositoryError(e.to_string()),
            })
    }

    /// All players ordered by rating, best first.
    pub async fn leaderboard(&self) -> Result<Vec<Player>, PlayerServiceError> {
        let mut players = self
            .repository
            .list_players()
            .await
            .map_err(|e| PlayerServiceError::RepositoryError(e.to_string()))?;
        players.sort_by(|a, b| b.elo.cmp(&a.elo));
        Ok(players)
    }

    /// Applies a settlement outcome to the stored profiles. Pairings can
    /// reference ids with no profile (player deleted mid-match); those are
    /// logged and skipped rather than failing the whole settlement.
    pub async fn apply_settlement(
        &self,
        outcome: &SettlementOutcome,
    ) -> Result<(), PlayerServiceError> {
        for (player_id, settlement) in &outcome.per_player {
            let mut player = match self.repository.get_player_by_id(player_id).await {
                Ok(player) => player,
                Err(PlayerRepositoryError::NotFound) => {
                    tracing::warn!("No profile for settled player {}, skipping", player_id);
                    continue;
                }
                Err(e) => return Err(PlayerServiceError::RepositoryError(e.to_string())),
            };

            let record = &settlement.record;
            let is_ultimate_winner = outcome.ultimate_winner_id.as_deref() == Some(player_id);

            player.elo = record.new_elo;
            player.xp += record.xp_gained;
            player.wins += record.wins_added;
            player.loses += record.loses_added;
            player.coins += coin_award(record, is_ultimate_winner);
            if is_ultimate_winner {
                player.ultimate_wins += 1;
            }
            if outcome.ultimate_loser_id.as_deref() == Some(player_id) {
                player.ultimate_loses += 1;
            }

            self.repository
                .update_player(&player)
                .await
                .map_err(|e| PlayerServiceError::RepositoryError(e.to_string()))?;
        }
        Ok(())
    }
}
