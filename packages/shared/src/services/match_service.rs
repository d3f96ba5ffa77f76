use std::collections::HashMap;
use std::sync::Arc;

use tracing::error;

use crate::models::history::MatchHistoryRecord;
use crate::models::match_session::{MatchSession, MatchState, RosterPlayer};
use crate::models::player::Player;
use crate::models::settlement::{MatchResults, PlayerResultView};
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;
use crate::repositories::history_repository::HistoryRepository;
use crate::repositories::match_repository::MatchRepository;
use crate::services::errors::match_service_errors::MatchServiceError;
use crate::services::player_service::{coin_award, PlayerService};
use crate::services::settlement::settle;

pub struct MatchService {
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    history_repository: Arc<dyn HistoryRepository + Send + Sync>,
    player_service: Arc<PlayerService>,
}

impl MatchService {
    pub fn new(
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
        history_repository: Arc<dyn HistoryRepository + Send + Sync>,
        player_service: Arc<PlayerService>,
    ) -> Self {
        MatchService {
            match_repository,
            history_repository,
            player_service,
        }
    }

    async fn playing_match_exists(&self) -> Result<bool, MatchServiceError> {
        let playing = self
            .match_repository
            .find_by_state(MatchState::Playing)
            .await
            .map_err(|e| MatchServiceError::RepositoryError(e.to_string()))?;
        Ok(playing.is_some())
    }

    /// Joins the open match, or creates one if none exists. Joining is
    /// refused while any match is being played. A player already on the
    /// roster just gets the match back.
    pub async fn join(&self, player: &Player) -> Result<MatchSession, MatchServiceError> {
        let open = self
            .match_repository
            .find_by_state(MatchState::Open)
            .await
            .map_err(|e| MatchServiceError::RepositoryError(e.to_string()))?;

        match open {
            Some(mut session) => {
                if session.contains(&player.id) {
                    return Ok(session);
                }
                session.add_player(RosterPlayer::from(player));
                self.match_repository
                    .update_match(&session)
                    .await
                    .map_err(|e| MatchServiceError::RepositoryError(e.to_string()))?;
                Ok(session)
            }
            None => {
                // Check-then-act against the store; two simultaneous joins
                // can both pass this guard. Accepted for this app's load.
                if self.playing_match_exists().await? {
                    return Err(MatchServiceError::MatchInProgress);
                }
                let session = MatchSession::new(RosterPlayer::from(player));
                self.match_repository
                    .create_match(&session)
                    .await
                    .map_err(|e| MatchServiceError::RepositoryError(e.to_string()))?;
                Ok(session)
            }
        }
    }

    pub async fn leave(&self, player_id: &str, match_id: &str) -> Result<(), MatchServiceError> {
        let mut session = self.get(match_id).await?;
        if !session.contains(player_id) {
            return Err(MatchServiceError::NotInMatch);
        }
        if session.state == MatchState::Playing {
            return Err(MatchServiceError::InvalidState(
                "cannot leave a match that is being played".to_string(),
            ));
        }
        session.remove_player(player_id);
        if session.players.is_empty() {
            self.match_repository
                .delete_match(match_id)
                .await
                .map_err(|e| MatchServiceError::RepositoryError(e.to_string()))?;
        } else {
            self.match_repository
                .update_match(&session)
                .await
                .map_err(|e| MatchServiceError::RepositoryError(e.to_string()))?;
        }
        Ok(())
    }

    pub async fn get(&self, match_id: &str) -> Result<MatchSession, MatchServiceError> {
        if match_id.is_empty() {
            return Err(MatchServiceError::ValidationError(
                "Match ID cannot be empty".to_string(),
            ));
        }
        self.match_repository
            .get_match(match_id)
            .await
            .map_err(|e| match e {
                MatchRepositoryError::NotFound => MatchServiceError::MatchNotFound,
                _ => MatchServiceError::RepositoryError(e.to_string()),
            })
    }

    /// `Full` -> `Playing`: fixes the three round pairings from the roster
    /// order at this moment.
    pub async fn start(
        &self,
        player_id: &str,
        match_id: &str,
    ) -> Result<MatchSession, MatchServiceError> {
        let mut session = self.get(match_id).await?;
        if !session.contains(player_id) {
            return Err(MatchServiceError::NotInMatch);
        }
        if session.state != MatchState::Full {
            return Err(MatchServiceError::InvalidState(
                "match can only start once four players have joined".to_string(),
            ));
        }
        if self.playing_match_exists().await? {
            return Err(MatchServiceError::MatchInProgress);
        }
        session.begin_play();
        self.match_repository
            .update_match(&session)
            .await
            .map_err(|e| MatchServiceError::RepositoryError(e.to_string()))?;
        Ok(session)
    }

    /// Read-modify-write of one pairing's score; last write wins when two
    /// updates race.
    pub async fn record_score(
        &self,
        match_id: &str,
        round_index: usize,
        score_a: i32,
        score_b: i32,
        vyrazacka: Option<HashMap<String, i32>>,
    ) -> Result<MatchSession, MatchServiceError> {
        let mut session = self.get(match_id).await?;
        if session.state != MatchState::Playing {
            return Err(MatchServiceError::InvalidState(
                "scores can only be recorded while the match is being played".to_string(),
            ));
        }
        let round = session
            .rounds
            .get_mut(round_index)
            .ok_or_else(|| MatchServiceError::ValidationError("Invalid round index".to_string()))?;
        round.record_score(score_a, score_b);
        if let Some(counters) = vyrazacka {
            round.vyrazacka = Some(counters);
        }
        self.match_repository
            .update_match(&session)
            .await
            .map_err(|e| MatchServiceError::RepositoryError(e.to_string()))?;
        Ok(session)
    }

    /// Settles a finished match: computes the outcome, applies profile
    /// updates, then writes the history record and deletes the match as
    /// best-effort steps. Once the match document is gone a second finish
    /// reports not-found instead of re-applying deltas.
    pub async fn finish(&self, match_id: &str) -> Result<MatchResults, MatchServiceError> {
        let session = self.get(match_id).await?;
        if session.state != MatchState::Playing {
            return Err(MatchServiceError::InvalidState(
                "only a match that is being played can be finished".to_string(),
            ));
        }

        let outcome = settle(&session.players, &session.rounds);
        self.player_service
            .apply_settlement(&outcome)
            .await
            .map_err(MatchServiceError::PlayerService)?;

        let mut players = Vec::new();
        for roster_player in &session.players {
            if let Some(settlement) = outcome.per_player.get(&roster_player.id) {
                let is_ultimate_winner =
                    outcome.ultimate_winner_id.as_deref() == Some(roster_player.id.as_str());
                players.push(PlayerResultView {
                    player_id: roster_player.id.clone(),
                    username: roster_player.username.clone(),
                    old_elo: roster_player.elo,
                    coins_gained: coin_award(&settlement.record, is_ultimate_winner),
                    record: settlement.record.clone(),
                    elo_breakdown: settlement.elo_breakdown.clone(),
                    xp_breakdown: settlement.xp_breakdown.clone(),
                });
            }
        }
        let results = MatchResults {
            match_id: session.id.clone(),
            players,
            ultimate_winner_id: outcome.ultimate_winner_id.clone(),
            ultimate_loser_id: outcome.ultimate_loser_id.clone(),
        };

        // The profiles are already updated; failing either of these must not
        // cost the players their result payload.
        let history = MatchHistoryRecord::new(
            session.id.clone(),
            results.players.clone(),
            session.rounds.clone(),
        );
        if let Err(e) = self.history_repository.create_history(&history).await {
            error!("Failed to write history for match {}: {}", session.id, e);
        }
        if let Err(e) = self.match_repository.delete_match(&session.id).await {
            error!("Failed to delete finished match {}: {}", session.id, e);
        }

        Ok(results)
    }
}
