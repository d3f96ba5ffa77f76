use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::player::Player;

/// A foosball match always seats exactly four players before it can start.
pub const MAX_PLAYERS: usize = 4;
/// Round scores are clamped to 0..=10.
pub const MAX_ROUND_SCORE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchState {
    Open,
    Full,
    Playing,
}

/// Snapshot of a player taken when they join a match. The live profile keeps
/// changing after settlement; the roster keeps the pre-match values the
/// settlement engine needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub id: String,
    pub username: String,
    pub elo: i32,
    pub wins: i32,
    pub loses: i32,
}

impl From<&Player> for RosterPlayer {
    fn from(player: &Player) -> Self {
        RosterPlayer {
            id: player.id.clone(),
            username: player.username.clone(),
            elo: player.elo,
            wins: player.wins,
            loses: player.loses,
        }
    }
}

/// One 2v2 sub-match. `vyrazacka` is a secondary per-player elimination
/// counter tracked alongside the score; settlement ignores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundPairing {
    pub team_a: [String; 2],
    pub team_b: [String; 2],
    pub score_a: i32,
    pub score_b: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vyrazacka: Option<HashMap<String, i32>>,
}

impl RoundPairing {
    pub fn new(team_a: [String; 2], team_b: [String; 2]) -> Self {
        RoundPairing {
            team_a,
            team_b,
            score_a: 0,
            score_b: 0,
            vyrazacka: None,
        }
    }

    pub fn record_score(&mut self, score_a: i32, score_b: i32) {
        self.score_a = score_a.clamp(0, MAX_ROUND_SCORE);
        self.score_b = score_b.clamp(0, MAX_ROUND_SCORE);
    }

    pub fn participants(&self) -> impl Iterator<Item = &String> {
        self.team_a.iter().chain(self.team_b.iter())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSession {
    pub id: String,
    pub state: MatchState,
    pub players: Vec<RosterPlayer>,
    pub rounds: Vec<RoundPairing>,
    pub max_players: usize,
    pub created_at: DateTime<Utc>,
}

impl MatchSession {
    pub fn new(first_player: RosterPlayer) -> Self {
        MatchSession {
            id: Uuid::new_v4().to_string(),
            state: MatchState::Open,
            players: vec![first_player],
            rounds: vec![],
            max_players: MAX_PLAYERS,
            created_at: Utc::now(),
        }
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players
    }

    pub fn add_player(&mut self, player: RosterPlayer) {
        self.players.push(player);
        if self.is_full() {
            self.state = MatchState::Full;
        }
    }

    pub fn remove_player(&mut self, player_id: &str) {
        self.players.retain(|p| p.id != player_id);
        if self.state == MatchState::Full && !self.is_full() {
            self.state = MatchState::Open;
        }
    }

    /// Fixes the three round-robin pairings from the roster order at this
    /// moment and moves the match to `Playing`. With four players the splits
    /// are (0,1)-(2,3), (0,2)-(1,3), (0,3)-(1,2).
    pub fn begin_play(&mut self) {
        if self.players.len() < MAX_PLAYERS {
            return;
        }
        let ids: Vec<String> = self.players.iter().map(|p| p.id.clone()).collect();
        self.rounds = vec![
            RoundPairing::new(
                [ids[0].clone(), ids[1].clone()],
                [ids[2].clone(), ids[3].clone()],
            ),
            RoundPairing::new(
                [ids[0].clone(), ids[2].clone()],
                [ids[1].clone(), ids[3].clone()],
            ),
            RoundPairing::new(
                [ids[0].clone(), ids[3].clone()],
                [ids[1].clone(), ids[2].clone()],
            ),
        ];
        self.state = MatchState::Playing;
    }
}
