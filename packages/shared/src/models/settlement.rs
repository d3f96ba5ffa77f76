use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-player totals produced by the settlement engine for one match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub wins_added: i32,
    pub loses_added: i32,
    pub games_added: i32,
    pub xp_gained: i32,
    pub new_elo: i32,
    pub perfect_wins: i32,
}

/// One line of the auditable ledger shown to players. `round` is 1-based and
/// `None` for match-wide bonuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub reason: String,
    pub round: Option<usize>,
    pub delta: i32,
}

/// A ledger whose entry deltas always sum to `total`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerBreakdown {
    pub total: i32,
    pub breakdown: Vec<BreakdownEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSettlement {
    pub record: SettlementRecord,
    pub elo_breakdown: PlayerBreakdown,
    pub xp_breakdown: PlayerBreakdown,
}

/// Pure output of `settle`, keyed by player id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementOutcome {
    pub per_player: HashMap<String, PlayerSettlement>,
    pub ultimate_winner_id: Option<String>,
    pub ultimate_loser_id: Option<String>,
}

/// One player's row in the result payload returned by the finish endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerResultView {
    pub player_id: String,
    pub username: String,
    pub old_elo: i32,
    pub coins_gained: i32,
    pub record: SettlementRecord,
    pub elo_breakdown: PlayerBreakdown,
    pub xp_breakdown: PlayerBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResults {
    pub match_id: String,
    pub players: Vec<PlayerResultView>,
    pub ultimate_winner_id: Option<String>,
    pub ultimate_loser_id: Option<String>,
}
