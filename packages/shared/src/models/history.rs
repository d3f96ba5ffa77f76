use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::match_session::RoundPairing;
use crate::models::settlement::PlayerResultView;

/// Write-once snapshot persisted after settlement. Lives on after the match
/// document is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchHistoryRecord {
    pub id: String,
    pub match_id: String,
    pub finished_at: DateTime<Utc>,
    pub players: Vec<PlayerResultView>,
    pub rounds: Vec<RoundPairing>,
}

impl MatchHistoryRecord {
    pub fn new(
        match_id: String,
        players: Vec<PlayerResultView>,
        rounds: Vec<RoundPairing>,
    ) -> Self {
        MatchHistoryRecord {
            id: Uuid::new_v4().to_string(),
            match_id,
            finished_at: Utc::now(),
            players,
            rounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_record_creation() {
        let record = MatchHistoryRecord::new("match-1".to_string(), vec![], vec![]);

        assert!(!record.id.is_empty());
        assert_eq!(record.match_id, "match-1");
        assert_ne!(record.id, record.match_id);

        let now = Utc::now();
        assert!((now - record.finished_at).num_seconds() < 10);
    }
}
