use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Starting rating for a freshly registered player.
pub const DEFAULT_ELO: i32 = 500;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Player {
    pub id: String,
    pub username: String,
    pub password: String,
    pub elo: i32,
    pub xp: i32,
    pub wins: i32,
    pub loses: i32,
    pub ultimate_wins: i32,
    pub ultimate_loses: i32,
    pub coins: i32,
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn new(username: String, password: String) -> Self {
        Player {
            id: Uuid::new_v4().to_string(),
            username,
            password,
            elo: DEFAULT_ELO,
            xp: 0,
            wins: 0,
            loses: 0,
            ultimate_wins: 0,
            ultimate_loses: 0,
            coins: 0,
            created_at: Utc::now(),
        }
    }
}
