use serde::{Deserialize, Serialize};

use crate::models::player::Player;

/// Public view of a player profile. Never exposes the stored password.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerResponse {
    pub id: String,
    pub username: String,
    pub elo: i32,
    pub xp: i32,
    pub wins: i32,
    pub loses: i32,
    pub ultimate_wins: i32,
    pub ultimate_loses: i32,
    pub coins: i32,
}

impl From<&Player> for PlayerResponse {
    fn from(player: &Player) -> Self {
        PlayerResponse {
            id: player.id.clone(),
            username: player.username.clone(),
            elo: player.elo,
            xp: player.xp,
            wins: player.wins,
            loses: player.loses,
            ultimate_wins: player.ultimate_wins,
            ultimate_loses: player.ultimate_loses,
            coins: player.coins,
        }
    }
}
