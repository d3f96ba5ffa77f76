use axum::{extract::State, routing::get, Json, Router};
use tracing::error;

use crate::{error::ApiError, state::AppState};
use shared::models::auth::responses::PlayerResponse;

pub fn routes() -> Router<AppState> {
    Router::new().route("/leaderboard", get(leaderboard))
}

async fn leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerResponse>>, ApiError> {
    let players = state.player_service.leaderboard().await.map_err(|e| {
        error!("Failed to load leaderboard: {}", e);
        ApiError::from(e)
    })?;
    Ok(Json(players.iter().map(PlayerResponse::from).collect()))
}
