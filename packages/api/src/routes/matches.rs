use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::{debug, error};

use crate::middleware::auth::{SessionPlayer, MATCH_COOKIE};
use crate::{error::ApiError, state::AppState};
use shared::models::match_session::MatchSession;
use shared::models::matches::requests::ScoreUpdateRequest;
use shared::models::player::Player;
use shared::models::settlement::MatchResults;
use shared::services::errors::match_service_errors::MatchServiceError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/matches/join", post(join_match))
        .route("/matches/leave", post(leave_match))
        .route("/matches/{id}", get(match_state))
        .route("/matches/{id}/start", post(start_match))
        .route("/matches/{id}/rounds/{round}/score", post(update_score))
        .route("/matches/{id}/finish", post(finish_match))
}

async fn session_profile(
    state: &AppState,
    session: &SessionPlayer,
) -> Result<Player, ApiError> {
    state
        .player_service
        .get_player_by_username(&session.username)
        .await
        .map_err(|e| {
            error!("Failed to load player {}: {}", session.username, e);
            ApiError::from(e)
        })
}

fn match_cookie(match_id: &str) -> Cookie<'static> {
    Cookie::build((MATCH_COOKIE, match_id.to_string()))
        .path("/")
        .build()
}

async fn join_match(
    State(state): State<AppState>,
    session: SessionPlayer,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MatchSession>), ApiError> {
    let player = session_profile(&state, &session).await?;
    let match_session = state.match_service.join(&player).await.map_err(|e| {
        error!("Failed to join match for {}: {}", player.username, e);
        ApiError::from(e)
    })?;
    debug!("Player {} joined match {}", player.username, match_session.id);
    let jar = jar.add(match_cookie(&match_session.id));
    Ok((jar, Json(match_session)))
}

async fn leave_match(
    State(state): State<AppState>,
    session: SessionPlayer,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar), ApiError> {
    let match_id = session.match_id.clone().ok_or_else(|| {
        ApiError::MatchService(MatchServiceError::ValidationError(
            "No active match".to_string(),
        ))
    })?;
    let player = session_profile(&state, &session).await?;
    state
        .match_service
        .leave(&player.id, &match_id)
        .await
        .map_err(|e| {
            error!("Failed to leave match {}: {}", match_id, e);
            ApiError::from(e)
        })?;
    let jar = jar.remove(Cookie::build(MATCH_COOKIE).path("/").build());
    Ok((StatusCode::OK, jar))
}

async fn match_state(
    State(state): State<AppState>,
    _session: SessionPlayer,
    Path(match_id): Path<String>,
) -> Result<Json<MatchSession>, ApiError> {
    state
        .match_service
        .get(&match_id)
        .await
        .map(Json)
        .map_err(ApiError::from)
}

async fn start_match(
    State(state): State<AppState>,
    session: SessionPlayer,
    Path(match_id): Path<String>,
) -> Result<Json<MatchSession>, ApiError> {
    let player = session_profile(&state, &session).await?;
    state
        .match_service
        .start(&player.id, &match_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to start match {}: {}", match_id, e);
            ApiError::from(e)
        })
}

async fn update_score(
    State(state): State<AppState>,
    _session: SessionPlayer,
    Path((match_id, round_index)): Path<(String, usize)>,
    Json(request): Json<ScoreUpdateRequest>,
) -> Result<Json<MatchSession>, ApiError> {
    state
        .match_service
        .record_score(
            &match_id,
            round_index,
            request.score_a,
            request.score_b,
            request.vyrazacka,
        )
        .await
        .map(Json)
        .map_err(|e| {
            error!(
                "Failed to record score for match {} round {}: {}",
                match_id, round_index, e
            );
            ApiError::from(e)
        })
}

async fn finish_match(
    State(state): State<AppState>,
    _session: SessionPlayer,
    Path(match_id): Path<String>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MatchResults>), ApiError> {
    let results = state.match_service.finish(&match_id).await.map_err(|e| {
        error!("Failed to finish match {}: {}", match_id, e);
        ApiError::from(e)
    })?;
    debug!("Match {} settled", match_id);
    let jar = jar.remove(Cookie::build(MATCH_COOKIE).path("/").build());
    Ok((jar, Json(results)))
}
