use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::{debug, error};

use crate::middleware::auth::{MATCH_COOKIE, USERNAME_COOKIE};
use crate::{error::ApiError, state::AppState};
use shared::models::auth::requests::{LoginRequest, RegisterRequest};
use shared::models::auth::responses::PlayerResponse;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

fn session_cookie(username: &str) -> Cookie<'static> {
    Cookie::build((USERNAME_COOKIE, username.to_string()))
        .path("/")
        .build()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<PlayerResponse>), ApiError> {
    let player = state
        .player_service
        .register(&request.username, &request.password)
        .await
        .map_err(|e| {
            error!("Failed to register player {}: {}", request.username, e);
            ApiError::from(e)
        })?;
    debug!("Player registered successfully: {}", player.username);
    let jar = jar.add(session_cookie(&player.username));
    Ok((StatusCode::CREATED, jar, Json(PlayerResponse::from(&player))))
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<PlayerResponse>), ApiError> {
    let player = state
        .player_service
        .login(&request.username, &request.password)
        .await
        .map_err(|e| {
            error!("Failed to authenticate player {}: {}", request.username, e);
            ApiError::from(e)
        })?;
    let jar = jar.add(session_cookie(&player.username));
    Ok((jar, Json(PlayerResponse::from(&player))))
}

async fn logout(jar: CookieJar) -> (StatusCode, CookieJar) {
    let jar = jar
        .remove(removal_cookie(USERNAME_COOKIE))
        .remove(removal_cookie(MATCH_COOKIE));
    (StatusCode::NO_CONTENT, jar)
}
