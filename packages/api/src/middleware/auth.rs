use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use crate::{error::ApiError, state::AppState};

/// Cookie carrying the logged-in username. Plain value, no signing: session
/// identity here is a convenience, not a security boundary.
pub const USERNAME_COOKIE: &str = "username";
/// Cookie carrying the id of the match the player is currently in.
pub const MATCH_COOKIE: &str = "match_id";

#[derive(Debug, Clone)]
pub struct SessionPlayer {
    pub username: String,
    pub match_id: Option<String>,
}

impl FromRequestParts<AppState> for SessionPlayer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let username = jar
            .get(USERNAME_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|username| !username.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        let match_id = jar
            .get(MATCH_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|id| !id.is_empty());

        Ok(SessionPlayer { username, match_id })
    }
}
