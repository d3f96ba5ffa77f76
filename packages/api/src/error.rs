use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::services::errors::{
    match_service_errors::MatchServiceError, player_service_errors::PlayerServiceError,
};

#[derive(Debug)]
pub enum ApiError {
    PlayerService(PlayerServiceError),
    MatchService(MatchServiceError),
    Unauthorized,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<PlayerServiceError> for ApiError {
    fn from(error: PlayerServiceError) -> Self {
        ApiError::PlayerService(error)
    }
}

impl From<MatchServiceError> for ApiError {
    fn from(error: MatchServiceError) -> Self {
        ApiError::MatchService(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::PlayerService(PlayerServiceError::ValidationError(_)) => {
                (StatusCode::BAD_REQUEST, self.message())
            }
            ApiError::PlayerService(PlayerServiceError::PlayerAlreadyExists) => {
                (StatusCode::CONFLICT, self.message())
            }
            ApiError::PlayerService(PlayerServiceError::PlayerNotFound) => {
                (StatusCode::NOT_FOUND, self.message())
            }
            ApiError::PlayerService(PlayerServiceError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, self.message())
            }
            ApiError::PlayerService(PlayerServiceError::RepositoryError(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.message())
            }

            ApiError::MatchService(MatchServiceError::ValidationError(_)) => {
                (StatusCode::BAD_REQUEST, self.message())
            }
            ApiError::MatchService(MatchServiceError::MatchNotFound) => {
                (StatusCode::NOT_FOUND, self.message())
            }
            ApiError::MatchService(
                MatchServiceError::MatchInProgress | MatchServiceError::InvalidState(_),
            ) => (StatusCode::CONFLICT, self.message()),
            ApiError::MatchService(MatchServiceError::NotInMatch) => {
                (StatusCode::FORBIDDEN, self.message())
            }
            ApiError::MatchService(
                MatchServiceError::PlayerService(_) | MatchServiceError::RepositoryError(_),
            ) => (StatusCode::INTERNAL_SERVER_ERROR, self.message()),

            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Not logged in".to_string()),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl ApiError {
    fn message(&self) -> String {
        match self {
            ApiError::PlayerService(e) => e.to_string(),
            ApiError::MatchService(e) => e.to_string(),
            ApiError::Unauthorized => "Not logged in".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_bad_request() {
        let error = ApiError::from(PlayerServiceError::ValidationError("too short".to_string()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_match_in_progress_maps_to_conflict() {
        let error = ApiError::from(MatchServiceError::MatchInProgress);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_missing_match_maps_to_not_found() {
        let error = ApiError::from(MatchServiceError::MatchNotFound);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_error_body_is_json_with_error_field() {
        let response = ApiError::from(MatchServiceError::MatchNotFound).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Match not found");
    }
}
