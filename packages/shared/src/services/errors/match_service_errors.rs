use crate::services::errors::player_service_errors::PlayerServiceError;
use std::fmt;

#[derive(Debug)]
pub enum MatchServiceError {
    ValidationError(String),
    MatchNotFound,
    MatchInProgress,
    NotInMatch,
    InvalidState(String),
    PlayerService(PlayerServiceError),
    RepositoryError(String),
}

impl fmt::Display for MatchServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatchServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            MatchServiceError::MatchNotFound => write!(f, "Match not found"),
            MatchServiceError::MatchInProgress => {
                write!(f, "A match is already being played")
            }
            MatchServiceError::NotInMatch => write!(f, "Player is not part of this match"),
            MatchServiceError::InvalidState(msg) => write!(f, "Invalid match state: {}", msg),
            MatchServiceError::PlayerService(err) => write!(f, "Player service error: {}", err),
            MatchServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for MatchServiceError {}
