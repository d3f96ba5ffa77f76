use std::fmt;

#[derive(Debug)]
pub enum PlayerServiceError {
    ValidationError(String),
    PlayerAlreadyExists,
    PlayerNotFound,
    InvalidCredentials,
    RepositoryError(String),
}

impl fmt::Display for PlayerServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlayerServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            PlayerServiceError::PlayerAlreadyExists => write!(f, "Username is already taken"),
            PlayerServiceError::PlayerNotFound => write!(f, "Player not found"),
            PlayerServiceError::InvalidCredentials => write!(f, "Invalid username or password"),
            PlayerServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for PlayerServiceError {}
