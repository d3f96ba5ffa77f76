use std::fmt;

#[derive(Debug)]
pub enum PlayerRepositoryError {
    NotFound,
    AlreadyExists,
    Serialization(String),
    DynamoDb(String),
}

impl fmt::Display for PlayerRepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerRepositoryError::NotFound => write!(f, "Player not found"),
            PlayerRepositoryError::AlreadyExists => write!(f, "Player already exists"),
            PlayerRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            PlayerRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for PlayerRepositoryError {}
