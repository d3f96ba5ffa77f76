use std::fmt;

#[derive(Debug)]
pub enum HistoryRepositoryError {
    Serialization(String),
    DynamoDb(String),
}

impl fmt::Display for HistoryRepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            HistoryRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for HistoryRepositoryError {}
