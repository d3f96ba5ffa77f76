use crate::models::history::MatchHistoryRecord;
use crate::repositories::errors::history_repository_errors::HistoryRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use serde_dynamo::to_item;

#[cfg(test)]
use mockall::automock;

pub struct DynamoDbHistoryRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbHistoryRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("HISTORY_TABLE")
            .expect("HISTORY_TABLE environment variable must be set");
        Self { client, table_name }
    }

    pub fn with_table_name(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

/// Append-only store for settlement snapshots.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait HistoryRepository: Send + Sync {
    async fn create_history(
        &self,
        record: &MatchHistoryRecord,
    ) -> Result<(), HistoryRepositoryError>;
}

#[async_trait]
impl HistoryRepository for DynamoDbHistoryRepository {
    async fn create_history(
        &self,
        record: &MatchHistoryRecord,
    ) -> Result<(), HistoryRepositoryError> {
        let item =
            to_item(record).map_err(|e| HistoryRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| HistoryRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }
}
