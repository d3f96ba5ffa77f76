use crate::models::match_session::{MatchSession, MatchState};
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

#[cfg(test)]
use mockall::automock;

pub struct DynamoDbMatchRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbMatchRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("MATCHES_TABLE")
            .expect("MATCHES_TABLE environment variable must be set");
        Self { client, table_name }
    }

    pub fn with_table_name(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait MatchRepository: Send + Sync {
    async fn create_match(&self, session: &MatchSession) -> Result<(), MatchRepositoryError>;
    async fn get_match(&self, match_id: &str) -> Result<MatchSession, MatchRepositoryError>;
    async fn update_match(&self, session: &MatchSession) -> Result<(), MatchRepositoryError>;
    async fn delete_match(&self, match_id: &str) -> Result<(), MatchRepositoryError>;
    async fn find_by_state(
        &self,
        state: MatchState,
    ) -> Result<Option<MatchSession>, MatchRepositoryError>;
}

#[async_trait]
impl MatchRepository for DynamoDbMatchRepository {
    async fn create_match(&self, session: &MatchSession) -> Result<(), MatchRepositoryError> {
        let item =
            to_item(session).map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }

    async fn get_match(&self, match_id: &str) -> Result<MatchSession, MatchRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(
                "id",
                to_attribute_value(match_id)
                    .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;
        if let Some(item) = output.item {
            let session: MatchSession =
                from_item(item).map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;
            Ok(session)
        } else {
            Err(MatchRepositoryError::NotFound)
        }
    }

    async fn update_match(&self, session: &MatchSession) -> Result<(), MatchRepositoryError> {
        let item =
            to_item(session).map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }

    async fn delete_match(&self, match_id: &str) -> Result<(), MatchRepositoryError> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key(
                "id",
                to_attribute_value(match_id)
                    .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?,
            )
            .condition_expression("attribute_exists(id)")
            .send()
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("ConditionalCheckFailedException") {
                    Err(MatchRepositoryError::NotFound)
                } else {
                    Err(MatchRepositoryError::DynamoDb(error_str))
                }
            }
        }
    }

    // "state" collides with a DynamoDB reserved word, so it is aliased in
    // the filter expression.
    async fn find_by_state(
        &self,
        state: MatchState,
    ) -> Result<Option<MatchSession>, MatchRepositoryError> {
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("#s = :state")
            .expression_attribute_names("#s", "state")
            .expression_attribute_values(
                ":state",
                to_attribute_value(state)
                    .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;
        if let Some(item) = output.items.unwrap_or_default().into_iter().next() {
            let session: MatchSession =
                from_item(item).map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(session))
        } else {
            Ok(None)
        }
    }
}
