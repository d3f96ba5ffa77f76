use crate::models::player::Player;
use crate::repositories::errors::player_repository_errors::PlayerRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

#[cfg(test)]
use mockall::automock;

pub struct DynamoDbPlayerRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbPlayerRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("PLAYERS_TABLE")
            .expect("PLAYERS_TABLE environment variable must be set");
        Self { client, table_name }
    }

    pub fn with_table_name(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait PlayerRepository: Send + Sync {
    async fn create_player(&self, player: &Player) -> Result<(), PlayerRepositoryError>;
    async fn get_player_by_id(&self, player_id: &str) -> Result<Player, PlayerRepositoryError>;
    async fn get_player_by_username(
        &self,
        username: &str,
    ) -> Result<Player, PlayerRepositoryError>;
    async fn update_player(&self, player: &Player) -> Result<(), PlayerRepositoryError>;
    async fn username_exists(&self, username: &str) -> Result<bool, PlayerRepositoryError>;
    async fn list_players(&self) -> Result<Vec<Player>, PlayerRepositoryError>;
}

#[async_trait]
impl PlayerRepository for DynamoDbPlayerRepository {
    async fn create_player(&self, player: &Player) -> Result<(), PlayerRepositoryError> {
        let item =
            to_item(player).map_err(|e| PlayerRepositoryError::Serialization(e.to_string()))?;
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(id)")
            .send()
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("ConditionalCheckFailedException") {
                    Err(PlayerRepositoryError::AlreadyExists)
                } else {
                    Err(PlayerRepositoryError::DynamoDb(error_str))
                }
            }
        }
    }

    async fn get_player_by_id(&self, player_id: &str) -> Result<Player, PlayerRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(
                "id",
                to_attribute_value(player_id)
                    .map_err(|e| PlayerRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| PlayerRepositoryError::DynamoDb(e.to_string()))?;
        if let Some(item) = output.item {
            let player: Player = from_item(item)
                .map_err(|e| PlayerRepositoryError::Serialization(e.to_string()))?;
            Ok(player)
        } else {
            Err(PlayerRepositoryError::NotFound)
        }
    }

    async fn get_player_by_username(
        &self,
        username: &str,
    ) -> Result<Player, PlayerRepositoryError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name("GSI_PlayerByUsername")
            .key_condition_expression("username = :username")
            .expression_attribute_values(
                ":username",
                to_attribute_value(username)
                    .map_err(|e| PlayerRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await;
        match result {
            Ok(output) => {
                if let Some(item) = output.items.unwrap_or_default().into_iter().next() {
                    let player = from_item(item)
                        .map_err(|e| PlayerRepositoryError::Serialization(e.to_string()))?;
                    Ok(player)
                } else {
                    Err(PlayerRepositoryError::NotFound)
                }
            }
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("ResourceNotFoundException")
                    || error_str.contains("ValidationException")
                {
                    return Err(PlayerRepositoryError::DynamoDb(
                        "Username index not available. Please ensure the GSI 'GSI_PlayerByUsername' exists and is active.".to_string(),
                    ));
                }
                Err(PlayerRepositoryError::DynamoDb(error_str))
            }
        }
    }

    async fn update_player(&self, player: &Player) -> Result<(), PlayerRepositoryError> {
        let item =
            to_item(player).map_err(|e| PlayerRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| PlayerRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, PlayerRepositoryError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name("GSI_PlayerByUsername")
            .key_condition_expression("username = :username")
            .expression_attribute_values(
                ":username",
                to_attribute_value(username)
                    .map_err(|e| PlayerRepositoryError::Serialization(e.to_string()))?,
            )
            .limit(1)
            .send()
            .await;
        match result {
            Ok(output) => {
                let exists = output
                    .items
                    .as_ref()
                    .map_or(false, |items| !items.is_empty());
                Ok(exists)
            }
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("ResourceNotFoundException")
                    || error_str.contains("ValidationException")
                {
                    Ok(false)
                } else {
                    Err(PlayerRepositoryError::DynamoDb(error_str))
                }
            }
        }
    }

    async fn list_players(&self) -> Result<Vec<Player>, PlayerRepositoryError> {
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| PlayerRepositoryError::DynamoDb(e.to_string()))?;
        let mut players = Vec::new();
        for item in output.items.unwrap_or_default() {
            let player: Player = from_item(item)
                .map_err(|e| PlayerRepositoryError::Serialization(e.to_string()))?;
            players.push(player);
        }
        Ok(players)
    }
}
