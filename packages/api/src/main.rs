use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use shared::repositories::history_repository::DynamoDbHistoryRepository;
use shared::repositories::match_repository::DynamoDbMatchRepository;
use shared::repositories::player_repository::DynamoDbPlayerRepository;
use shared::services::match_service::MatchService;
use shared::services::player_service::PlayerService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    // Set up services; the DynamoDB client is built once here and injected.
    let config = aws_config::load_from_env().await;
    let client = aws_sdk_dynamodb::Client::new(&config);

    let player_repository = Arc::new(DynamoDbPlayerRepository::new(client.clone()));
    let player_service = Arc::new(PlayerService::new(player_repository));

    let match_repository = Arc::new(DynamoDbMatchRepository::new(client.clone()));
    let history_repository = Arc::new(DynamoDbHistoryRepository::new(client.clone()));
    let match_service = Arc::new(MatchService::new(
        match_repository,
        history_repository,
        player_service.clone(),
    ));

    let app_state = state::AppState {
        player_service,
        match_service,
    };

    // Configure CORS
    // ToDo: Tighten this up
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Merge routes
    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::auth::routes())
        .merge(routes::leaderboard::routes())
        .merge(routes::matches::routes())
        .layer(cors)
        .with_state(app_state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on {}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
