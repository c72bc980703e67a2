use axum::{routing::get, Router};
use chatrooms::{
    chatroom, AppConfig, AppState, InMemoryDatabase, PostgresExecutor, QueryExecutor,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatrooms=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting chat room service");

    let config = AppConfig::from_env()?;

    let executor: Arc<dyn QueryExecutor> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .acquire_timeout(config.acquire_timeout())
                .connect(url)
                .await?;
            info!("Database connection pool established");
            Arc::new(PostgresExecutor::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, serving from an empty in-memory database");
            Arc::new(InMemoryDatabase::new())
        }
    };

    let app_state = AppState::new(executor);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(chatroom::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(bind_addr = %config.bind_addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
