//! Account API server

use account_api::account::AccountStore;
use account_api::config::AppConfig;
use account_api::state::AppState;
use account_api::create_router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_api=debug,tower_http=debug".into()),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    // Connect to the database and synchronize the schema; refuse to serve
    // if that fails
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    let store = AccountStore::new(pool);
    if let Err(e) = store.migrate().await {
        tracing::error!("Something went wrong while synchronizing the account store: {e}");
        anyhow::bail!("account store synchronization failed");
    }

    // Create application state and router
    let state = Arc::new(AppState::new(config, store));
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Account API server running at http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
