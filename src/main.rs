use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use appointments::config::AppConfig;
use appointments::db;
use appointments::handlers;
use appointments::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    tracing::info!("using database {}", config.database_url);

    let addr = config.bind_addr();
    let state = Arc::new(AppState::new(conn));
    let app = handlers::router(state);

    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
