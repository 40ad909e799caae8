mod config;
mod db;
mod routes;
mod state;

use std::sync::Arc;

use labstock::{MemoryStore, Store};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to bind listener: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // A missing .env file is normal outside development.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env()?;

    let store: Arc<dyn Store> = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = db::init_pool(database_url, config.db_max_connections).await?;
            tracing::info!(max_connections = config.db_max_connections, "postgres store ready");
            Arc::new(db::PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store, data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = state::AppState::new(store);
    let app = routes::app(state, config.import_max_bytes);
    let listener = tokio::net::TcpListener::bind(config.listen).await?;

    tracing::info!(listen = %config.listen, "labstock listening");
    axum::serve(listener, app).await?;
    Ok(())
}
