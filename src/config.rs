use anyhow::Result;
use sea_orm::Database;
use serde::Deserialize;

use crate::schemas::AppState;

/// Application configuration, layered from built-in defaults and the
/// environment (a `.env` file is honored when present).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
}

/// Load configuration from the environment
pub fn load_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = config::Config::builder()
        .set_default("database_url", "sqlite://finwise.db")?
        .set_default("bind_address", "0.0.0.0:3000")?
        .add_source(config::Environment::default())
        .build()?;

    Ok(config.try_deserialize()?)
}

/// Initialize application state
pub async fn initialize_app_state(database_url: &str) -> Result<AppState> {
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    Ok(AppState { db })
}
