use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing::{debug, info};

/// Creates the schema on the given database using the bundled migrations.
pub async fn init_database(database_url: &str) -> Result<()> {
    info!("Initializing database: {}", database_url);

    let db = Database::connect(database_url).await?;
    debug!("Database connection established");

    Migrator::up(&db, None).await?;
    info!("Database initialized successfully");
    Ok(())
}
