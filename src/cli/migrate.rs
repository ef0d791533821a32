use crate::config::{ServerSettings, connect_database, migrate_database};

/// Connect and run all pending migrations
pub async fn run_migrations(settings: &ServerSettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = connect_database(&settings.database_url).await?;
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");

    Ok(())
}
