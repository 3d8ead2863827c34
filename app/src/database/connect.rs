use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::config::Config;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection Error: {0}")]
    ConnectionError(#[from] DbErr),

    #[error("Configuration Error: {0}")]
    ConfigError(String),
}

pub fn validate_database_url(database_url: &str) -> Result<(), DatabaseError> {
    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        return Ok(());
    }

    Err(DatabaseError::ConfigError(
        "Invalid Database URL - It must start with postgres:// or postgresql://".to_string(),
    ))
}

pub async fn connect_database(config: &Config) -> Result<DatabaseConnection, DatabaseError> {
    validate_database_url(&config.database_url)?;

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    info!("Connected to database");

    Ok(db)
}

pub async fn run_migrations(connection: &DatabaseConnection) -> Result<(), DatabaseError> {
    Migrator::up(connection, None).await?;
    info!("Migrations applied");

    Ok(())
}
