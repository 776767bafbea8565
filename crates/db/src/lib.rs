//! Database layer for warbler.
//!
//! Entities, migrations and repositories for the five tables (`users`,
//! `posts`, `media`, `likes`, `follow_edges`), plus demo seeding.

pub mod entities;
pub mod migrations;
pub mod repositories;
pub mod seed;
pub mod test_utils;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::log::LevelFilter;
use warbler_common::{config::DatabaseConfig, AppError};

/// Pool sizing and timeouts for the given database settings.
#[must_use]
pub fn connect_options(config: &DatabaseConfig) -> ConnectOptions {
    let mut opt = ConnectOptions::new(&config.url);

    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    opt
}

/// Open the connection pool.
pub async fn init(config: &DatabaseConfig) -> Result<DatabaseConnection, AppError> {
    Database::connect(connect_options(config))
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}
