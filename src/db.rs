//! SQLite connection handling.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::sync::Arc;
use std::time::Duration;

use customer_workbench_core::InteractionService;

use crate::config::Config;
use crate::migrate;
use crate::sqlite_store::SqliteStore;

/// Opens a pool on `[db].path`, creating the file and its parent directory
/// when missing.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = &config.db.path;

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

    Ok(pool)
}

/// Connects, makes sure the schema exists, and wraps the pool in a service.
///
/// Used by every CLI command that reads or writes interactions.
pub async fn open_service(config: &Config) -> Result<InteractionService<SqliteStore>> {
    let pool = connect(config).await?;
    migrate::apply_schema(&pool).await?;
    Ok(InteractionService::new(Arc::new(SqliteStore::new(pool))))
}
