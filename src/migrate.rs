use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

/// Opens the configured database and applies the schema.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply_schema(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Creates the `interaction_log` table and its indexes. Idempotent.
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS interaction_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id INTEGER NOT NULL,
            customer_id INTEGER NOT NULL,
            interaction_type TEXT NOT NULL CHECK (length(interaction_type) <= 32),
            customer_rating INTEGER,
            feedback TEXT,
            interaction_date TEXT,
            responses_from_customer_support TEXT,
            version INTEGER NOT NULL DEFAULT 0,
            date_created TEXT NOT NULL,
            date_updated TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_interaction_log_customer_id ON interaction_log(customer_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_interaction_log_interaction_date ON interaction_log(interaction_date DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
