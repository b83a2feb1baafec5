//! Database overview for `cwb stats`.
//!
//! Prints the total number of stored interactions, a breakdown by
//! interaction type, and the span of interaction dates.

use anyhow::Result;
use chrono::NaiveDateTime;
use sqlx::Row;

use crate::config::Config;
use crate::db;

/// Run the stats command: query the database and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let service = db::open_service(config).await?;
    let total = service.count().await?;
    let pool = service.store().pool();

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Customer Workbench Database Stats");
    println!("=================================");
    println!();
    println!("  Database:      {}", config.db.path.display());
    println!("  Size:          {}", format_bytes(db_size));
    println!("  Interactions:  {}", total);

    let span = sqlx::query(
        "SELECT MIN(interaction_date) AS earliest, MAX(interaction_date) AS latest FROM interaction_log",
    )
    .fetch_one(pool)
    .await?;
    let earliest: Option<NaiveDateTime> = span.try_get("earliest")?;
    let latest: Option<NaiveDateTime> = span.try_get("latest")?;
    if let (Some(earliest), Some(latest)) = (earliest, latest) {
        println!("  Dates:         {} .. {}", earliest, latest);
    }

    let rows = sqlx::query(
        r#"
        SELECT interaction_type, COUNT(*) AS n, AVG(customer_rating) AS avg_rating
        FROM interaction_log
        GROUP BY interaction_type
        ORDER BY n DESC, interaction_type ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    if !rows.is_empty() {
        println!();
        println!("  By type:");
        println!("  {:<10} {:>8} {:>10}", "TYPE", "COUNT", "AVG RATING");
        println!("  {}", "-".repeat(30));
        for row in &rows {
            let kind: String = row.try_get("interaction_type")?;
            let n: i64 = row.try_get("n")?;
            let avg: Option<f64> = row.try_get("avg_rating")?;
            let avg = avg
                .map(|a| format!("{:.2}", a))
                .unwrap_or_else(|| "-".to_string());
            println!("  {:<10} {:>8} {:>10}", kind, n, avg);
        }
    }

    println!();
    pool.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
