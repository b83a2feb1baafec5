//! SQLite-backed [`InteractionStore`] implementation.
//!
//! Filter clauses become a parameterized `WHERE … AND …` built with
//! [`sqlx::QueryBuilder`]; nothing from a request is ever spliced into the
//! SQL text except the fixed column names and operators of the clause
//! enums.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};

use customer_workbench_core::filter::{FilterClause, FilterValue};
use customer_workbench_core::models::{
    Direction, InteractionRecord, InteractionType, Page, PageRequest,
};
use customer_workbench_core::store::InteractionStore;

const COLUMNS: &str = "id, product_id, customer_id, interaction_type, customer_rating, feedback, \
                       interaction_date, responses_from_customer_support, version, date_created, date_updated";

/// SQLite implementation of the [`InteractionStore`] trait over the
/// `interaction_log` table.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_record(row: &SqliteRow) -> Result<InteractionRecord> {
    let kind: String = row.try_get("interaction_type")?;
    Ok(InteractionRecord {
        id: Some(row.try_get("id")?),
        product_id: row.try_get("product_id")?,
        customer_id: row.try_get("customer_id")?,
        interaction_type: kind
            .parse::<InteractionType>()
            .with_context(|| "Corrupt interaction_type column")?,
        customer_rating: row.try_get("customer_rating")?,
        feedback: row.try_get("feedback")?,
        interaction_date: row.try_get("interaction_date")?,
        responses_from_customer_support: row.try_get("responses_from_customer_support")?,
        version: Some(row.try_get("version")?),
        date_created: Some(row.try_get("date_created")?),
        date_updated: Some(row.try_get("date_updated")?),
    })
}

/// Inserts one row and returns its id. Storage-managed fields on `record`
/// are ignored.
async fn insert_row(
    conn: &mut SqliteConnection,
    record: &InteractionRecord,
    now: NaiveDateTime,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO interaction_log (product_id, customer_id, interaction_type, customer_rating,
                                     feedback, interaction_date, responses_from_customer_support,
                                     version, date_created, date_updated)
        VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(record.product_id)
    .bind(record.customer_id)
    .bind(record.interaction_type.as_str())
    .bind(record.customer_rating)
    .bind(&record.feedback)
    .bind(record.interaction_date)
    .bind(&record.responses_from_customer_support)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

fn push_where(qb: &mut QueryBuilder<'_, Sqlite>, filter: &[FilterClause]) {
    for (i, clause) in filter.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        qb.push(clause.field.column());
        qb.push(" ");
        qb.push(clause.op.sql());
        qb.push(" ");
        match clause.value {
            FilterValue::Int(v) => qb.push_bind(v),
            FilterValue::Type(t) => qb.push_bind(t.as_str()),
            FilterValue::Timestamp(ts) => qb.push_bind(ts),
        };
    }
}

#[async_trait]
impl InteractionStore for SqliteStore {
    async fn insert(&self, record: InteractionRecord) -> Result<InteractionRecord> {
        let now = Utc::now().naive_utc();
        let mut conn = self.pool.acquire().await?;
        let id = insert_row(&mut *conn, &record, now).await?;

        Ok(InteractionRecord {
            id: Some(id),
            version: Some(0),
            date_created: Some(now),
            date_updated: Some(now),
            ..record
        })
    }

    async fn insert_all(&self, records: Vec<InteractionRecord>) -> Result<u64> {
        let now = Utc::now().naive_utc();
        let mut tx = self.pool.begin().await?;
        for record in &records {
            insert_row(&mut *tx, record, now).await?;
        }
        tx.commit().await?;
        Ok(records.len() as u64)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<InteractionRecord>> {
        let row = sqlx::query(&format!("SELECT {} FROM interaction_log WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn find_page(
        &self,
        filter: &[FilterClause],
        page: &PageRequest,
    ) -> Result<Page<InteractionRecord>> {
        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM interaction_log");
        push_where(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM interaction_log", COLUMNS));
        push_where(&mut query, filter);
        query.push(" ORDER BY ");
        for order in &page.sort {
            query.push(order.field.column());
            query.push(match order.direction {
                Direction::Asc => " ASC, ",
                Direction::Desc => " DESC, ",
            });
        }
        query.push("id ASC LIMIT ");
        query.push_bind(i64::from(page.size));
        query.push(" OFFSET ");
        query.push_bind(page.offset() as i64);

        let rows = query.build().fetch_all(&self.pool).await?;
        let content = rows
            .iter()
            .map(row_to_record)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::new(content, page, total as u64))
    }

    async fn count(&self) -> Result<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM interaction_log")
            .fetch_one(&self.pool)
            .await?;
        Ok(total as u64)
    }
}
