//! In-memory [`InteractionStore`] implementation for tests and demos.
//!
//! Records live in a `Vec` behind `std::sync::RwLock`. Sorting follows
//! SQLite's NULL ordering (NULLs first ascending, last descending) so that
//! results match the SQLite store.

use std::cmp::Ordering;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;

use super::InteractionStore;
use crate::filter::{matches_all, FilterClause};
use crate::models::{Direction, InteractionRecord, Page, PageRequest, SortField};

struct Inner {
    records: Vec<InteractionRecord>,
    next_id: i64,
}

/// In-memory store for testing.
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn stamp(record: &mut InteractionRecord, id: i64) {
    let now = Utc::now().naive_utc();
    record.id = Some(id);
    record.version = Some(0);
    record.date_created = Some(now);
    record.date_updated = Some(now);
}

fn compare_by(field: SortField, a: &InteractionRecord, b: &InteractionRecord) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::ProductId => a.product_id.cmp(&b.product_id),
        SortField::CustomerId => a.customer_id.cmp(&b.customer_id),
        SortField::InteractionType => a.interaction_type.as_str().cmp(b.interaction_type.as_str()),
        SortField::CustomerRating => a.customer_rating.cmp(&b.customer_rating),
        SortField::InteractionDate => a.interaction_date.cmp(&b.interaction_date),
        SortField::DateCreated => a.date_created.cmp(&b.date_created),
        SortField::DateUpdated => a.date_updated.cmp(&b.date_updated),
    }
}

#[async_trait]
impl InteractionStore for InMemoryStore {
    async fn insert(&self, mut record: InteractionRecord) -> Result<InteractionRecord> {
        let mut inner = self.inner.write().map_err(|_| anyhow!("store lock poisoned"))?;
        let id = inner.next_id;
        inner.next_id += 1;
        stamp(&mut record, id);
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn insert_all(&self, records: Vec<InteractionRecord>) -> Result<u64> {
        let mut inner = self.inner.write().map_err(|_| anyhow!("store lock poisoned"))?;
        let count = records.len() as u64;
        for mut record in records {
            let id = inner.next_id;
            inner.next_id += 1;
            stamp(&mut record, id);
            inner.records.push(record);
        }
        Ok(count)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<InteractionRecord>> {
        let inner = self.inner.read().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(inner.records.iter().find(|r| r.id == Some(id)).cloned())
    }

    async fn find_page(
        &self,
        filter: &[FilterClause],
        page: &PageRequest,
    ) -> Result<Page<InteractionRecord>> {
        let mut matched: Vec<InteractionRecord> = {
            let inner = self.inner.read().map_err(|_| anyhow!("store lock poisoned"))?;
            inner
                .records
                .iter()
                .filter(|r| matches_all(filter, r))
                .cloned()
                .collect()
        };

        matched.sort_by(|a, b| {
            page.sort
                .iter()
                .map(|order| {
                    let ord = compare_by(order.field, a, b);
                    match order.direction {
                        Direction::Asc => ord,
                        Direction::Desc => ord.reverse(),
                    }
                })
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or_else(|| a.id.cmp(&b.id))
        });

        let total = matched.len() as u64;
        let content: Vec<InteractionRecord> = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .collect();

        Ok(Page::new(content, page, total))
    }

    async fn count(&self) -> Result<u64> {
        let inner = self.inner.read().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(inner.records.len() as u64)
    }
}
