//! Storage abstraction for interaction records.
//!
//! The [`InteractionStore`] trait is the persistence boundary consumed by
//! the service. Implementations assign `id`, `version` and the audit
//! timestamps themselves; whatever the caller puts in those fields is
//! ignored on insert.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::filter::FilterClause;
use crate::models::{InteractionRecord, Page, PageRequest};

/// Abstract storage backend.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`insert`](InteractionStore::insert) | Insert one record, returning it with storage fields set |
/// | [`insert_all`](InteractionStore::insert_all) | Insert a batch atomically |
/// | [`find_by_id`](InteractionStore::find_by_id) | Look up one record |
/// | [`find_page`](InteractionStore::find_page) | Filtered, sorted, paged query |
/// | [`count`](InteractionStore::count) | Total number of records |
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Insert a record. The returned record carries the assigned id,
    /// version and timestamps.
    async fn insert(&self, record: InteractionRecord) -> Result<InteractionRecord>;

    /// Insert every record or none of them. Returns the number written.
    async fn insert_all(&self, records: Vec<InteractionRecord>) -> Result<u64>;

    async fn find_by_id(&self, id: i64) -> Result<Option<InteractionRecord>>;

    /// Run a conjunctive filter and return the requested window.
    ///
    /// `page.sort` is applied in order, followed by `id` ascending as a
    /// tie-breaker. An empty `filter` matches every record.
    async fn find_page(
        &self,
        filter: &[FilterClause],
        page: &PageRequest,
    ) -> Result<Page<InteractionRecord>>;

    async fn count(&self) -> Result<u64>;
}
