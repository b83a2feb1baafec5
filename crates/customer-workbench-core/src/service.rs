//! Ingestion and search over an [`InteractionStore`].
//!
//! Every operation is a single request/response with no state kept between
//! calls. Bulk ingestion validates every item before anything is written
//! and then persists the whole batch through
//! [`InteractionStore::insert_all`], so a batch is either fully stored or
//! not stored at all.

use std::sync::Arc;

use crate::csv_format;
use crate::error::{Result, ServiceError};
use crate::filter::build_filter;
use crate::mapper::{to_dto, to_record};
use crate::models::{
    InteractionDto, InteractionRecord, Page, PageRequest, SearchCriteria, SortField, SortOrder,
};
use crate::store::InteractionStore;

/// Ordering applied when a search request names none.
pub fn default_sort() -> SortOrder {
    SortOrder::desc(SortField::InteractionDate)
}

pub struct InteractionService<S: InteractionStore> {
    store: Arc<S>,
}

impl<S: InteractionStore> Clone for InteractionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: InteractionStore> InteractionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Parses a CSV upload and stores every row. Returns the row count.
    pub async fn ingest_csv(&self, bytes: &[u8]) -> Result<u64> {
        if bytes.is_empty() {
            return Err(ServiceError::invalid("CSV file must not be empty"));
        }

        let rows = csv_format::parse(bytes)?;
        if rows.is_empty() {
            return Err(ServiceError::invalid(
                "CSV file is empty or missing required header",
            ));
        }

        self.persist_batch(&rows).await
    }

    /// Stores a JSON batch. Returns the item count.
    pub async fn ingest_json(&self, payload: Vec<InteractionDto>) -> Result<u64> {
        if payload.is_empty() {
            return Err(ServiceError::invalid("JSON payload must not be empty"));
        }

        self.persist_batch(&payload).await
    }

    async fn persist_batch(&self, items: &[InteractionDto]) -> Result<u64> {
        let records = items
            .iter()
            .map(to_record)
            .collect::<Result<Vec<InteractionRecord>>>()?;
        let written = self.store.insert_all(records).await?;
        Ok(written)
    }

    /// Stores one interaction and returns it with its assigned id.
    pub async fn create(&self, dto: Option<InteractionDto>) -> Result<InteractionDto> {
        let dto = dto.ok_or_else(|| ServiceError::invalid("interaction is required"))?;
        let record = to_record(&dto)?;
        let saved = self.store.insert(record).await?;
        Ok(to_dto(&saved))
    }

    pub async fn search(
        &self,
        criteria: Option<&SearchCriteria>,
        page: &PageRequest,
    ) -> Result<Page<InteractionDto>> {
        let criteria =
            criteria.ok_or_else(|| ServiceError::invalid("customerId is required for search"))?;
        let filter = build_filter(criteria)?;

        let page = if page.sort.is_empty() {
            page.clone().with_sort(default_sort())
        } else {
            page.clone()
        };

        let records = self.store.find_page(&filter, &page).await?;
        Ok(records.map(|r| to_dto(&r)))
    }

    pub async fn find_by_id(&self, id: Option<i64>) -> Result<InteractionDto> {
        let id = id.ok_or_else(|| ServiceError::invalid("id is required"))?;
        let record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found(format!("Interaction with id {} not found", id))
            })?;
        Ok(to_dto(&record))
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(self.store.count().await?)
    }
}
