//! Core data models for Customer Workbench.
//!
//! [`InteractionRecord`] is the stored shape, including the fields only the
//! storage layer may assign (`id`, `version`, audit timestamps).
//! [`InteractionDto`] is the shape exchanged over the API boundary and has no
//! way to carry storage-managed fields. Paging types mirror the JSON envelope
//! the web client consumes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Channel through which a customer interaction happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InteractionType {
    Chat,
    Email,
    Ticket,
    Form,
}

impl InteractionType {
    pub const ALL: [InteractionType; 4] = [
        InteractionType::Chat,
        InteractionType::Email,
        InteractionType::Ticket,
        InteractionType::Form,
    ];

    /// The canonical upper-case name, as stored and as sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Chat => "CHAT",
            InteractionType::Email => "EMAIL",
            InteractionType::Ticket => "TICKET",
            InteractionType::Form => "FORM",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not an exact interaction type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interaction type: '{0}' (expected CHAT, EMAIL, TICKET or FORM)")]
pub struct ParseInteractionTypeError(pub String);

impl FromStr for InteractionType {
    type Err = ParseInteractionTypeError;

    /// Case-sensitive: `"chat"` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseInteractionTypeError(s.to_string()))
    }
}

/// A persisted interaction row.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRecord {
    /// Assigned by the store on insert.
    pub id: Option<i64>,
    pub product_id: i32,
    pub customer_id: i32,
    pub interaction_type: InteractionType,
    /// Semantically 1–5; not enforced.
    pub customer_rating: Option<i32>,
    pub feedback: Option<String>,
    pub interaction_date: Option<NaiveDateTime>,
    pub responses_from_customer_support: Option<String>,
    /// Optimistic-concurrency counter, store-managed.
    pub version: Option<i64>,
    /// Store-managed, set once on insert.
    pub date_created: Option<NaiveDateTime>,
    /// Store-managed, refreshed on every update.
    pub date_updated: Option<NaiveDateTime>,
}

/// Transport representation of an interaction.
///
/// Required business fields are optional here so that a missing value is
/// reported as a validation error naming the field instead of a generic
/// deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub product_id: Option<i32>,
    #[serde(default)]
    pub customer_id: Option<i32>,
    #[serde(default)]
    pub interaction_type: Option<InteractionType>,
    #[serde(default)]
    pub customer_rating: Option<i32>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub interaction_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub responses_from_customer_support: Option<String>,
}

/// Filters scoping a search. `customer_id` is mandatory at search time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub customer_id: Option<i32>,
    pub product_id: Option<i32>,
    pub interaction_type: Option<InteractionType>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(format!("invalid sort direction: '{}'", other)),
        }
    }
}

/// Record properties a page may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    ProductId,
    CustomerId,
    InteractionType,
    CustomerRating,
    InteractionDate,
    DateCreated,
    DateUpdated,
}

impl SortField {
    /// Column name in the `interaction_log` table.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::ProductId => "product_id",
            SortField::CustomerId => "customer_id",
            SortField::InteractionType => "interaction_type",
            SortField::CustomerRating => "customer_rating",
            SortField::InteractionDate => "interaction_date",
            SortField::DateCreated => "date_created",
            SortField::DateUpdated => "date_updated",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    /// Accepts the camelCase property names used by the API.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortField::Id),
            "productId" => Ok(SortField::ProductId),
            "customerId" => Ok(SortField::CustomerId),
            "interactionType" => Ok(SortField::InteractionType),
            "customerRating" => Ok(SortField::CustomerRating),
            "interactionDate" => Ok(SortField::InteractionDate),
            "dateCreated" => Ok(SortField::DateCreated),
            "dateUpdated" => Ok(SortField::DateUpdated),
            other => Err(format!("unknown sort property: '{}'", other)),
        }
    }
}

/// One `ORDER BY` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    /// Parses `field` or `field,asc|desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ',');
        let field: SortField = parts.next().unwrap_or_default().trim().parse()?;
        let direction = match parts.next() {
            Some(d) => d.trim().parse()?,
            None => Direction::Asc,
        };
        Ok(SortOrder { field, direction })
    }
}

/// Page window and ordering requested by a caller. `page` is 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    pub fn with_sort(mut self, order: SortOrder) -> Self {
        self.sort.push(order);
        self
    }

    /// Number of rows to skip before the window starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// One page of results plus the metadata the web client renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    /// 0-based page index.
    pub number: u32,
    pub size: u32,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let total_pages = if request.size == 0 {
            0
        } else {
            total_elements.div_ceil(u64::from(request.size))
        };
        let number_of_elements = content.len();
        Self {
            empty: content.is_empty(),
            content,
            total_elements,
            total_pages,
            number: request.page,
            size: request.size,
            number_of_elements,
            first: request.page == 0,
            last: u64::from(request.page) + 1 >= total_pages,
        }
    }

    /// Converts every item while keeping the page metadata.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_type_parse_is_case_sensitive() {
        assert_eq!("CHAT".parse::<InteractionType>(), Ok(InteractionType::Chat));
        assert_eq!("FORM".parse::<InteractionType>(), Ok(InteractionType::Form));
        assert!("chat".parse::<InteractionType>().is_err());
        assert!("SMS".parse::<InteractionType>().is_err());
    }

    #[test]
    fn test_dto_json_shape() {
        let json = r#"{
            "productId": 10,
            "customerId": 20,
            "interactionType": "EMAIL",
            "interactionDate": "2024-12-01T12:00:00"
        }"#;
        let dto: InteractionDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.product_id, Some(10));
        assert_eq!(dto.customer_id, Some(20));
        assert_eq!(dto.interaction_type, Some(InteractionType::Email));
        assert_eq!(dto.feedback, None);

        let out = serde_json::to_value(&dto).unwrap();
        assert_eq!(out["interactionType"], "EMAIL");
        assert_eq!(out["interactionDate"], "2024-12-01T12:00:00");
        assert!(out.get("version").is_none());
    }

    #[test]
    fn test_sort_order_parse() {
        let s: SortOrder = "interactionDate,desc".parse().unwrap();
        assert_eq!(s, SortOrder::desc(SortField::InteractionDate));
        let s: SortOrder = "customerRating".parse().unwrap();
        assert_eq!(s, SortOrder::asc(SortField::CustomerRating));
        assert!("interaction_date".parse::<SortOrder>().is_err());
        assert!("id,sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_page_metadata() {
        let req = PageRequest::new(1, 10);
        let page = Page::new(vec![1, 2, 3], &req, 13);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.number_of_elements, 3);
        assert!(!page.first);
        assert!(page.last);
        assert!(!page.empty);

        let empty: Page<i32> = Page::new(vec![], &PageRequest::new(0, 10), 0);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.first && empty.last && empty.empty);
    }

    #[test]
    fn test_page_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], &PageRequest::new(0, 2), 5);
        let mapped = page.map(|n| n.to_string());
        assert_eq!(mapped.content, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(mapped.total_elements, 5);
        assert_eq!(mapped.total_pages, 3);
        assert!(!mapped.last);
    }
}
