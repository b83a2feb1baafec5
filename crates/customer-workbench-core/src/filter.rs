//! Conjunctive search filters.
//!
//! A search is an ordered list of [`FilterClause`]s, all of which must hold.
//! The list is built once from [`SearchCriteria`] and then handed to a store,
//! which translates it into its own query mechanism (SQL `WHERE … AND …` for
//! SQLite, [`FilterClause::matches`] for the in-memory store).

use chrono::NaiveDateTime;

use crate::error::{Result, ServiceError};
use crate::models::{InteractionRecord, InteractionType, SearchCriteria};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    CustomerId,
    ProductId,
    InteractionType,
    InteractionDate,
}

impl FilterField {
    pub fn column(&self) -> &'static str {
        match self {
            FilterField::CustomerId => "customer_id",
            FilterField::ProductId => "product_id",
            FilterField::InteractionType => "interaction_type",
            FilterField::InteractionDate => "interaction_date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
}

impl FilterOp {
    pub fn sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterValue {
    Int(i32),
    Type(InteractionType),
    Timestamp(NaiveDateTime),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterClause {
    pub field: FilterField,
    pub op: FilterOp,
    pub value: FilterValue,
}

impl FilterClause {
    pub fn new(field: FilterField, op: FilterOp, value: FilterValue) -> Self {
        Self { field, op, value }
    }

    /// Evaluates the clause against a record.
    ///
    /// A record without an interaction date never satisfies a date clause,
    /// matching SQL comparison against NULL.
    pub fn matches(&self, record: &InteractionRecord) -> bool {
        match (self.field, self.value) {
            (FilterField::CustomerId, FilterValue::Int(v)) => {
                compare(self.op, &record.customer_id, &v)
            }
            (FilterField::ProductId, FilterValue::Int(v)) => {
                compare(self.op, &record.product_id, &v)
            }
            (FilterField::InteractionType, FilterValue::Type(t)) => {
                self.op == FilterOp::Eq && record.interaction_type == t
            }
            (FilterField::InteractionDate, FilterValue::Timestamp(ts)) => record
                .interaction_date
                .is_some_and(|d| compare(self.op, &d, &ts)),
            _ => false,
        }
    }
}

fn compare<T: PartialOrd>(op: FilterOp, left: &T, right: &T) -> bool {
    match op {
        FilterOp::Eq => left == right,
        FilterOp::Gte => left >= right,
        FilterOp::Lte => left <= right,
    }
}

/// Builds the clause list for a search.
///
/// `customer_id` anchors every search and always comes first; the optional
/// criteria follow in a fixed order.
pub fn build_filter(criteria: &SearchCriteria) -> Result<Vec<FilterClause>> {
    let customer_id = criteria
        .customer_id
        .ok_or_else(|| ServiceError::invalid("customerId is required for search"))?;

    let mut clauses = vec![FilterClause::new(
        FilterField::CustomerId,
        FilterOp::Eq,
        FilterValue::Int(customer_id),
    )];

    if let Some(product_id) = criteria.product_id {
        clauses.push(FilterClause::new(
            FilterField::ProductId,
            FilterOp::Eq,
            FilterValue::Int(product_id),
        ));
    }
    if let Some(kind) = criteria.interaction_type {
        clauses.push(FilterClause::new(
            FilterField::InteractionType,
            FilterOp::Eq,
            FilterValue::Type(kind),
        ));
    }
    if let Some(start) = criteria.start_date {
        clauses.push(FilterClause::new(
            FilterField::InteractionDate,
            FilterOp::Gte,
            FilterValue::Timestamp(start),
        ));
    }
    if let Some(end) = criteria.end_date {
        clauses.push(FilterClause::new(
            FilterField::InteractionDate,
            FilterOp::Lte,
            FilterValue::Timestamp(end),
        ));
    }

    Ok(clauses)
}

/// True when the record satisfies every clause.
pub fn matches_all(clauses: &[FilterClause], record: &InteractionRecord) -> bool {
    clauses.iter().all(|c| c.matches(record))
}
