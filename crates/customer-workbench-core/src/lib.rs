//! # Customer Workbench Core
//!
//! Storage-agnostic logic for Customer Workbench: interaction models, the
//! record/DTO mapper, the search filter builder, the CSV upload format, the
//! store trait with an in-memory implementation, and the ingestion/search
//! service.
//!
//! This crate contains no tokio, sqlx, HTTP, or filesystem dependencies.

pub mod csv_format;
pub mod error;
pub mod filter;
pub mod mapper;
pub mod models;
pub mod service;
pub mod store;

pub use error::ServiceError;
pub use service::InteractionService;
