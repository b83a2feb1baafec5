//! # Customer Workbench
//!
//! Stores customer-interaction records (chats, emails, tickets, forms) and
//! serves them to a support web client.
//!
//! Records arrive as CSV uploads, JSON batches, or single JSON objects and
//! are searched per customer with optional product, type, and date-range
//! filters, paged and sorted.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────────┐   ┌──────────────┐
//! │  HTTP (axum) │──▶│  InteractionService  │──▶│ SqliteStore  │
//! │  CLI  (cwb)  │   │  (core crate)        │   │ interaction_ │
//! └──────────────┘   └──────────────────────┘   │ log table    │
//!                                                └──────────────┘
//! ```
//!
//! Domain logic (models, mapper, filter builder, CSV format, service, and an
//! in-memory store) lives in `customer-workbench-core`. This crate adds the
//! SQLite store, configuration, the HTTP surface, and the CLI commands.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite-backed store |
//! | [`server`] | REST API |
//! | [`seed`] | Sample data |
//! | [`ingest`] | `cwb ingest` |
//! | [`get`] | `cwb get` |
//! | [`search`] | `cwb search` |
//! | [`stats`] | `cwb stats` |

pub mod config;
pub mod db;
pub mod get;
pub mod ingest;
pub mod migrate;
pub mod search;
pub mod seed;
pub mod server;
pub mod sqlite_store;
pub mod stats;
