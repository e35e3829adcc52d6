//! # biztime
//!
//! A REST API for companies and the invoices billed to them, backed by a
//! relational store that enforces referential integrity.
//!
//! ## Features
//!
//! - **Companies**: list, fetch, create, replace and delete by `code`
//! - **Invoices**: list, fetch with the owning company embedded, create,
//!   change amount and delete by numeric `id`
//! - **Referential integrity**: invoices always reference an existing
//!   company; deleting a company cascades to its invoices
//! - **Uniform errors**: every failure is `{error: {message, status}}` with a
//!   configurable status for validation failures
//! - **Pluggable storage**: in-memory (default) or PostgreSQL (`postgres`
//!   feature)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use biztime::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_store(InMemoryStore::new())
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod entities;
pub mod handlers;
pub mod server;
pub mod storage;
pub mod telemetry;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ApiError, ApiResult, CompanyService, ErrorTranslator, InvoiceService, StorageError,
        StorageResult, ValidatedJson, ValidationStatus,
    };

    // === Entities ===
    pub use crate::entities::{
        Company, CompanyChanges, CompanySummary, Invoice, InvoiceDetail, InvoiceSummary,
        NewCompany, NewInvoice,
    };

    // === Handlers ===
    pub use crate::handlers::{AppState, resource_routes};

    // === Storage ===
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;

    // === Config ===
    pub use crate::config::{AppConfig, StorageBackend};

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};

    // === Axum ===
    pub use axum::{
        Router,
        routing::{delete, get, post, put},
    };
}
