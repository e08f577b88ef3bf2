//! # Invoice API
//!
//! A small HTTP service exposing CRUD operations over invoices, backed by a
//! relational store.
//!
//! ## Features
//!
//! - **Five REST endpoints** under `/invoices` with JSON bodies
//! - **Pluggable storage**: SQLite for local work, PostgreSQL in production,
//!   an in-memory store for tests
//! - **Versioned migrations** applied as an explicit startup step
//! - **OpenAPI document** at `/swagger/v1/swagger.json` with a Swagger UI
//! - **Environment-aware error pages**: server error details are hidden in production
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice_api::prelude::*;
//!
//! let config = AppConfig::load(None)?;
//! let handle = StoreHandle::connect(config.backend(), &config.store).await?;
//! handle.migrate().await?;
//!
//! ServerBuilder::new()
//!     .with_shared_store(handle.into_store())
//!     .with_environment(config.environment)
//!     .with_server_config(&config.server)
//!     .serve(&config.server.bind_addr)
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ApiError, ApiResult, ErrorResponse},
        invoice::{Invoice, InvoiceId, InvoiceInput},
        store::InvoiceStore,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryInvoiceStore, StoreHandle};
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresInvoiceStore;
    #[cfg(feature = "sqlite")]
    pub use crate::storage::SqliteInvoiceStore;

    // === Config ===
    pub use crate::config::{AppConfig, CreateMode, Environment, StoreBackend};

    // === Server ===
    pub use crate::server::{ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
}
