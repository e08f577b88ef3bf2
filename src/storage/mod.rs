//! Storage implementations for different backends
//!
//! [`StoreHandle`] is the construction-time choice between adapters. It is
//! built from [`StoreConfig`], migrated once as an explicit startup step,
//! then handed to the server as an `Arc<dyn InvoiceStore>`.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryInvoiceStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresInvoiceStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteInvoiceStore;

use crate::config::{ConfigError, StoreBackend, StoreConfig};
use crate::core::store::InvoiceStore;
use anyhow::Result;
use std::sync::Arc;

/// Column list shared by the SQL adapters, in [`InvoiceRow`] order
#[cfg(any(feature = "postgres", feature = "sqlite"))]
pub(crate) const INVOICE_COLUMNS: &str = "invoice_id, customer_id, invoice_date, total";

/// Raw row as decoded by sqlx
#[cfg(any(feature = "postgres", feature = "sqlite"))]
pub(crate) type InvoiceRow = (i32, i32, chrono::NaiveDate, f64);

#[cfg(any(feature = "postgres", feature = "sqlite"))]
impl From<InvoiceRow> for crate::core::invoice::Invoice {
    fn from((invoice_id, customer_id, invoice_date, total): InvoiceRow) -> Self {
        Self {
            invoice_id,
            customer_id,
            invoice_date,
            total,
        }
    }
}

/// A connected store, before it is type-erased for the handlers
#[derive(Clone, Debug)]
pub enum StoreHandle {
    Memory(InMemoryInvoiceStore),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteInvoiceStore),
    #[cfg(feature = "postgres")]
    Postgres(PostgresInvoiceStore),
}

impl StoreHandle {
    /// Connect to the backend selected by `config`
    ///
    /// Does not touch the schema; call [`StoreHandle::migrate`] before serving.
    pub async fn connect(backend: StoreBackend, config: &StoreConfig) -> Result<Self> {
        tracing::info!(backend = backend.as_str(), "Opening invoice store");

        match backend {
            StoreBackend::Memory => Ok(StoreHandle::Memory(InMemoryInvoiceStore::new())),

            #[cfg(feature = "sqlite")]
            StoreBackend::Sqlite => {
                let pool = sqlite::connect(
                    &config.sqlite_path,
                    config.max_connections,
                    config.acquire_timeout(),
                )
                .await?;
                Ok(StoreHandle::Sqlite(SqliteInvoiceStore::new(pool)))
            }

            #[cfg(feature = "postgres")]
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or(ConfigError::MissingDatabaseUrl)?;
                let pool =
                    postgres::connect(url, config.max_connections, config.acquire_timeout())
                        .await?;
                Ok(StoreHandle::Postgres(PostgresInvoiceStore::new(pool)))
            }

            #[allow(unreachable_patterns)]
            other => Err(ConfigError::BackendUnavailable {
                backend: other.as_str(),
                feature: other.as_str(),
            }
            .into()),
        }
    }

    /// Apply outstanding schema migrations
    ///
    /// A failure here must abort startup.
    pub async fn migrate(&self) -> Result<()> {
        match self {
            StoreHandle::Memory(_) => Ok(()),
            #[cfg(feature = "sqlite")]
            StoreHandle::Sqlite(store) => sqlite::run_migrations(store.pool()).await,
            #[cfg(feature = "postgres")]
            StoreHandle::Postgres(store) => postgres::run_migrations(store.pool()).await,
        }?;

        tracing::info!(backend = self.backend(), "Schema is up to date");
        Ok(())
    }

    pub fn backend(&self) -> &'static str {
        self.as_store().backend()
    }

    fn as_store(&self) -> &dyn InvoiceStore {
        match self {
            StoreHandle::Memory(store) => store,
            #[cfg(feature = "sqlite")]
            StoreHandle::Sqlite(store) => store,
            #[cfg(feature = "postgres")]
            StoreHandle::Postgres(store) => store,
        }
    }

    /// Type-erase into the shared store used by the handlers
    pub fn into_store(self) -> Arc<dyn InvoiceStore> {
        match self {
            StoreHandle::Memory(store) => Arc::new(store),
            #[cfg(feature = "sqlite")]
            StoreHandle::Sqlite(store) => Arc::new(store),
            #[cfg(feature = "postgres")]
            StoreHandle::Postgres(store) => Arc::new(store),
        }
    }
}
