//! SQLite storage backend using sqlx.
//!
//! Provides `SqliteInvoiceStore`, the local file database used outside
//! production.
//!
//! # Feature flag
//!
//! This module is gated behind the `sqlite` feature flag (enabled by default).
//!
//! # Schema
//!
//! The `invoices` table uses `INTEGER PRIMARY KEY AUTOINCREMENT` so that
//! identifiers of deleted rows are never handed out again. Dates are stored
//! as ISO-8601 `TEXT`.

use super::{INVOICE_COLUMNS, InvoiceRow};
use crate::core::invoice::{Invoice, InvoiceId, InvoiceInput};
use crate::core::store::InvoiceStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::time::Duration;

/// Embedded SQLite migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations/sqlite");

/// Open (creating if missing) a SQLite database file
pub async fn connect(
    path: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open SQLite database '{}'", path))
}

/// Open a private in-memory SQLite database
///
/// The pool is pinned to a single connection that never expires, otherwise
/// each new connection would see its own empty database.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .context("Failed to open in-memory SQLite database")
}

/// Apply pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("Failed to apply SQLite migrations")
}

/// Invoice store backed by SQLite
///
/// # Example
///
/// ```rust,ignore
/// let pool = sqlite::connect("localdatabase.db", 5, Duration::from_secs(5)).await?;
/// sqlite::run_migrations(&pool).await?;
/// let store = SqliteInvoiceStore::new(pool);
/// ```
#[derive(Clone, Debug)]
pub struct SqliteInvoiceStore {
    pool: SqlitePool,
}

impl SqliteInvoiceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl InvoiceStore for SqliteInvoiceStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        let sql = format!("SELECT {} FROM invoices ORDER BY invoice_id", INVOICE_COLUMNS);
        let rows = sqlx::query_as::<_, InvoiceRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list invoices")?;

        Ok(rows.into_iter().map(Invoice::from).collect())
    }

    async fn get(&self, id: InvoiceId) -> Result<Option<Invoice>> {
        let sql = format!("SELECT {} FROM invoices WHERE invoice_id = ?", INVOICE_COLUMNS);
        let row = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get invoice")?;

        Ok(row.map(Invoice::from))
    }

    async fn exists(&self, id: InvoiceId) -> Result<bool> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM invoices WHERE invoice_id = ?")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .context("Failed to check invoice existence")?;

        Ok(count > 0)
    }

    async fn insert(&self, input: &InvoiceInput) -> Result<Invoice> {
        let sql = format!(
            "INSERT INTO invoices (customer_id, invoice_date, total) VALUES (?, ?, ?) RETURNING {}",
            INVOICE_COLUMNS
        );
        let row = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(input.customer_id)
            .bind(input.invoice_date)
            .bind(input.total)
            .fetch_one(&self.pool)
            .await
            .context("Failed to insert invoice")?;

        Ok(Invoice::from(row))
    }

    async fn update(&self, invoice: &Invoice) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE invoices SET customer_id = ?, invoice_date = ?, total = ? WHERE invoice_id = ?",
        )
        .bind(invoice.customer_id)
        .bind(invoice.invoice_date)
        .bind(invoice.total)
        .bind(invoice.invoice_id)
        .execute(&self.pool)
        .await
        .context("Failed to update invoice")?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, id: InvoiceId) -> Result<Option<Invoice>> {
        let sql = format!(
            "DELETE FROM invoices WHERE invoice_id = ? RETURNING {}",
            INVOICE_COLUMNS
        );
        let row = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to delete invoice")?;

        Ok(row.map(Invoice::from))
    }
}
