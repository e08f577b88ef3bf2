//! Store trait for invoice persistence

use crate::core::invoice::{Invoice, InvoiceId, InvoiceInput};
use anyhow::Result;
use async_trait::async_trait;

/// Capability interface over the invoice collection
///
/// Implementations translate these operations to their backing store.
/// Handlers hold an `Arc<dyn InvoiceStore>` and never know which adapter
/// they are talking to.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Short name of the backend (e.g. "sqlite")
    fn backend(&self) -> &'static str;

    /// List every invoice, ordered by identifier
    async fn list(&self) -> Result<Vec<Invoice>>;

    /// Get an invoice by identifier
    async fn get(&self, id: InvoiceId) -> Result<Option<Invoice>>;

    /// Check whether an invoice exists
    async fn exists(&self, id: InvoiceId) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }

    /// Insert a new invoice
    ///
    /// The identifier is always generated by the store; any id carried by
    /// `input` is ignored.
    async fn insert(&self, input: &InvoiceInput) -> Result<Invoice>;

    /// Overwrite the row identified by `invoice.invoice_id`
    ///
    /// Returns `false` when no row matched.
    async fn update(&self, invoice: &Invoice) -> Result<bool>;

    /// Remove an invoice, returning the removed row
    async fn remove(&self, id: InvoiceId) -> Result<Option<Invoice>>;
}
