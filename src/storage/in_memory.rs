//! In-memory implementation of InvoiceStore for testing and development

use crate::core::invoice::{Invoice, InvoiceId, InvoiceInput};
use crate::core::store::InvoiceStore;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

#[derive(Debug)]
struct Table {
    rows: BTreeMap<InvoiceId, Invoice>,
    /// Last identifier handed out; never decremented so ids are not reused
    last_id: InvoiceId,
}

/// In-memory invoice store
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Cloning shares the underlying table.
#[derive(Clone, Debug)]
pub struct InMemoryInvoiceStore {
    table: Arc<RwLock<Table>>,
}

impl InMemoryInvoiceStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(Table {
                rows: BTreeMap::new(),
                last_id: 0,
            })),
        }
    }
}

impl Default for InMemoryInvoiceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: InvoiceId) -> Result<Option<Invoice>> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(table.rows.get(&id).cloned())
    }

    async fn insert(&self, input: &InvoiceInput) -> Result<Invoice> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let id = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| anyhow!("Invoice id space exhausted"))?;
        table.last_id = id;

        let invoice = input.clone().into_invoice(id);
        table.rows.insert(id, invoice.clone());

        Ok(invoice)
    }

    async fn update(&self, invoice: &Invoice) -> Result<bool> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        match table.rows.get_mut(&invoice.invoice_id) {
            Some(row) => {
                *row = invoice.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: InvoiceId) -> Result<Option<Invoice>> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(table.rows.remove(&id))
    }
}
