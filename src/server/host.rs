//! Server host for transport-agnostic API exposure
//!
//! The `ServerHost` holds everything an exposure needs to serve the API:
//! the store, the deployment mode and the request-level options. It knows
//! nothing about HTTP routing.

use crate::config::{CreateMode, Environment};
use crate::core::store::InvoiceStore;
use crate::server::handlers::InvoiceState;
use std::path::PathBuf;
use std::sync::Arc;

/// Host context containing all application state
pub struct ServerHost {
    /// Store shared by every request
    pub store: Arc<dyn InvoiceStore>,

    /// Deployment mode, fixed for the process lifetime
    pub environment: Environment,

    /// Semantics of `POST /invoices` for known ids
    pub create_mode: CreateMode,

    /// Directory served for unmatched paths
    pub static_dir: Option<PathBuf>,

    /// Whether to mount the OpenAPI document and Swagger UI
    pub docs_enabled: bool,
}

impl ServerHost {
    pub fn new(store: Arc<dyn InvoiceStore>) -> Self {
        Self {
            store,
            environment: Environment::default(),
            create_mode: CreateMode::default(),
            static_dir: None,
            docs_enabled: true,
        }
    }

    /// Handler state derived from this host
    pub fn invoice_state(&self) -> InvoiceState {
        InvoiceState::new(self.store.clone(), self.create_mode)
    }

    /// Name of the backend serving requests
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }
}
