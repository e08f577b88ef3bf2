//! Router builder for the invoice resource

use crate::server::handlers::{
    InvoiceState, create_invoice, delete_invoice, get_invoice, list_invoices, update_invoice,
};
use axum::{Router, routing::get};

/// Build the invoice routes
///
/// - GET    /invoices       - List all invoices
/// - POST   /invoices       - Create (or overwrite) an invoice
/// - GET    /invoices/{id}  - Get a specific invoice
/// - PUT    /invoices/{id}  - Replace an invoice
/// - DELETE /invoices/{id}  - Delete an invoice
pub fn build_invoice_routes(state: InvoiceState) -> Router {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route(
            "/invoices/{id}",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .with_state(state)
}
