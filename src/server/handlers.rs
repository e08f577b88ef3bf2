//! HTTP handlers for the invoice resource
//!
//! Each handler is a single read-modify-write against the store. Malformed
//! input never reaches the store: the extractors reject it first.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::CreateMode;
use crate::core::error::{
    ApiError, ApiResult, ErrorResponse, InvoiceError, StorageError, ValidationError,
};
use crate::core::extractors::{InvoiceIdParam, ValidatedJson};
use crate::core::invoice::{Invoice, InvoiceInput};
use crate::core::store::InvoiceStore;

/// Base path of the invoice resource
pub const INVOICES_PATH: &str = "/invoices";

/// State shared by the invoice handlers
#[derive(Clone)]
pub struct InvoiceState {
    pub store: Arc<dyn InvoiceStore>,
    pub create_mode: CreateMode,
}

impl InvoiceState {
    pub fn new(store: Arc<dyn InvoiceStore>, create_mode: CreateMode) -> Self {
        Self { store, create_mode }
    }

    fn storage_error(&self, err: anyhow::Error) -> ApiError {
        ApiError::storage(self.store.backend(), err)
    }
}

/// List all invoices
#[utoipa::path(
    get,
    path = "/invoices",
    tag = "invoices",
    responses(
        (status = 200, description = "Every stored invoice", body = [Invoice])
    )
)]
pub async fn list_invoices(State(state): State<InvoiceState>) -> ApiResult<Json<Vec<Invoice>>> {
    let invoices = state
        .store
        .list()
        .await
        .map_err(|e| state.storage_error(e))?;

    Ok(Json(invoices))
}

/// Get a specific invoice
#[utoipa::path(
    get,
    path = "/invoices/{id}",
    tag = "invoices",
    params(("id" = i32, Path, description = "Invoice identifier")),
    responses(
        (status = 200, description = "The invoice", body = Invoice),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "No invoice with this identifier", body = ErrorResponse)
    )
)]
pub async fn get_invoice(
    State(state): State<InvoiceState>,
    InvoiceIdParam(id): InvoiceIdParam,
) -> ApiResult<Json<Invoice>> {
    state
        .store
        .get(id)
        .await
        .map_err(|e| state.storage_error(e))?
        .map(Json)
        .ok_or_else(|| InvoiceError::NotFound { id }.into())
}

/// Create an invoice, or overwrite the one whose id the body carries
///
/// In `upsert` mode a body id that exists overwrites that row (200); any
/// other body is inserted with a store-generated id (201 with `Location`).
/// In `insert_only` mode a body id that exists is refused with 409.
///
/// Sample request:
///
/// ```text
/// POST /invoices
/// {
///    "customerId": 1,
///    "invoiceDate": "2020-01-01",
///    "total": 12
/// }
/// ```
#[utoipa::path(
    post,
    path = "/invoices",
    tag = "invoices",
    request_body = InvoiceInput,
    responses(
        (status = 201, description = "Returns the newly created invoice", body = Invoice,
            headers(("location" = String, description = "URL of the new invoice"))),
        (status = 200, description = "Existing invoice overwritten", body = Invoice),
        (status = 400, description = "Missing or malformed body", body = ErrorResponse),
        (status = 409, description = "Invoice exists (insert_only mode)", body = ErrorResponse)
    )
)]
pub async fn create_invoice(
    State(state): State<InvoiceState>,
    ValidatedJson(input): ValidatedJson<InvoiceInput>,
) -> ApiResult<Response> {
    if let Some(id) = input.supplied_id() {
        match state.create_mode {
            CreateMode::Upsert => {
                let invoice = input.clone().into_invoice(id);
                let replaced = state
                    .store
                    .update(&invoice)
                    .await
                    .map_err(|e| state.storage_error(e))?;

                if replaced {
                    info!(invoice_id = id, "Invoice overwritten");
                    return Ok((StatusCode::OK, Json(invoice)).into_response());
                }
            }
            CreateMode::InsertOnly => {
                let exists = state
                    .store
                    .exists(id)
                    .await
                    .map_err(|e| state.storage_error(e))?;

                if exists {
                    return Err(InvoiceError::AlreadyExists { id }.into());
                }
            }
        }
    }

    let created = state
        .store
        .insert(&input)
        .await
        .map_err(|e| state.storage_error(e))?;

    info!(invoice_id = created.invoice_id, "Invoice created");

    let location = format!("{}/{}", INVOICES_PATH, created.invoice_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    )
        .into_response())
}

/// Replace an invoice
///
/// The body must carry the same id as the path.
#[utoipa::path(
    put,
    path = "/invoices/{id}",
    tag = "invoices",
    params(("id" = i32, Path, description = "Invoice identifier")),
    request_body = InvoiceInput,
    responses(
        (status = 204, description = "Invoice updated"),
        (status = 400, description = "Malformed input or id mismatch", body = ErrorResponse),
        (status = 404, description = "No invoice with this identifier", body = ErrorResponse),
        (status = 500, description = "Concurrent write detected", body = ErrorResponse)
    )
)]
pub async fn update_invoice(
    State(state): State<InvoiceState>,
    InvoiceIdParam(id): InvoiceIdParam,
    ValidatedJson(input): ValidatedJson<InvoiceInput>,
) -> ApiResult<StatusCode> {
    let body_id = input.supplied_id().ok_or(ValidationError::MissingId)?;
    if body_id != id {
        return Err(ValidationError::IdMismatch {
            path_id: id,
            body_id,
        }
        .into());
    }

    let invoice = input.into_invoice(id);
    let updated = state
        .store
        .update(&invoice)
        .await
        .map_err(|e| state.storage_error(e))?;

    if updated {
        return Ok(StatusCode::NO_CONTENT);
    }

    // Nothing matched: either the row is gone or it changed under us
    let exists = state
        .store
        .exists(id)
        .await
        .map_err(|e| state.storage_error(e))?;

    if !exists {
        warn!(invoice_id = id, "Update of missing invoice");
        return Err(InvoiceError::NotFound { id }.into());
    }

    Err(StorageError::WriteConflict { id }.into())
}

/// Delete a specific invoice
#[utoipa::path(
    delete,
    path = "/invoices/{id}",
    tag = "invoices",
    params(("id" = i32, Path, description = "Invoice identifier")),
    responses(
        (status = 200, description = "The deleted invoice", body = Invoice),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "No invoice with this identifier", body = ErrorResponse)
    )
)]
pub async fn delete_invoice(
    State(state): State<InvoiceState>,
    InvoiceIdParam(id): InvoiceIdParam,
) -> ApiResult<Json<Invoice>> {
    let removed = state
        .store
        .remove(id)
        .await
        .map_err(|e| state.storage_error(e))?
        .ok_or(InvoiceError::NotFound { id })?;

    info!(invoice_id = id, "Invoice deleted");
    Ok(Json(removed))
}
