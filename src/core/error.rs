//! Typed error handling for the invoice API
//!
//! Handlers return [`ApiError`] and never build error responses by hand.
//! Each category knows its HTTP status and a stable error code, so clients
//! can match on `code` rather than parsing messages.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: malformed identifiers or bodies (400)
//! - [`InvoiceError`]: missing or conflicting invoices (404, 409)
//! - [`StorageError`]: backing store failures and write conflicts (500)
//!
//! # Example
//!
//! ```rust,ignore
//! async fn load(store: &dyn InvoiceStore, id: InvoiceId) -> ApiResult<Invoice> {
//!     store
//!         .get(id)
//!         .await
//!         .map_err(|e| ApiError::storage(store.backend(), e))?
//!         .ok_or(ApiError::Invoice(InvoiceError::NotFound { id }))
//! }
//! ```

use crate::core::invoice::InvoiceId;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// The main error type of the API
#[derive(Debug)]
pub enum ApiError {
    /// Input validation errors
    Validation(ValidationError),

    /// Invoice lookup and identity errors
    Invoice(InvoiceError),

    /// Storage backend errors
    Storage(StorageError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::Invoice(e) => write!(f, "{}", e),
            ApiError::Storage(e) => write!(f, "{}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Validation(e) => Some(e),
            ApiError::Invoice(e) => Some(e),
            ApiError::Storage(e) => Some(e),
            ApiError::Internal(_) => None,
        }
    }
}

/// Error body returned for every failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    #[schema(example = "INVOICE_NOT_FOUND")]
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Generic body used when server error details must not leak
    pub fn internal() -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: "An internal error occurred while processing the request".to_string(),
            details: None,
        }
    }
}

impl ApiError {
    /// Wrap a store failure
    pub fn storage(backend: &str, err: anyhow::Error) -> Self {
        ApiError::Storage(StorageError::QueryFailed {
            backend: backend.to_string(),
            message: format!("{:#}", err),
        })
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Invoice(e) => e.status_code(),
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(e) => e.error_code(),
            ApiError::Invoice(e) => e.error_code(),
            ApiError::Storage(e) => e.error_code(),
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Invoice(InvoiceError::NotFound { id })
            | ApiError::Invoice(InvoiceError::AlreadyExists { id }) => {
                Some(serde_json::json!({ "invoiceId": id }))
            }
            ApiError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            ApiError::Validation(ValidationError::IdMismatch { path_id, body_id }) => {
                Some(serde_json::json!({ "pathId": path_id, "bodyId": body_id }))
            }
            ApiError::Storage(StorageError::WriteConflict { id }) => {
                Some(serde_json::json!({ "invoiceId": id }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// Path identifier is not a positive integer
    InvalidId { value: String },

    /// Body could not be parsed
    InvalidJson { message: String },

    /// Body parsed but failed field rules
    FieldErrors(Vec<FieldValidationError>),

    /// Body identifier differs from the path identifier
    IdMismatch {
        path_id: InvoiceId,
        body_id: InvoiceId,
    },

    /// Body identifier is required but absent
    MissingId,
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidId { value } => {
                write!(f, "Invalid invoice id '{}': expected a positive integer", value)
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid request body: {}", message)
            }
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::IdMismatch { path_id, body_id } => {
                write!(
                    f,
                    "Invoice id in body ({}) does not match id in path ({})",
                    body_id, path_id
                )
            }
            ValidationError::MissingId => {
                write!(f, "Invoice id is required in the request body")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidId { .. } => "INVALID_ID",
            ValidationError::InvalidJson { .. } => "INVALID_BODY",
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::IdMismatch { .. } => "ID_MISMATCH",
            ValidationError::MissingId => "MISSING_ID",
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        // field_errors() is backed by a HashMap
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

// =============================================================================
// Invoice Errors
// =============================================================================

/// Errors related to invoice identity
#[derive(Debug)]
pub enum InvoiceError {
    /// Invoice was not found
    NotFound { id: InvoiceId },

    /// Invoice already exists (strict create)
    AlreadyExists { id: InvoiceId },
}

impl fmt::Display for InvoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceError::NotFound { id } => write!(f, "Invoice with id '{}' not found", id),
            InvoiceError::AlreadyExists { id } => {
                write!(f, "Invoice with id '{}' already exists", id)
            }
        }
    }
}

impl std::error::Error for InvoiceError {}

impl InvoiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            InvoiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InvoiceError::AlreadyExists { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            InvoiceError::NotFound { .. } => "INVOICE_NOT_FOUND",
            InvoiceError::AlreadyExists { .. } => "INVOICE_ALREADY_EXISTS",
        }
    }
}

impl From<InvoiceError> for ApiError {
    fn from(err: InvoiceError) -> Self {
        ApiError::Invoice(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug)]
pub enum StorageError {
    /// Query execution error
    QueryFailed { backend: String, message: String },

    /// An update matched no row although the invoice still exists
    WriteConflict { id: InvoiceId },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::QueryFailed { backend, message } => {
                write!(f, "{} query error: {}", backend, message)
            }
            StorageError::WriteConflict { id } => {
                write!(f, "Concurrent write detected while updating invoice '{}'", id)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::QueryFailed { .. } => "STORAGE_ERROR",
            StorageError::WriteConflict { .. } => "WRITE_CONFLICT",
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;
