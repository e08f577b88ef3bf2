//! Axum extractors for invoice requests
//!
//! Both extractors reject with [`ApiError`], so a malformed request is turned
//! into a structured 400 before the handler body (and the store) is reached.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::core::error::{ApiError, ValidationError};
use crate::core::invoice::InvoiceId;

/// Parse a raw path segment into an invoice identifier
///
/// Only plain ASCII digits forming a strictly positive integer that fits the
/// identifier type are accepted. Signs and whitespace are rejected.
pub fn parse_invoice_id(raw: &str) -> Result<InvoiceId, ValidationError> {
    let invalid = || ValidationError::InvalidId {
        value: raw.to_string(),
    };

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    match raw.parse::<InvoiceId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid()),
    }
}

/// Extractor for the `{id}` path segment
///
/// ```rust,ignore
/// async fn get_invoice(InvoiceIdParam(id): InvoiceIdParam) -> ApiResult<Json<Invoice>> { .. }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceIdParam(pub InvoiceId);

impl<S> FromRequestParts<S> for InvoiceIdParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ValidationError::InvalidId {
                value: e.body_text(),
            })?;

        Ok(Self(parse_invoice_id(&raw)?))
    }
}

/// JSON body extractor that also runs `validator` rules
///
/// Any rejection from the JSON layer (syntax, missing field, wrong content
/// type) is reported as `INVALID_BODY`; rule violations are reported as
/// `VALIDATION_ERROR` with per-field details.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ValidationError::InvalidJson {
                message: e.body_text(),
            })?;

        value.validate().map_err(ValidationError::from)?;

        Ok(Self(value))
    }
}
