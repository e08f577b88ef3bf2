//! Error page behaviour per deployment mode
//!
//! Development answers server errors with the underlying message, the way a
//! developer exception page would. Production replaces 5xx bodies with a
//! generic [`ErrorResponse`]; the original error has already been logged by
//! `ApiError::into_response`.

use crate::config::Environment;
use crate::core::error::{ApiError, ErrorResponse};
use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use std::any::Any;

/// Response mapper hiding server error details in production
pub async fn redact_server_errors(
    State(environment): State<Environment>,
    response: Response,
) -> Response {
    let status = response.status();
    if environment.is_production() && status.is_server_error() {
        return (status, Json(ErrorResponse::internal())).into_response();
    }
    response
}

/// Turn a handler panic into a JSON 500
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::Internal(format!("handler panicked: {}", message)).into_response()
}
