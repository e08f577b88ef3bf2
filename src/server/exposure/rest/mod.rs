//! REST API exposure
//!
//! Consumes a `ServerHost` and produces an Axum `Router` with the invoice
//! routes, health checks, documentation, static files and the middleware
//! stack (tracing, panic recovery, error pages).

use super::super::host::ServerHost;
use crate::server::docs::docs_routes;
use crate::server::error_pages::{panic_response, redact_server_errors};
use crate::server::router::build_invoice_routes;
use anyhow::{Result, bail};
use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// # Arguments
    ///
    /// * `host` - The server host containing all application state
    /// * `custom_routes` - Additional custom routes to merge
    ///
    /// # Returns
    ///
    /// Returns a fully configured Axum router with:
    /// - Health check routes
    /// - Invoice CRUD routes
    /// - OpenAPI document and Swagger UI (unless disabled)
    /// - Custom routes
    /// - Static file fallback (when a directory is configured)
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Result<Router> {
        let mut app = Self::health_routes(host.backend())
            .merge(build_invoice_routes(host.invoice_state()));

        if host.docs_enabled {
            app = app.merge(docs_routes());
        }

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        if let Some(dir) = &host.static_dir {
            if !dir.is_dir() {
                bail!("Static directory '{}' does not exist", dir.display());
            }
            app = app.fallback_service(ServeDir::new(dir));
        }

        // Each layer wraps the ones added before it
        let app = app
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(middleware::map_response_with_state(
                host.environment,
                redact_server_errors,
            ))
            .layer(TraceLayer::new_for_http());

        Ok(app)
    }

    /// Build health check routes
    fn health_routes(backend: &'static str) -> Router {
        let health = move || Self::health_check(backend);
        Router::new()
            .route("/health", get(health))
            .route("/healthz", get(health))
    }

    /// Health check endpoint handler
    async fn health_check(backend: &'static str) -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "backend": backend
        }))
    }
}
