//! Server module for building the HTTP API
//!
//! `ServerBuilder` collects the store and options into a `ServerHost`,
//! which the REST exposure turns into an Axum router.

pub mod builder;
pub mod docs;
pub mod error_pages;
pub mod exposure;
pub mod handlers;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use docs::ApiDoc;
pub use handlers::InvoiceState;
pub use host::ServerHost;
