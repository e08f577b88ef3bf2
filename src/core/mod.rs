//! Core module containing the entity, the store trait and error types

pub mod error;
pub mod extractors;
pub mod invoice;
pub mod store;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use invoice::{Invoice, InvoiceId, InvoiceInput};
pub use store::InvoiceStore;
