//! The Invoice entity
//!
//! Two shapes share the same wire format:
//! - [`Invoice`] is a persisted row and always carries its identifier
//! - [`InvoiceInput`] is a request body where the identifier is optional
//!
//! Field names are camelCase on the wire. PascalCase spellings are accepted
//! on input so payloads written against the original API keep working.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Identifier type of an invoice row
pub type InvoiceId = i32;

/// A persisted invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Store-generated identifier
    #[serde(alias = "InvoiceId")]
    #[schema(example = 1)]
    pub invoice_id: InvoiceId,

    /// Opaque reference to a customer managed elsewhere
    #[serde(alias = "CustomerId")]
    #[schema(example = 1)]
    pub customer_id: i32,

    #[serde(alias = "InvoiceDate")]
    #[schema(value_type = String, format = Date, example = "2020-01-01")]
    pub invoice_date: NaiveDate,

    #[serde(alias = "Total")]
    #[schema(example = 12.0)]
    pub total: f64,
}

/// Candidate invoice received from a client
///
/// `invoiceId` may be omitted on create; `0` means the same as absent. On
/// update it is required and must match the identifier in the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceInput {
    #[serde(default, alias = "InvoiceId", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "must not be negative"))]
    #[schema(example = 12)]
    pub invoice_id: Option<InvoiceId>,

    /// Opaque reference to a customer managed elsewhere
    #[serde(alias = "CustomerId")]
    #[schema(example = 1)]
    pub customer_id: i32,

    #[serde(alias = "InvoiceDate")]
    #[schema(value_type = String, format = Date, example = "2020-01-01")]
    pub invoice_date: NaiveDate,

    #[serde(alias = "Total")]
    #[schema(example = 12.0)]
    pub total: f64,
}

impl InvoiceInput {
    /// Build an input without an identifier
    pub fn new(customer_id: i32, invoice_date: NaiveDate, total: f64) -> Self {
        Self {
            invoice_id: None,
            customer_id,
            invoice_date,
            total,
        }
    }

    /// Attach an identifier
    pub fn with_id(mut self, invoice_id: InvoiceId) -> Self {
        self.invoice_id = Some(invoice_id);
        self
    }

    /// The identifier the client asked for, if any
    pub fn supplied_id(&self) -> Option<InvoiceId> {
        self.invoice_id.filter(|id| *id > 0)
    }

    /// Turn this input into a full record carrying `invoice_id`
    ///
    /// Any identifier already present in the input is replaced.
    pub fn into_invoice(self, invoice_id: InvoiceId) -> Invoice {
        Invoice {
            invoice_id,
            customer_id: self.customer_id,
            invoice_date: self.invoice_date,
            total: self.total,
        }
    }
}
