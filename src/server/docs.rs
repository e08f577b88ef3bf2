//! OpenAPI document and Swagger UI

use crate::core::error::ErrorResponse;
use crate::core::invoice::{Invoice, InvoiceInput};
use crate::server::handlers;
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Where the generated document is served
pub const OPENAPI_JSON_PATH: &str = "/swagger/v1/swagger.json";

/// Where the interactive UI is served
pub const SWAGGER_UI_PATH: &str = "/swagger";

/// OpenAPI documentation for the invoice API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Invoice API",
        description = "CRUD operations over invoices"
    ),
    paths(
        handlers::list_invoices,
        handlers::get_invoice,
        handlers::create_invoice,
        handlers::update_invoice,
        handlers::delete_invoice,
    ),
    components(schemas(Invoice, InvoiceInput, ErrorResponse)),
    tags(
        (name = "invoices", description = "Invoice management")
    )
)]
pub struct ApiDoc;

/// Routes serving the JSON document and the Swagger UI
pub fn docs_routes() -> Router {
    Router::new().merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
}
