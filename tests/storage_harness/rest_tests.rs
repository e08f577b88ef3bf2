//! REST integration test macro for storage backends.
//!
//! The `rest_integration_tests!` macro generates HTTP-level tests that drive
//! an `InvoiceStore` through the real router built by `ServerBuilder`:
//! JSON → HTTP request → handler → InvoiceStore → HTTP response → JSON.
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_rest_create_then_get`: POST 201 + Location, GET returns the same invoice
//! - `test_rest_list`
//! - `test_rest_update`: PUT 204, GET shows the new fields
//! - `test_rest_delete`: DELETE 200 with the removed row, then GET 404
//!
//! ## Create semantics
//! - `test_rest_upsert_overwrites`: POST with a known id answers 200, no new row
//! - `test_rest_unknown_body_id_is_ignored`
//! - `test_rest_zero_body_id_creates`: `invoiceId: 0` means "not set"
//! - `test_rest_customer_id_is_opaque`
//! - `test_rest_insert_only_conflict`: POST with a known id answers 409
//!
//! ## Error handling
//! - `test_rest_update_id_mismatch`: 400, nothing changes
//! - `test_rest_update_missing_body_id`
//! - `test_rest_update_not_found`
//! - `test_rest_delete_not_found`
//! - `test_rest_invalid_path_id`
//! - `test_rest_invalid_body`

/// Generate a REST integration test suite for a storage backend.
///
/// `$factory` must produce a fresh, empty `impl InvoiceStore + 'static`.
#[macro_export]
macro_rules! rest_integration_tests {
    ($factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use invoice_api::config::CreateMode;
            use invoice_api::core::error::ErrorResponse;
            use invoice_api::core::invoice::Invoice;
            use invoice_api::server::ServerBuilder;
            use serde_json::json;

            async fn make_server_with(create_mode: CreateMode) -> TestServer {
                let store = $factory;
                let router = ServerBuilder::new()
                    .with_store(store)
                    .with_create_mode(create_mode)
                    .build()
                    .unwrap();
                TestServer::try_new(router).unwrap()
            }

            async fn make_server() -> TestServer {
                make_server_with(CreateMode::Upsert).await
            }

            async fn post_invoice(server: &TestServer, customer_id: i32, total: f64) -> Invoice {
                let response = server
                    .post("/invoices")
                    .json(&json!({
                        "customerId": customer_id,
                        "invoiceDate": "2020-01-01",
                        "total": total
                    }))
                    .await;
                response.assert_status(StatusCode::CREATED);
                response.json()
            }

            // ==============================================================
            // CRUD
            // ==============================================================

            #[tokio::test]
            async fn test_rest_create_then_get() {
                let server = make_server().await;

                let response = server
                    .post("/invoices")
                    .json(&json!({
                        "customerId": 1,
                        "invoiceDate": "2020-01-01",
                        "total": 12
                    }))
                    .await;

                response.assert_status(StatusCode::CREATED);
                let created: Invoice = response.json();
                assert!(created.invoice_id >= 1);
                assert_eq!(created.customer_id, 1);
                assert_eq!(created.invoice_date, date(2020, 1, 1));
                assert!((created.total - 12.0).abs() < f64::EPSILON);

                let location = response.header("location");
                assert_eq!(
                    location.to_str().unwrap(),
                    format!("/invoices/{}", created.invoice_id)
                );

                let get_resp = server
                    .get(&format!("/invoices/{}", created.invoice_id))
                    .await;
                get_resp.assert_status(StatusCode::OK);
                let fetched: Invoice = get_resp.json();
                assert_eq!(fetched, created);
            }

            #[tokio::test]
            async fn test_rest_accepts_pascal_case_fields() {
                let server = make_server().await;

                let response = server
                    .post("/invoices")
                    .json(&json!({
                        "CustomerId": 4,
                        "InvoiceDate": "2019-07-04",
                        "Total": 8.25
                    }))
                    .await;

                response.assert_status(StatusCode::CREATED);
                let body: serde_json::Value = response.json();
                assert_eq!(body["customerId"], 4);
                assert_eq!(body["invoiceDate"], "2019-07-04");
                assert_eq!(body["total"], 8.25);
            }

            #[tokio::test]
            async fn test_rest_list() {
                let server = make_server().await;

                let empty: Vec<Invoice> = server.get("/invoices").await.json();
                assert!(empty.is_empty());

                let a = post_invoice(&server, 1, 10.0).await;
                let b = post_invoice(&server, 2, 20.0).await;

                let response = server.get("/invoices").await;
                response.assert_status(StatusCode::OK);
                let all: Vec<Invoice> = response.json();
                assert_eq!(all, vec![a, b]);
            }

            #[tokio::test]
            async fn test_rest_update() {
                let server = make_server().await;
                let created = post_invoice(&server, 1, 10.0).await;
                let id = created.invoice_id;

                let response = server
                    .put(&format!("/invoices/{}", id))
                    .json(&json!({
                        "invoiceId": id,
                        "customerId": 9,
                        "invoiceDate": "2021-02-03",
                        "total": 55.5
                    }))
                    .await;
                response.assert_status(StatusCode::NO_CONTENT);

                let fetched: Invoice = server.get(&format!("/invoices/{}", id)).await.json();
                assert_eq!(fetched.customer_id, 9);
                assert_eq!(fetched.invoice_date, date(2021, 2, 3));
                assert!((fetched.total - 55.5).abs() < f64::EPSILON);
            }

            #[tokio::test]
            async fn test_rest_delete() {
                let server = make_server().await;
                let created = post_invoice(&server, 3, 30.0).await;
                let path = format!("/invoices/{}", created.invoice_id);

                let response = server.delete(&path).await;
                response.assert_status(StatusCode::OK);
                let removed: Invoice = response.json();
                assert_eq!(removed, created);

                server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
            }

            // ==============================================================
            // Create semantics
            // ==============================================================

            #[tokio::test]
            async fn test_rest_upsert_overwrites() {
                let server = make_server().await;
                let created = post_invoice(&server, 1, 10.0).await;

                let response = server
                    .post("/invoices")
                    .json(&json!({
                        "invoiceId": created.invoice_id,
                        "customerId": 2,
                        "invoiceDate": "2020-05-05",
                        "total": 99
                    }))
                    .await;
                response.assert_status(StatusCode::OK);
                let overwritten: Invoice = response.json();
                assert_eq!(overwritten.invoice_id, created.invoice_id);
                assert_eq!(overwritten.customer_id, 2);

                let all: Vec<Invoice> = server.get("/invoices").await.json();
                assert_eq!(all, vec![overwritten]);
            }

            #[tokio::test]
            async fn test_rest_unknown_body_id_is_ignored() {
                let server = make_server().await;

                let response = server
                    .post("/invoices")
                    .json(&json!({
                        "invoiceId": 777,
                        "customerId": 1,
                        "invoiceDate": "2020-01-01",
                        "total": 1
                    }))
                    .await;
                response.assert_status(StatusCode::CREATED);
                let created: Invoice = response.json();
                assert_ne!(created.invoice_id, 777);

                server.get("/invoices/777").await.assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_zero_body_id_creates() {
                let server = make_server().await;

                let response = server
                    .post("/invoices")
                    .json(&json!({
                        "invoiceId": 0,
                        "customerId": 1,
                        "invoiceDate": "2020-01-01",
                        "total": 12
                    }))
                    .await;
                response.assert_status(StatusCode::CREATED);
                let created: Invoice = response.json();
                assert!(created.invoice_id >= 1);

                let fetched: Invoice = server
                    .get(&format!("/invoices/{}", created.invoice_id))
                    .await
                    .json();
                assert_eq!(fetched, created);
            }

            #[tokio::test]
            async fn test_rest_customer_id_is_opaque() {
                let server = make_server().await;

                for customer_id in [0, -5] {
                    let response = server
                        .post("/invoices")
                        .json(&json!({
                            "customerId": customer_id,
                            "invoiceDate": "2020-01-01",
                            "total": 1
                        }))
                        .await;
                    response.assert_status(StatusCode::CREATED);
                    let created: Invoice = response.json();
                    assert_eq!(created.customer_id, customer_id);
                }
            }

            #[tokio::test]
            async fn test_rest_insert_only_conflict() {
                let server = make_server_with(CreateMode::InsertOnly).await;
                let created = post_invoice(&server, 1, 10.0).await;

                let response = server
                    .post("/invoices")
                    .json(&json!({
                        "invoiceId": created.invoice_id,
                        "customerId": 2,
                        "invoiceDate": "2020-01-01",
                        "total": 20
                    }))
                    .await;
                response.assert_status(StatusCode::CONFLICT);
                let error: ErrorResponse = response.json();
                assert_eq!(error.code, "INVOICE_ALREADY_EXISTS");

                let fetched: Invoice = server
                    .get(&format!("/invoices/{}", created.invoice_id))
                    .await
                    .json();
                assert_eq!(fetched, created);
            }

            // ==============================================================
            // Error handling
            // ==============================================================

            #[tokio::test]
            async fn test_rest_update_id_mismatch() {
                let server = make_server().await;
                let created = post_invoice(&server, 1, 10.0).await;
                let id = created.invoice_id;

                let response = server
                    .put(&format!("/invoices/{}", id))
                    .json(&json!({
                        "invoiceId": id + 1,
                        "customerId": 5,
                        "invoiceDate": "2020-01-01",
                        "total": 1
                    }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let error: ErrorResponse = response.json();
                assert_eq!(error.code, "ID_MISMATCH");

                let fetched: Invoice = server.get(&format!("/invoices/{}", id)).await.json();
                assert_eq!(fetched, created);
            }

            #[tokio::test]
            async fn test_rest_update_missing_body_id() {
                let server = make_server().await;
                let created = post_invoice(&server, 1, 10.0).await;

                let response = server
                    .put(&format!("/invoices/{}", created.invoice_id))
                    .json(&json!({
                        "customerId": 5,
                        "invoiceDate": "2020-01-01",
                        "total": 1
                    }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let error: ErrorResponse = response.json();
                assert_eq!(error.code, "MISSING_ID");
            }

            #[tokio::test]
            async fn test_rest_update_not_found() {
                let server = make_server().await;

                let response = server
                    .put("/invoices/999")
                    .json(&json!({
                        "invoiceId": 999,
                        "customerId": 1,
                        "invoiceDate": "2020-01-01",
                        "total": 1
                    }))
                    .await;
                response.assert_status(StatusCode::NOT_FOUND);
                let error: ErrorResponse = response.json();
                assert_eq!(error.code, "INVOICE_NOT_FOUND");
            }

            #[tokio::test]
            async fn test_rest_delete_not_found() {
                let server = make_server().await;

                let response = server.delete("/invoices/999").await;
                response.assert_status(StatusCode::NOT_FOUND);
                let error: ErrorResponse = response.json();
                assert_eq!(error.code, "INVOICE_NOT_FOUND");
            }

            #[tokio::test]
            async fn test_rest_invalid_path_id() {
                let server = make_server().await;

                for path in [
                    "/invoices/abc",
                    "/invoices/0",
                    "/invoices/-3",
                    "/invoices/+7",
                    "/invoices/%20%207",
                ] {
                    let response = server.get(path).await;
                    response.assert_status(StatusCode::BAD_REQUEST);
                    let error: ErrorResponse = response.json();
                    assert_eq!(error.code, "INVALID_ID", "path {path}");
                }
            }

            #[tokio::test]
            async fn test_rest_invalid_body() {
                let server = make_server().await;

                let bad_date = server
                    .post("/invoices")
                    .json(&json!({
                        "customerId": 1,
                        "invoiceDate": "2020-13-45",
                        "total": 1
                    }))
                    .await;
                bad_date.assert_status(StatusCode::BAD_REQUEST);
                let error: ErrorResponse = bad_date.json();
                assert_eq!(error.code, "INVALID_BODY");

                let bad_customer = server
                    .post("/invoices")
                    .json(&json!({
                        "customerId": "one",
                        "invoiceDate": "2020-01-01",
                        "total": 1
                    }))
                    .await;
                bad_customer.assert_status(StatusCode::BAD_REQUEST);
                let error: ErrorResponse = bad_customer.json();
                assert_eq!(error.code, "INVALID_BODY");

                let missing_total = server
                    .post("/invoices")
                    .json(&json!({
                        "customerId": 1,
                        "invoiceDate": "2020-01-01"
                    }))
                    .await;
                missing_total.assert_status(StatusCode::BAD_REQUEST);
                let error: ErrorResponse = missing_total.json();
                assert_eq!(error.code, "INVALID_BODY");

                let negative_id = server
                    .post("/invoices")
                    .json(&json!({
                        "invoiceId": -2,
                        "customerId": 1,
                        "invoiceDate": "2020-01-01",
                        "total": 1
                    }))
                    .await;
                negative_id.assert_status(StatusCode::BAD_REQUEST);
                let error: ErrorResponse = negative_id.json();
                assert_eq!(error.code, "VALIDATION_ERROR");

                let all: Vec<Invoice> = server.get("/invoices").await.json();
                assert!(all.is_empty(), "rejected bodies must not reach the store");
            }
        }
    };
}
