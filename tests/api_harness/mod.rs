//! Shared HTTP test harness for storage backends
//!
//! The `resource_api_tests!` macro generates the full company/invoice HTTP
//! suite for any store implementing both `CompanyService` and
//! `InvoiceService`.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod api_harness;
//!
//! resource_api_tests!(InMemoryStore::new());
//! ```

#![allow(dead_code)]

use axum::http::StatusCode;
use axum_test::TestServer;
use biztime::core::error::ValidationStatus;
use biztime::core::service::{CompanyService, InvoiceService};
use biztime::server::ServerBuilder;
use serde_json::{Value, json};

/// Build a test server over `store` with the default error translation
pub fn server_for<S>(store: S) -> TestServer
where
    S: CompanyService + InvoiceService + 'static,
{
    server_with_status(store, ValidationStatus::default())
}

pub fn server_with_status<S>(store: S, status: ValidationStatus) -> TestServer
where
    S: CompanyService + InvoiceService + 'static,
{
    let router = ServerBuilder::new()
        .with_store(store)
        .with_validation_status(status)
        .build()
        .unwrap();
    TestServer::try_new(router).unwrap()
}

pub async fn create_company(server: &TestServer, code: &str, name: &str, description: &str) -> Value {
    let response = server
        .post("/companies")
        .json(&json!({"code": code, "name": name, "description": description}))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

pub async fn create_invoice(server: &TestServer, comp_code: &str, amt: f64) -> Value {
    let response = server
        .post("/invoices")
        .json(&json!({"comp_code": comp_code, "amt": amt}))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["invoice"].clone()
}

/// Assert the uniform error envelope and return its message
pub fn assert_error_envelope(body: &Value, status: u16) -> String {
    assert_eq!(body["error"]["status"], status, "unexpected envelope: {}", body);
    body["error"]["message"]
        .as_str()
        .expect("error message must be a string")
        .to_string()
}

/// Generate the HTTP suite for a storage backend.
///
/// `$store_factory` is an expression producing a fresh, empty store. It may
/// use `.await`.
///
/// # Generated Tests
///
/// ## Companies
/// - list order and projection, detail, include=invoices, round trip
/// - create validation and duplicates
/// - update keeps the code, 404 ordering
/// - delete cascades to invoices
///
/// ## Invoices
/// - list, detail with embedded company, 404, malformed id
/// - create defaults, unknown company, non-positive amount
/// - update changes only `amt`
/// - delete
///
/// ## Errors
/// - legacy validation status, unknown route, wrong method, undecodable path
#[macro_export]
macro_rules! resource_api_tests {
    ($store_factory:expr) => {
        mod resource_api_tests {
            use super::*;
            use api_harness::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use biztime::core::error::ValidationStatus;
            use serde_json::{Value, json};

            async fn make_server() -> TestServer {
                server_for($store_factory)
            }

            // ==============================================================
            // Companies - list / get
            // ==============================================================

            #[tokio::test]
            async fn test_list_companies_empty() {
                let server = make_server().await;

                let response = server.get("/companies").await;

                response.assert_status_ok();
                response.assert_json(&json!({"companies": []}));
            }

            #[tokio::test]
            async fn test_list_companies_in_insertion_order_without_description() {
                let server = make_server().await;
                create_company(&server, "zeta", "Zeta Corp", "last letter").await;
                create_company(&server, "acme", "Acme", "first letter").await;
                create_company(&server, "ibm", "IBM", "big blue").await;

                let body: Value = server.get("/companies").await.json();

                assert_eq!(
                    body,
                    json!({"companies": [
                        {"code": "zeta", "name": "Zeta Corp"},
                        {"code": "acme", "name": "Acme"},
                        {"code": "ibm", "name": "IBM"},
                    ]})
                );
            }

            #[tokio::test]
            async fn test_company_round_trip() {
                let server = make_server().await;

                let created = create_company(&server, "acme", "Acme", "d").await;
                assert_eq!(
                    created,
                    json!({"company": {"code": "acme", "name": "Acme", "description": "d"}})
                );

                let response = server.get("/companies/acme").await;
                response.assert_status_ok();
                response.assert_json(
                    &json!({"company": {"code": "acme", "name": "Acme", "description": "d"}}),
                );
            }

            #[tokio::test]
            async fn test_get_unknown_company_is_404() {
                let server = make_server().await;

                let response = server.get("/companies/nope").await;

                response.assert_status(StatusCode::NOT_FOUND);
                let message = assert_error_envelope(&response.json(), 404);
                assert!(message.contains("nope"));
            }

            #[tokio::test]
            async fn test_get_company_with_invoices() {
                let server = make_server().await;
                create_company(&server, "acme", "Acme", "d").await;
                create_company(&server, "ibm", "IBM", "big blue").await;
                let first = create_invoice(&server, "acme", 100.0).await;
                create_invoice(&server, "ibm", 5.0).await;
                let second = create_invoice(&server, "acme", 200.0).await;

                let response = server
                    .get("/companies/acme")
                    .add_query_param("include", "invoices")
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["company"]["code"], "acme");
                let invoices = body["company"]["invoices"].as_array().unwrap();
                assert_eq!(invoices.len(), 2);
                assert_eq!(invoices[0]["id"], first["id"]);
                assert_eq!(invoices[1]["id"], second["id"]);
            }

            #[tokio::test]
            async fn test_get_company_with_unknown_include_is_rejected() {
                let server = make_server().await;
                create_company(&server, "acme", "Acme", "d").await;

                let response = server
                    .get("/companies/acme")
                    .add_query_param("include", "employees")
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                assert_error_envelope(&response.json(), 400);
            }

            #[tokio::test]
            async fn test_get_unknown_company_with_bad_include_is_404() {
                let server = make_server().await;

                let response = server
                    .get("/companies/ghost")
                    .add_query_param("include", "bogus")
                    .await;

                response.assert_status(StatusCode::NOT_FOUND);
                let message = assert_error_envelope(&response.json(), 404);
                assert!(message.contains("ghost"));
            }

            // ==============================================================
            // Companies - create
            // ==============================================================

            #[tokio::test]
            async fn test_create_company_missing_fields_inserts_nothing() {
                let server = make_server().await;

                for body in [
                    json!({}),
                    json!({"name": "Acme", "description": "d"}),
                    json!({"code": "acme", "description": "d"}),
                    json!({"code": "acme", "name": "Acme"}),
                ] {
                    let response = server.post("/companies").json(&body).await;
                    response.assert_status(StatusCode::BAD_REQUEST);
                    assert_error_envelope(&response.json(), 400);
                }

                server
                    .get("/companies")
                    .await
                    .assert_json(&json!({"companies": []}));
            }

            #[tokio::test]
            async fn test_create_company_malformed_json() {
                let server = make_server().await;

                let response = server
                    .post("/companies")
                    .bytes("{\"code\":".into())
                    .content_type("application/json")
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                assert_error_envelope(&response.json(), 400);
            }

            #[tokio::test]
            async fn test_create_duplicate_code_fails() {
                let server = make_server().await;
                create_company(&server, "acme", "Acme", "d").await;

                let response = server
                    .post("/companies")
                    .json(&json!({"code": "acme", "name": "Other", "description": "x"}))
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = server.get("/companies/acme").await.json();
                assert_eq!(body["company"]["name"], "Acme");
            }

            #[tokio::test]
            async fn test_create_duplicate_name_fails() {
                let server = make_server().await;
                create_company(&server, "acme", "Acme", "d").await;

                let response = server
                    .post("/companies")
                    .json(&json!({"code": "acme2", "name": "Acme", "description": "x"}))
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                server
                    .get("/companies/acme2")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_legacy_mode_reports_validation_as_500() {
                let server = server_with_status($store_factory, ValidationStatus::Legacy);

                let response = server.post("/companies").json(&json!({})).await;

                response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
                assert_error_envelope(&response.json(), 500);
            }

            // ==============================================================
            // Companies - update
            // ==============================================================

            #[tokio::test]
            async fn test_update_company_keeps_code() {
                let server = make_server().await;
                create_company(&server, "acme", "Acme", "d").await;

                let response = server
                    .put("/companies/acme")
                    .json(&json!({"code": "hijack", "name": "Acme Inc", "description": "new"}))
                    .await;

                response.assert_status_ok();
                response.assert_json(&json!({
                    "company": {"code": "acme", "name": "Acme Inc", "description": "new"}
                }));
                server
                    .get("/companies/hijack")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_update_unknown_company_is_404() {
                let server = make_server().await;

                let response = server
                    .put("/companies/nope")
                    .json(&json!({"name": "X", "description": "y"}))
                    .await;

                response.assert_status(StatusCode::NOT_FOUND);
                assert_error_envelope(&response.json(), 404);
            }

            #[tokio::test]
            async fn test_empty_update_on_unknown_company_is_404() {
                let server = make_server().await;

                let response = server.put("/companies/nope").json(&json!({})).await;

                response.assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_update_company_without_name_is_rejected() {
                let server = make_server().await;
                create_company(&server, "acme", "Acme", "d").await;

                let response = server
                    .put("/companies/acme")
                    .json(&json!({"description": "only"}))
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = server.get("/companies/acme").await.json();
                assert_eq!(body["company"]["description"], "d");
            }

            // ==============================================================
            // Companies - delete
            // ==============================================================

            #[tokio::test]
            async fn test_delete_company() {
                let server = make_server().await;
                create_company(&server, "acme", "Acme", "d").await;

                let response = server.delete("/companies/acme").await;

                response.assert_status_ok();
                response.assert_json(&json!({"status": "deleted"}));
                server
                    .get("/companies/acme")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_delete_unknown_company_is_404() {
                let server = make_server().await;

                server
                    .delete("/companies/nope")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_delete_company_cascades_to_invoices() {
                let server = make_server().await;
                create_company(&server, "acme", "Acme", "d").await;
                create_company(&server, "ibm", "IBM", "big blue").await;
                let doomed = create_invoice(&server, "acme", 100.0).await;
                create_invoice(&server, "acme", 200.0).await;
                let kept = create_invoice(&server, "ibm", 300.0).await;

                server.delete("/companies/acme").await.assert_status_ok();

                let body: Value = server.get("/invoices").await.json();
                assert_eq!(
                    body,
                    json!({"invoices": [{"id": kept["id"], "comp_code": "ibm"}]})
                );
                server
                    .get(&format!("/invoices/{}", doomed["id"]))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            // ==============================================================
            // Invoices - list / get
            // ==============================================================

            #[tokio::test]
            async fn test_list_invoices() {
                let server = make_server().await;
                create_company(&server, "acme", "Acme", "d").await;
                let first = create_invoice(&server, "acme", 10.0).await;
                let second = create_invoice(&server, "acme", 20.0).await;

                let body: Value = server.get("/invoices").await.json();

                assert_eq!(
                    body,
                    json!({"invoices": [
                        {"id": first["id"], "comp_code": "acme"},
                        {"id": second["id"], "comp_code": "acme"},
                    ]})
                );
            }

            #[tokio::test]
            async fn test_get_invoice_embeds_company() {
                let server = make_server().await;
                create_company(&server, "acme", "Acme", "d").await;
                let created = create_invoice(&server, "acme", 42.5).await;

                let response = server.get(&format!("/invoices/{}", created["id"])).await;

                response.assert_status_ok();
                let invoice = response.json::<Value>()["invoice"].clone();
                assert_eq!(invoice["id"], created["id"]);
                assert_eq!(invoice["amt"].as_f64(), Some(42.5));
                assert_eq!(invoice["paid"], false);
                assert_eq!(invoice["paid_date"], Value::Null);
                assert_eq!(invoice["add_date"], created["add_date"]);
                assert_eq!(
                    invoice["company"],
                    json!({"code": "acme", "name": "Acme", "description": "d"})
                );
                assert!(invoice.get("comp_code").is_none());
            }

            #[tokio::test]
            async fn test_get_unknown_invoice_is_404() {
                let server = make_server().await;

                let response = server.get("/invoices/987654").await;

                response.assert_status(StatusCode::NOT_FOUND);
                assert_error_envelope(&response.json(), 404);
            }

            #[tokio::test]
            async fn test_get_invoice_with_malformed_id_is_rejected() {
                let server = make_server().await;

                let response = server.get("/invoices/abc").await;

                response.assert_status(StatusCode::BAD_REQUEST);
                assert_error_envelope(&response.json(), 400);
            }

            // ==============================================================
            // Invoices - create
            // ==============================================================

            #[tokio::test]
            async fn test_create_invoice_scenario() {
                let server = make_server().await;
                create_company(&server, "test", "TestCompany", "test description").await;

                let response = server
                    .post("/invoices")
                    .json(&json!({"comp_code": "test", "amt": 999}))
                    .await;

                response.assert_status(StatusCode::CREATED);
                let invoice = response.json::<Value>()["invoice"].clone();
                assert!(invoice["id"].is_i64());
                assert_eq!(invoice["comp_code"], "test");
                assert_eq!(invoice["amt"].as_f64(), Some(999.0));
                assert_eq!(invoice["paid"], false);
                assert!(invoice["add_date"].is_string());
                assert_eq!(invoice["paid_date"], Value::Null);
            }

            #[tokio::test]
            async fn test_create_invoice_unknown_company_creates_nothing() {
                let server = make_server().await;

                let response = server
                    .post("/invoices")
                    .json(&json!({"comp_code": "ghost", "amt": 10}))
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                assert_error_envelope(&response.json(), 400);
                server
                    .get("/invoices")
                    .await
                    .assert_json(&json!({"invoices": []}));
            }

            #[tokio::test]
            async fn test_create_invoice_missing_fields() {
                let server = make_server().await;
                create_company(&server, "acme", "Acme", "d").await;

                for body in [json!({}), json!({"comp_code": "acme"}), json!({"amt": 5})] {
                    server
                        .post("/invoices")
                        .json(&body)
                        .await
                        .assert_status(StatusCode::BAD_REQUEST);
                }
            }

            #[tokio::test]
            async fn test_create_invoice_non_positive_amount() {
                let server = make_server().await;
                create_company(&server, "acme", "Acme", "d").await;

                for amt in [0.0, -5.0] {
                    server
                        .post("/invoices")
                        .json(&json!({"comp_code": "acme", "amt": amt}))
                        .await
                        .assert_status(StatusCode::BAD_REQUEST);
                }
                server
                    .get("/invoices")
                    .await
                    .assert_json(&json!({"invoices": []}));
            }

            // ==============================================================
            // Invoices - update / delete
            // ==============================================================

            #[tokio::test]
            async fn test_update_invoice_changes_only_amount() {
                let server = make_server().await;
                create_company(&server, "acme", "Acme", "d").await;
                let created = create_invoice(&server, "acme", 100.0).await;

                let response = server
                    .put(&format!("/invoices/{}", created["id"]))
                    .json(&json!({"amt": 250, "paid": true, "comp_code": "other"}))
                    .await;

                response.assert_status_ok();
                let updated = response.json::<Value>()["invoice"].clone();
                assert_eq!(updated["amt"].as_f64(), Some(250.0));
                assert_eq!(updated["id"], created["id"]);
                assert_eq!(updated["comp_code"], created["comp_code"]);
                assert_eq!(updated["paid"], created["paid"]);
                assert_eq!(updated["add_date"], created["add_date"]);
                assert_eq!(updated["paid_date"], created["paid_date"]);
            }

            #[tokio::test]
            async fn test_update_unknown_invoice_is_404() {
                let server = make_server().await;

                server
                    .put("/invoices/987654")
                    .json(&json!({"amt": 5}))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
                server
                    .put("/invoices/987654")
                    .json(&json!({}))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_update_invoice_without_amount_is_rejected() {
                let server = make_server().await;
                create_company(&server, "acme", "Acme", "d").await;
                let created = create_invoice(&server, "acme", 100.0).await;

                server
                    .put(&format!("/invoices/{}", created["id"]))
                    .json(&json!({}))
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);
            }

            #[tokio::test]
            async fn test_delete_invoice() {
                let server = make_server().await;
                create_company(&server, "acme", "Acme", "d").await;
                let created = create_invoice(&server, "acme", 100.0).await;
                let path = format!("/invoices/{}", created["id"]);

                let response = server.delete(&path).await;
                response.assert_status_ok();
                response.assert_json(&json!({"status": "deleted"}));

                server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
                server.delete(&path).await.assert_status(StatusCode::NOT_FOUND);
                server.get("/companies/acme").await.assert_status_ok();
            }

            // ==============================================================
            // Routing
            // ==============================================================

            #[tokio::test]
            async fn test_unknown_route_is_json_404() {
                let server = make_server().await;

                let response = server.get("/employees").await;

                response.assert_status(StatusCode::NOT_FOUND);
                assert_error_envelope(&response.json(), 404);
            }

            #[tokio::test]
            async fn test_wrong_method_on_known_path_is_json_405() {
                let server = make_server().await;

                let response = server.patch("/companies").await;
                response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
                assert_error_envelope(&response.json(), 405);

                let response = server.post("/invoices/1").json(&json!({"amt": 5})).await;
                response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
                assert_error_envelope(&response.json(), 405);
            }

            #[tokio::test]
            async fn test_undecodable_path_segment_is_json_400() {
                let server = make_server().await;

                for path in ["/companies/%FF", "/invoices/%FF"] {
                    let response = server.get(path).await;
                    response.assert_status(StatusCode::BAD_REQUEST);
                    let message = assert_error_envelope(&response.json(), 400);
                    assert!(message.starts_with("invalid path"));
                }

                let response = server.delete("/companies/%FF").await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_error_envelope(&response.json(), 400);
            }

            #[tokio::test]
            async fn test_undecodable_path_follows_validation_policy() {
                let server = server_with_status($store_factory, ValidationStatus::Legacy);

                let response = server.get("/companies/%FF").await;

                response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
                assert_error_envelope(&response.json(), 500);
            }
        }
    };
}
