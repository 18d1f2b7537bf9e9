//! End-to-end tests through the HTTP router: envelope protocol, metadata
//! side channel, and customer CRUD.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use freightdesk::mcp::{McpService, ServiceMetadata};
use freightdesk::server::router;
use freightdesk::storage::{queries, Storage};
use freightdesk::types::{CustomerInput, CustomerSize};

fn seeded_app() -> Router {
    let storage = Storage::open_in_memory().unwrap();
    storage
        .with_connection(|conn| {
            queries::create_customer(
                conn,
                &CustomerInput {
                    name: "Acme".to_string(),
                    city: "Rotterdam".to_string(),
                    industry: "Chemicals".to_string(),
                    cargo_type: "Bulk".to_string(),
                    size: CustomerSize::Large,
                },
            )?;
            queries::create_customer(
                conn,
                &CustomerInput {
                    name: "Globex".to_string(),
                    city: "Hamburg".to_string(),
                    industry: "Electronics".to_string(),
                    cargo_type: "Container".to_string(),
                    size: CustomerSize::Small,
                },
            )?;
            Ok(())
        })
        .unwrap();
    router(McpService::new(storage, Arc::new(ServiceMetadata::new())))
}

async fn request(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post_mcp(app: Router, envelope: Value) -> (StatusCode, Value) {
    request(app, Method::POST, "/api/mcp", Some(envelope)).await
}

#[tokio::test]
async fn query_success_envelope_echoes_request_id() {
    let (status, body) = post_mcp(
        seeded_app(),
        json!({"tool": "query", "parameters": {"customer_id": 1}, "request_id": "r1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["request_id"], "r1");
    assert_eq!(
        body["data"]["customer"],
        json!({"name": "Acme", "city": "Rotterdam", "industry": "Chemicals"})
    );
}

#[tokio::test]
async fn query_with_field_selection() {
    let (status, body) = post_mcp(
        seeded_app(),
        json!({"tool": "query", "parameters": {"customer_id": 2, "fields": ["size", "cargo_type"]}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["customer"],
        json!({"size": "SMALL", "cargo_type": "Container"})
    );
    assert!(body["request_id"].is_null());
}

#[tokio::test]
async fn negative_customer_id_is_invalid_parameters() {
    let (status, body) = post_mcp(
        seeded_app(),
        json!({"tool": "query", "parameters": {"customer_id": -1}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"]["code"], "INVALID_PARAMETERS");
    assert_eq!(body["error"]["details"]["customer_id"], json!(-1));
}

#[tokio::test]
async fn unknown_tool_is_tool_not_found() {
    let (status, body) = post_mcp(seeded_app(), json!({"tool": "bogus"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "TOOL_NOT_FOUND");
    assert_eq!(body["error"]["details"]["tool_name"], "bogus");
}

#[tokio::test]
async fn missing_tool_field_is_invalid_request() {
    let (status, body) = post_mcp(seeded_app(), json!({"parameters": {}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn malformed_json_body_still_gets_an_envelope() {
    let app = seeded_app();
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/mcp")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert!(body["request_id"].is_null());
}

#[tokio::test]
async fn query_by_name_unknown_echoes_lookup_key() {
    let (status, body) = post_mcp(
        seeded_app(),
        json!({"tool": "query_by_name", "parameters": {"customer_name": "Initech"}, "request_id": "r7"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RECORD_NOT_FOUND");
    assert_eq!(body["error"]["details"]["customer_name"], "Initech");
    assert_eq!(body["request_id"], "r7");
}

#[tokio::test]
async fn list_tools_over_the_envelope() {
    let (status, body) = post_mcp(seeded_app(), json!({"tool": "list_tools"})).await;
    assert_eq!(status, StatusCode::OK);
    let tools = body["data"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 3);
    assert!(tools.iter().all(|t| t.get("parameters").is_none()));
}

#[tokio::test]
async fn metadata_endpoint_returns_full_descriptor() {
    let (status, body) = request(seeded_app(), Method::GET, "/api/mcp/metadata", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Freightdesk MCP Service");
    assert_eq!(body["tools"].as_array().unwrap().len(), 3);
    assert!(body["capabilities"]
        .as_array()
        .unwrap()
        .contains(&json!("customer_query")));
}

#[tokio::test]
async fn tool_schema_endpoint() {
    let (status, body) = request(seeded_app(), Method::GET, "/api/mcp/tools/query", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "query");
    assert_eq!(body["parameters"]["customer_id"]["required"], true);

    let (status, body) =
        request(seeded_app(), Method::GET, "/api/mcp/tools/nonexistent", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "TOOL_NOT_FOUND");
}

#[tokio::test]
async fn customer_crud_round_trip() {
    let app = seeded_app();

    let (status, created) = request(
        app.clone(),
        Method::POST,
        "/api/customers",
        Some(json!({
            "name": "Initech",
            "city": "Antwerp",
            "industry": "Software",
            "cargo_type": "Parcel",
            "size": "MEDIUM"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "Initech");

    let (status, listed) = request(app.clone(), Method::GET, "/api/customers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 3);

    let uri = format!("/api/customers/{id}");
    let (status, updated) = request(
        app.clone(),
        Method::PUT,
        &uri,
        Some(json!({"city": "Ghent"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["city"], "Ghent");
    assert_eq!(updated["name"], "Initech");

    let (status, deleted) = request(app.clone(), Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["id"], json!(id));

    // The query tool no longer finds the deleted record.
    let (status, body) = post_mcp(
        app.clone(),
        json!({"tool": "query", "parameters": {"customer_id": id}}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RECORD_NOT_FOUND");

    let (status, body) = request(app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Customer not found");
}

#[tokio::test]
async fn size_options_lists_every_variant() {
    let (status, body) = request(
        seeded_app(),
        Method::GET,
        "/api/customers/size-options",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let options = body["options"].as_array().unwrap();
    assert_eq!(options.len(), 4);
    assert_eq!(options[3], json!({"value": "EXTRA_LARGE", "label": "Extra Large"}));
}

#[tokio::test]
async fn health_reports_version() {
    let (status, body) = request(seeded_app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "freightdesk");
}
