//! HTTP transport: the MCP envelope endpoint, metadata side channel, and
//! customer CRUD routes
//!
//! The envelope endpoint always answers with a well-formed envelope, whatever
//! went wrong; the HTTP status is derived from the error code. CRUD routes
//! use the plain `{"detail": ...}` error body.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::McpError;
use crate::mcp::{parse_request, McpResponse, McpService};
use crate::storage::queries;
use crate::types::{CustomerInput, CustomerSize, CustomerUpdate};

/// Build the application router
pub fn router(service: McpService) -> Router {
    Router::new()
        .route("/api/mcp", post(handle_mcp))
        .route("/api/mcp/metadata", get(get_metadata))
        .route("/api/mcp/tools/:tool_name", get(get_tool_schema))
        .route("/api/customers", get(list_customers).post(create_customer))
        .route("/api/customers/size-options", get(size_options))
        .route(
            "/api/customers/:customer_id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// Bind and serve until shutdown
pub async fn serve(addr: &str, service: McpService) -> std::io::Result<()> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Freightdesk server listening on {}", addr);
    axum::serve(listener, app).await
}

fn envelope_response(response: McpResponse) -> Response {
    let status = StatusCode::from_u16(response.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response)).into_response()
}

fn error_response(err: McpError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(McpResponse::error(err, None))).into_response()
}

fn detail_response(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

/// POST /api/mcp — the tool-invocation envelope endpoint
async fn handle_mcp(State(service): State<McpService>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            return envelope_response(McpResponse::from_failure(
                &format!("Invalid JSON body: {e}"),
                None,
            ))
        }
    };

    let response = match parse_request(&payload) {
        Ok(request) => {
            let request_id = request.request_id.clone();
            tracing::debug!(tool = %request.tool, "dispatching tool call");
            match service.dispatch(&request.tool, &request.parameters) {
                Ok(data) => McpResponse::success(data, request_id),
                Err(err) => McpResponse::error(err, request_id),
            }
        }
        Err(err) => McpResponse::error(err, None),
    };

    envelope_response(response)
}

/// GET /api/mcp/metadata — full service descriptor
async fn get_metadata(State(service): State<McpService>) -> Response {
    match service.metadata().descriptor() {
        Ok(descriptor) => Json(descriptor).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /api/mcp/tools/:tool_name — one tool's full schema
async fn get_tool_schema(
    State(service): State<McpService>,
    Path(tool_name): Path<String>,
) -> Response {
    match service.metadata().tool_schema(&tool_name) {
        Ok(schema) => Json(schema).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /api/customers
async fn list_customers(State(service): State<McpService>) -> Response {
    match service.storage().with_connection(queries::list_customers) {
        Ok(customers) => Json(customers).into_response(),
        Err(err) => detail_response(StatusCode::INTERNAL_SERVER_ERROR, &err.message),
    }
}

/// POST /api/customers
async fn create_customer(
    State(service): State<McpService>,
    Json(input): Json<CustomerInput>,
) -> Response {
    match service
        .storage()
        .with_transaction(|conn| queries::create_customer(conn, &input))
    {
        Ok(customer) => Json(customer).into_response(),
        Err(err) => {
            tracing::error!("Error creating customer: {}", err);
            detail_response(StatusCode::INTERNAL_SERVER_ERROR, &err.message)
        }
    }
}

/// GET /api/customers/:customer_id
async fn get_customer(State(service): State<McpService>, Path(customer_id): Path<i64>) -> Response {
    match service
        .storage()
        .with_connection(|conn| queries::get_customer(conn, customer_id))
    {
        Ok(Some(customer)) => Json(customer).into_response(),
        Ok(None) => detail_response(StatusCode::NOT_FOUND, "Customer not found"),
        Err(err) => detail_response(StatusCode::INTERNAL_SERVER_ERROR, &err.message),
    }
}

/// PUT /api/customers/:customer_id
async fn update_customer(
    State(service): State<McpService>,
    Path(customer_id): Path<i64>,
    Json(update): Json<CustomerUpdate>,
) -> Response {
    match service
        .storage()
        .with_transaction(|conn| queries::update_customer(conn, customer_id, &update))
    {
        Ok(Some(customer)) => Json(customer).into_response(),
        Ok(None) => detail_response(StatusCode::NOT_FOUND, "Customer not found"),
        Err(err) => {
            tracing::error!("Error updating customer: {}", err);
            detail_response(StatusCode::INTERNAL_SERVER_ERROR, &err.message)
        }
    }
}

/// DELETE /api/customers/:customer_id — returns the removed record
async fn delete_customer(
    State(service): State<McpService>,
    Path(customer_id): Path<i64>,
) -> Response {
    match service
        .storage()
        .with_transaction(|conn| queries::delete_customer(conn, customer_id))
    {
        Ok(Some(customer)) => Json(customer).into_response(),
        Ok(None) => detail_response(StatusCode::NOT_FOUND, "Customer not found"),
        Err(err) => {
            tracing::error!("Error deleting customer: {}", err);
            detail_response(StatusCode::INTERNAL_SERVER_ERROR, &err.message)
        }
    }
}

/// GET /api/customers/size-options
async fn size_options() -> Response {
    Json(json!({ "options": CustomerSize::options() })).into_response()
}

/// GET /health
async fn health() -> Response {
    Json(json!({
        "status": "ok",
        "service": "freightdesk",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}
