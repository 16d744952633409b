//! HTTP pass-through for the Daybook Resource API.
//!
//! # Responsibility
//! - Accept JSON over HTTP and forward every request to
//!   `daybook_core::api::handle_shared`.
//! - Translate core responses back into HTTP status and JSON body.
//!
//! # Invariants
//! - No entity logic lives here; routing semantics belong to core.
//! - Store access runs on the blocking pool, never on the async workers.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use daybook_core::{handle_shared, ApiError, ApiRequest, ApiResponse, SharedConnection};
use log::error;
use serde_json::Value;
use tower_http::cors::CorsLayer;

/// Builds the application router over a shared store connection.
pub fn router(conn: SharedConnection) -> Router {
    Router::new()
        .route("/health", any(forward))
        .route("/api/:resource", any(forward))
        .route("/api/:resource/:id", any(forward))
        .fallback(forward)
        .layer(CorsLayer::permissive())
        .with_state(conn)
}

async fn forward(
    State(conn): State<SharedConnection>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Some(value),
            Err(err) => {
                return to_http(
                    ApiError::MalformedBody(format!("invalid JSON: {err}")).into_response(),
                )
            }
        }
    };

    let request = ApiRequest::new(method.as_str(), uri.path(), body);
    match tokio::task::spawn_blocking(move || handle_shared(&conn, &request)).await {
        Ok(response) => to_http(response),
        Err(err) => {
            error!(
                "event=http_request module=server status=error method={} path={} error={}",
                method,
                uri.path(),
                err
            );
            to_http(ApiError::Storage("request handler failed".to_string()).into_response())
        }
    }
}

fn to_http(response: ApiResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match response.body {
        Some(body) => (status, Json(body)).into_response(),
        None => status.into_response(),
    }
}
