//! Router assembly: resource routes, health check, fallback and the error
//! translation layer

use crate::core::error::{ApiError, ErrorTranslator};
use crate::handlers::{AppState, resource_routes};
use axum::{
    Json, Router,
    body::to_bytes,
    extract::State,
    http::{HeaderValue, Uri, header},
    middleware::map_response_with_state,
    response::Response,
    routing::get,
};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full REST router
///
/// Returns a router with:
/// - Health check routes
/// - Company and invoice routes
/// - Custom routes
/// - A JSON 404 for anything else
///
/// Errors raised anywhere in the router are re-rendered by `translator`.
pub fn build_router(
    state: AppState,
    translator: ErrorTranslator,
    cors: bool,
    custom_routes: Vec<Router>,
) -> Router {
    let mut app = health_routes().merge(resource_routes(state));

    for custom_router in custom_routes {
        app = app.merge(custom_router);
    }

    let app = app.fallback(route_not_found).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(map_response_with_state(translator, translate_errors)),
    );

    if cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "biztime"
    }))
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("no route for {}", uri.path()))
}

/// Largest plain-text error body read back when enveloping it
const PLAIN_ERROR_BODY_LIMIT: usize = 16 * 1024;

/// Re-render error responses with the configured translator
///
/// `ApiError` renders itself with the default translator and leaves a copy
/// in the response extensions. Failures axum produces on its own (405 for a
/// known path with the wrong method, plain-text extractor rejections) carry
/// no such copy and are wrapped in the same envelope, keeping their status
/// and headers such as `Allow`.
async fn translate_errors(
    State(translator): State<ErrorTranslator>,
    mut response: Response,
) -> Response {
    if let Some(err) = response.extensions_mut().remove::<ApiError>() {
        return translator.render(&err);
    }

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let message = match to_bytes(body, PLAIN_ERROR_BODY_LIMIT).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(_) => String::new(),
    };
    tracing::debug!(status = %status, error = %message, "router rejected request");

    let mut rendered = translator.render_status(status, &message);
    for (name, value) in parts.headers.iter() {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            rendered.headers_mut().append(name.clone(), value.clone());
        }
    }
    rendered
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value: &HeaderValue| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}
