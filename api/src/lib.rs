pub mod config;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod routes;
pub mod state;

use axum::http::{header, Method};
use axum::{middleware, Router};
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(routes::frame_routes())
        .merge(routes::txdata_routes())
        .merge(routes::config_routes())
        .merge(routes::health_routes())
        .fallback(handlers::route_not_found)
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
        .with_state(state)
}

/// One log line per request; failed requests are raised to warn or error.
async fn request_logger(
    req: axum::http::Request<axum::body::Body>,
    next: middleware::Next,
) -> axum::response::Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis() as u64;
    if status.is_server_error() {
        tracing::error!(%method, %path, status = status.as_u16(), elapsed_ms, "request failed");
    } else if status.is_client_error() {
        tracing::warn!(%method, %path, status = status.as_u16(), elapsed_ms, "request rejected");
    } else {
        tracing::info!(%method, %path, status = status.as_u16(), elapsed_ms, "request served");
    }

    response
}
