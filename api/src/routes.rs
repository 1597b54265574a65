use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, state::AppState};

pub fn frame_routes() -> Router<AppState> {
    Router::new().route(
        "/frames/lottery/create/txdata",
        post(handlers::create_lottery_txdata),
    )
}

pub fn txdata_routes() -> Router<AppState> {
    Router::new().route("/api/txdata", post(handlers::build_txdata))
}

pub fn config_routes() -> Router<AppState> {
    Router::new().route("/api/config", get(handlers::get_config))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health_check))
}
