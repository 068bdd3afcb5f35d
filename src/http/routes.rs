use axum::{routing::get, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn pages() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/post/:slug", get(handlers::post_detail))
        .route("/tag/:tag_title", get(handlers::tag_filter))
        .route("/contacts", get(handlers::contacts))
}
