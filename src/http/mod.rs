use axum::Router;

use crate::AppState;

mod error;
mod handlers;
mod routes;
mod views;

pub use error::AppError;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health())
        .merge(routes::pages())
        .fallback(handlers::not_found)
        .with_state(state)
}
