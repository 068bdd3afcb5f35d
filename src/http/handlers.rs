use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::Serialize;

use crate::http::views::{
    render_template, ContactsTemplate, IndexTemplate, PostDetailTemplate, PostsListTemplate,
};
use crate::http::AppError;
use crate::AppState;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

pub(crate) async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.content().ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "ok" })),
        Err(err) => {
            tracing::warn!(error = ?err, "store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse { status: "degraded" }),
            )
        }
    }
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let view = state.pages().index().await.map_err(|err| {
        tracing::error!(error = ?err, "failed to build index page");
        AppError::internal("failed to load posts")
    })?;

    render_template(IndexTemplate { view })
}

pub async fn post_detail(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let view = state.pages().post_detail(&slug).await.map_err(|err| {
        tracing::error!(error = ?err, slug = %slug, "failed to build post page");
        AppError::internal("failed to load post")
    })?;

    match view {
        Some(view) => render_template(PostDetailTemplate { view }),
        None => Err(AppError::not_found("post not found")),
    }
}

pub async fn tag_filter(
    Path(tag_title): Path<String>,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let view = state.pages().tag_filter(&tag_title).await.map_err(|err| {
        tracing::error!(error = ?err, tag = %tag_title, "failed to build tag page");
        AppError::internal("failed to load posts")
    })?;

    match view {
        Some(view) => render_template(PostsListTemplate { view }),
        None => Err(AppError::not_found("tag not found")),
    }
}

// Placeholder page; it takes no data from the store.
pub async fn contacts() -> Result<Html<String>, AppError> {
    render_template(ContactsTemplate)
}

pub async fn not_found() -> AppError {
    AppError::not_found("page not found")
}
