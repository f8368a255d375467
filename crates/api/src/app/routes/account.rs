use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(get_account))
        .route("/summary", get(get_summary))
        .route("/transactions", get(get_transactions))
}

pub async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.snapshot() {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn get_summary(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.summary() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

/// Newest first, at most the retained history.
pub async fn get_transactions(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.snapshot() {
        Ok(account) => (StatusCode::OK, Json(account.history().clone())).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}
