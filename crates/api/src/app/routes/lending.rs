use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use bastion_lending::preview::{borrow_preview, lend_preview};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/lend", post(lend))
        .route("/lend/preview", get(get_lend_preview))
        .route("/borrow", post(borrow))
        .route("/borrow/preview", get(get_borrow_preview))
        .route("/borrow/offers", get(get_offers))
}

pub async fn lend(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LendRequest>,
) -> axum::response::Response {
    match services
        .lend(body.amount, body.interest_rate, body.duration_days)
        .await
    {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn get_lend_preview(
    Query(query): Query<dto::LendPreviewQuery>,
) -> axum::response::Response {
    match lend_preview(query.amount, query.interest_rate, query.duration_days) {
        Some(preview) => (StatusCode::OK, Json(preview)).into_response(),
        None => errors::out_of_range("expected return"),
    }
}

pub async fn borrow(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::BorrowRequest>,
) -> axum::response::Response {
    match services
        .borrow(body.amount, body.collateral, body.purpose)
        .await
    {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn get_borrow_preview(
    Query(query): Query<dto::BorrowPreviewQuery>,
) -> axum::response::Response {
    match borrow_preview(query.amount, query.collateral) {
        Some(preview) => (StatusCode::OK, Json(preview)).into_response(),
        None => errors::out_of_range("borrow terms"),
    }
}

pub async fn get_offers(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let offers: Vec<_> = services
        .loan_offers()
        .into_iter()
        .map(|offer| {
            let total_repayment = offer.total_repayment();
            serde_json::json!({
                "offer": offer,
                "total_repayment": total_repayment,
            })
        })
        .collect();
    Json(offers)
}
