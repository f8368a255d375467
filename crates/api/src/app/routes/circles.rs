use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use bastion_lending::CircleId;
use bastion_lending::preview::circle_pool;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_circle))
        .route("/available", get(get_available))
        .route("/preview", get(get_preview))
        .route("/join", post(join_circle))
        .route("/bid", post(place_bid))
        .route("/:id/distribute", post(distribute))
}

pub async fn create_circle(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCircleRequest>,
) -> axum::response::Response {
    match services
        .create_circle(body.name, body.monthly_amount, body.member_count)
        .await
    {
        Ok(account) => (StatusCode::CREATED, Json(account)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

/// Catalog circles the account has not joined.
pub async fn get_available(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.available_circles() {
        Ok(circles) => (StatusCode::OK, Json(circles)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn get_preview(
    Query(query): Query<dto::CirclePreviewQuery>,
) -> axum::response::Response {
    let Some(total_pool) = circle_pool(query.monthly_amount, query.member_count) else {
        return errors::out_of_range("circle pool");
    };
    Json(serde_json::json!({
        "monthly_amount": query.monthly_amount,
        "member_count": query.member_count,
        "total_pool": total_pool,
    }))
    .into_response()
}

pub async fn join_circle(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::JoinCircleRequest>,
) -> axum::response::Response {
    let circle_id = CircleId::new(body.circle_id);
    match services.join_circle(&circle_id, body.stake_amount).await {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn place_bid(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::BidRequest>,
) -> axum::response::Response {
    match services.bid(body.circle_id, body.bid_amount).await {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn distribute(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.distribute(id).await {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}
