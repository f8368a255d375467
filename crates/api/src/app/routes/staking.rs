use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use bastion_lending::preview::staking_reward;
use bastion_lending::terms::STAKING_APY;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/stake", post(stake))
        .route("/stake/preview", get(stake_preview))
        .route("/unstake", post(unstake))
}

pub async fn stake(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::StakeRequest>,
) -> axum::response::Response {
    match services.stake(body.amount).await {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

/// Moves the whole staked balance back to the wallet.
pub async fn unstake(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.unstake().await {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn stake_preview(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::StakePreviewQuery>,
) -> axum::response::Response {
    let amount = match query.amount {
        Some(amount) => amount,
        None => match services.snapshot() {
            Ok(account) => account.staked_amount(),
            Err(e) => return errors::dispatch_error_to_response(e),
        },
    };

    let Some(reward) = staking_reward(amount) else {
        return errors::out_of_range("staking reward");
    };
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "amount": amount,
            "apy": STAKING_APY,
            "estimated_annual_reward": reward,
        })),
    )
        .into_response()
}
