use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use bastion_infra::OperationSlot;

use crate::app::services::AppServices;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// In-flight flag per operation slot.
pub async fn pending(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let slots = [
        OperationSlot::Staking,
        OperationSlot::Lending,
        OperationSlot::Borrowing,
        OperationSlot::Circles,
    ];
    let body: serde_json::Map<String, serde_json::Value> = slots
        .into_iter()
        .map(|slot| (slot.to_string(), services.is_pending(slot).into()))
        .collect();
    Json(body)
}
