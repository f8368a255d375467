use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use bastion_infra::DispatchError;

pub fn dispatch_error_to_response(err: DispatchError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        DispatchError::InsufficientFunds(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "insufficient_funds", message)
        }
        DispatchError::Validation(_) => json_error(StatusCode::BAD_REQUEST, "validation_error", message),
        DispatchError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", message),
        DispatchError::InvariantViolation(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", message)
        }
        DispatchError::Pending(_) => json_error(StatusCode::CONFLICT, "operation_pending", message),
        DispatchError::Poisoned => {
            tracing::error!("ledger state lock poisoned");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
        }
        DispatchError::Publish(_) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "publish_error", message)
        }
    }
}

/// Preview figures that do not fit in a decimal are a bad request.
pub fn out_of_range(what: &str) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "validation_error",
        format!("{what} exceeds the representable range"),
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
