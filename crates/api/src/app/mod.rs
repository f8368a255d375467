//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: ledger service construction and the activity log subscriber
//! - `routes/`: HTTP routes + handlers (one file per product area)
//! - `dto.rs`: request DTOs and query parameters
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use bastion_infra::{DispatchError, EngineConfig};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Must be called from within a Tokio runtime.
pub async fn build_app(config: &EngineConfig) -> Result<Router, DispatchError> {
    let services = Arc::new(services::build_services(config)?);

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(services))))
}
