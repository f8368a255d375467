use axum::{routing::get, Router};

pub mod account;
pub mod circles;
pub mod lending;
pub mod staking;
pub mod system;

/// Router for every ledger endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/pending", get(system::pending))
        .nest("/account", account::router())
        .merge(staking::router())
        .merge(lending::router())
        .nest("/circles", circles::router())
}
