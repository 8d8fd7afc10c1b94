use axum::{Router, routing::get};

pub mod inventory;
pub mod loans;
pub mod system;

/// Router for all identity-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/inventory", inventory::router())
        .nest("/loans", loans::router())
}
