use axum::{Extension, Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::context::IdentityContext;

pub async fn health() -> axum::response::Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

pub async fn whoami(Extension(ctx): Extension<IdentityContext>) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(json!({ "identity": ctx.identity().as_str() })),
    )
        .into_response()
}
