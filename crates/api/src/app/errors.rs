use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use lendbook_core::LendError;

pub fn lend_error_to_response(err: LendError) -> axum::response::Response {
    let (status, code) = match &err {
        LendError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        LendError::ItemNotFound(_) => (StatusCode::NOT_FOUND, "item_not_found"),
        LendError::InsufficientQuantity { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_quantity")
        }
        LendError::LedgerWriteFailed(_) => (StatusCode::BAD_GATEWAY, "ledger_write_failed"),
        LendError::InventoryWriteFailed(_) => (StatusCode::BAD_GATEWAY, "inventory_write_failed"),
        LendError::StoreUnavailable(_) => (StatusCode::BAD_GATEWAY, "store_unavailable"),
    };
    json_error(status, code, err.to_string())
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
