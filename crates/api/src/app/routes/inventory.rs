use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use lendbook_inventory::AddItem;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::IdentityContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_inventory))
        .route("/items", post(add_item))
}

pub async fn add_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<IdentityContext>,
    Json(body): Json<dto::AddItemRequest>,
) -> axum::response::Response {
    let cmd = AddItem {
        owner: ctx.identity().clone(),
        item_name: body.item_name,
        quantity: body.quantity,
    };

    match services.reconciler().add_or_merge_item(&cmd).await {
        Ok(item) => (StatusCode::CREATED, Json(dto::item_to_json(&item))).into_response(),
        Err(e) => errors::lend_error_to_response(e),
    }
}

pub async fn list_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<IdentityContext>,
    Query(params): Query<dto::InventoryListParams>,
) -> axum::response::Response {
    let only_available = params.available.unwrap_or(false);

    match services
        .reconciler()
        .inventory_of(ctx.identity(), only_available)
        .await
    {
        Ok(items) => {
            let items: Vec<_> = items.iter().map(dto::item_to_json).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::lend_error_to_response(e),
    }
}
