use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use lendbook_core::{Identity, LoanId};
use lendbook_ledger::OpenLoan;
use lendbook_reconciler::ReturnLoan;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::IdentityContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_loan).get(outstanding))
        .route("/lent", get(lent))
        .route("/borrowed", get(borrowed))
        .route("/archive", get(archive))
        .route("/:id/return", post(return_loan))
}

pub async fn create_loan(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<IdentityContext>,
    Json(body): Json<dto::CreateLoanRequest>,
) -> axum::response::Response {
    let borrower = match Identity::new(body.borrower) {
        Ok(v) => v,
        Err(e) => return errors::lend_error_to_response(e),
    };

    let cmd = OpenLoan {
        lender: ctx.identity().clone(),
        borrower,
        item_name: body.item_name,
        quantity: body.quantity,
        date_given: body.date_given,
        date_due: body.date_due,
    };

    match services.reconciler().create_loan(&cmd).await {
        Ok(receipt) => (StatusCode::CREATED, Json(dto::receipt_to_json(&receipt))).into_response(),
        Err(e) => errors::lend_error_to_response(e),
    }
}

pub async fn return_loan(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<IdentityContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::ReturnLoanRequest>,
) -> axum::response::Response {
    let loan_id: LoanId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid loan id"),
    };

    let cmd = ReturnLoan {
        loan_id,
        lender: ctx.identity().clone(),
        item_name: body.item_name,
        quantity: body.quantity,
    };

    match services.reconciler().return_loan(&cmd).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "id": loan_id.to_string(),
                "returned": true,
            })),
        )
            .into_response(),
        Err(e) => errors::lend_error_to_response(e),
    }
}

pub async fn outstanding(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    loans_response(services.reconciler().outstanding().await)
}

pub async fn lent(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<IdentityContext>,
) -> axum::response::Response {
    loans_response(services.reconciler().lent_by(ctx.identity()).await)
}

pub async fn borrowed(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<IdentityContext>,
) -> axum::response::Response {
    loans_response(services.reconciler().borrowed_by(ctx.identity()).await)
}

pub async fn archive(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<IdentityContext>,
) -> axum::response::Response {
    loans_response(services.reconciler().archive_for(ctx.identity()).await)
}

fn loans_response(
    result: Result<Vec<lendbook_ledger::LoanRecord>, lendbook_core::LendError>,
) -> axum::response::Response {
    match result {
        Ok(loans) => {
            let loans: Vec<_> = loans.iter().map(dto::loan_to_json).collect();
            (StatusCode::OK, Json(loans)).into_response()
        }
        Err(e) => errors::lend_error_to_response(e),
    }
}
