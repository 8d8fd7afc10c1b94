use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use lendbook_inventory::InventoryItem;
use lendbook_ledger::LoanRecord;
use lendbook_reconciler::LoanReceipt;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub item_name: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateLoanRequest {
    pub borrower: String,
    pub item_name: String,
    pub quantity: i64,
    /// YYYY-MM-DD
    pub date_given: NaiveDate,
    pub date_due: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ReturnLoanRequest {
    pub item_name: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct InventoryListParams {
    #[serde(default)]
    pub available: Option<bool>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn item_to_json(item: &InventoryItem) -> serde_json::Value {
    json!({
        "id": item.id().to_string(),
        "owner": item.owner().as_str(),
        "item_name": item.item_name(),
        "quantity": item.quantity(),
        "available": item.available(),
    })
}

pub fn loan_to_json(loan: &LoanRecord) -> serde_json::Value {
    json!({
        "id": loan.id().to_string(),
        "lender": loan.lender().as_str(),
        "borrower": loan.borrower().as_str(),
        "item_name": loan.item_name(),
        "quantity": loan.quantity(),
        "date_given": loan.date_given(),
        "date_due": loan.date_due(),
        "returned": loan.returned(),
        "overdue": loan.is_overdue(Utc::now().date_naive()),
    })
}

pub fn receipt_to_json(receipt: &LoanReceipt) -> serde_json::Value {
    json!({
        "loan": loan_to_json(&receipt.loan),
        "stock_warning": receipt.stock_warning.as_ref().map(|w| json!({
            "item_name": w.item_name,
            "message": w.message,
        })),
    })
}
