use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use lendbook_core::{Identity, LendError, LendResult, LoanId};
use lendbook_inventory::{AddItem, InventoryItem};
use lendbook_ledger::{LoanRecord, OpenLoan};
use lendbook_store::{Filter, Row, TableStore, from_row, to_row};

use crate::locks::ItemLocks;
use crate::tables::{self, BORROWINGS, INVENTORY};

/// Command: mark a loan returned and restock the lender's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnLoan {
    pub loan_id: LoanId,
    pub lender: Identity,
    pub item_name: String,
    pub quantity: i64,
}

impl ReturnLoan {
    fn validate(&self) -> LendResult<()> {
        if self.item_name.trim().is_empty() {
            return Err(LendError::validation("item name cannot be empty"));
        }
        if self.quantity <= 0 {
            return Err(LendError::validation("quantity must be positive"));
        }
        Ok(())
    }
}

/// A loan that stayed recorded although the paired stock deduction (and its
/// rollback) failed. Shown to the user, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockWarning {
    pub item_name: String,
    pub message: String,
}

/// Outcome of a successful `create_loan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanReceipt {
    pub loan: LoanRecord,
    pub stock_warning: Option<StockWarning>,
}

/// Paired ledger/inventory updates over a remote table store.
///
/// Every operation takes the acting identities explicitly; nothing is read
/// from ambient session state. In-process callers touching the same
/// (owner, item) pair are serialized through [`ItemLocks`]; callers in other
/// processes are not, so simultaneous multi-device loans can still over-draw
/// stock (inherited limitation of the per-call store contract).
pub struct Reconciler<S> {
    store: S,
    locks: ItemLocks,
}

impl<S: TableStore> Reconciler<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: ItemLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a loan and deduct the loaned units from the lender's stock.
    ///
    /// Step contract:
    /// 1. fetch the lender's inventory row; `ItemNotFound` if absent;
    /// 2. reject with `InsufficientQuantity` before any write when stock is short;
    /// 3. append the ledger row; `LedgerWriteFailed` aborts with inventory untouched;
    /// 4. deduct stock. If this write fails after step 3, the just-inserted
    ///    ledger row is deleted again (compensating rollback) and the call
    ///    fails with `InventoryWriteFailed`. Only when that rollback *also*
    ///    fails does the loan stay recorded, with a [`StockWarning`] on the
    ///    receipt instead of an error.
    pub async fn create_loan(&self, cmd: &OpenLoan) -> LendResult<LoanReceipt> {
        cmd.validate()?;
        let item_name = cmd.item_name.trim();

        let _guard = self.locks.acquire(&cmd.lender, item_name).await;

        let mut item = self.fetch_item(&cmd.lender, item_name).await?;
        item.deduct(cmd.quantity)?;

        let loan = LoanRecord::open(cmd)?;
        let loan_row = to_row(&loan).map_err(|e| LendError::ledger_write(e.to_string()))?;
        self.store
            .insert(BORROWINGS, loan_row)
            .await
            .map_err(|e| LendError::ledger_write(e.to_string()))?;

        match self.persist_item(&item).await {
            Ok(()) => {
                info!(
                    loan_id = %loan.id(),
                    lender = %cmd.lender,
                    borrower = %cmd.borrower,
                    item_name,
                    quantity = cmd.quantity,
                    "loan recorded and stock deducted"
                );
                Ok(LoanReceipt {
                    loan,
                    stock_warning: None,
                })
            }
            Err(inventory_err) => self.roll_back_loan(loan, item_name, inventory_err).await,
        }
    }

    /// Compensate a failed stock deduction by removing the ledger row again.
    async fn roll_back_loan(
        &self,
        loan: LoanRecord,
        item_name: &str,
        inventory_err: LendError,
    ) -> LendResult<LoanReceipt> {
        let loan_filter = Filter::new().eq(tables::borrowings::ID, loan.id().to_string());
        match self.store.delete(BORROWINGS, &loan_filter).await {
            Ok(_) => {
                warn!(
                    loan_id = %loan.id(),
                    item_name,
                    error = %inventory_err,
                    "stock deduction failed; ledger row rolled back"
                );
                Err(inventory_err)
            }
            Err(rollback_err) => {
                // Ledger and inventory now diverge: the loan exists, the stock
                // was never deducted. Surfaced as a warning on the receipt.
                warn!(
                    loan_id = %loan.id(),
                    item_name,
                    error = %inventory_err,
                    rollback_error = %rollback_err,
                    "stock deduction and rollback both failed; loan kept without deduction"
                );
                Ok(LoanReceipt {
                    stock_warning: Some(StockWarning {
                        item_name: item_name.to_string(),
                        message: format!(
                            "loan recorded, but stock for '{item_name}' was not reduced: {inventory_err}"
                        ),
                    }),
                    loan,
                })
            }
        }
    }

    /// Flip a loan to returned and put the units back into the lender's stock.
    ///
    /// Fails closed: the ledger flip comes first, and no inventory change is
    /// attempted unless it succeeded. A missing inventory row (deleted
    /// out-of-band) or a failed restock leaves the flag set and is surfaced to
    /// the caller as a non-fatal error.
    pub async fn return_loan(&self, cmd: &ReturnLoan) -> LendResult<()> {
        cmd.validate()?;
        let item_name = cmd.item_name.trim();

        let _guard = self.locks.acquire(&cmd.lender, item_name).await;

        let loan_filter = Filter::new()
            .eq(tables::borrowings::ID, cmd.loan_id.to_string())
            .eq(tables::borrowings::RETURNED, false);
        let mut patch = Row::new();
        patch.insert(
            tables::borrowings::RETURNED.to_string(),
            JsonValue::Bool(true),
        );

        let matched = self
            .store
            .update(BORROWINGS, &loan_filter, patch)
            .await
            .map_err(|e| LendError::ledger_write(e.to_string()))?;
        if matched == 0 {
            return Err(LendError::validation(
                "loan not found or already returned",
            ));
        }

        let mut item = match self.fetch_item(&cmd.lender, item_name).await {
            Ok(item) => item,
            Err(e) => {
                warn!(
                    loan_id = %cmd.loan_id,
                    lender = %cmd.lender,
                    item_name,
                    error = %e,
                    "loan marked returned but stock was not restored"
                );
                return Err(e);
            }
        };

        item.restock(cmd.quantity)?;
        if let Err(e) = self.persist_item(&item).await {
            warn!(
                loan_id = %cmd.loan_id,
                lender = %cmd.lender,
                item_name,
                error = %e,
                "loan marked returned but stock was not restored"
            );
            return Err(e);
        }

        info!(
            loan_id = %cmd.loan_id,
            lender = %cmd.lender,
            item_name,
            quantity = cmd.quantity,
            "loan returned and stock restored"
        );
        Ok(())
    }

    /// Add units to the owner's inventory, merging into the existing row for
    /// the same name when there is one.
    ///
    /// Lookup-then-branch, serialized per (owner, item) in-process; repeated
    /// adds accumulate on a single row instead of creating duplicates.
    pub async fn add_or_merge_item(&self, cmd: &AddItem) -> LendResult<InventoryItem> {
        cmd.validate()?;
        let item_name = cmd.item_name.trim();

        let _guard = self.locks.acquire(&cmd.owner, item_name).await;

        let existing = self
            .store
            .fetch_one(INVENTORY, &item_filter(&cmd.owner, item_name))
            .await
            .map_err(|e| LendError::store_unavailable(e.to_string()))?;

        let item = match existing {
            Some(row) => {
                let mut item: InventoryItem =
                    from_row(row).map_err(|e| LendError::store_unavailable(e.to_string()))?;
                item.merge_add(cmd.quantity)?;
                self.persist_item(&item).await?;
                item
            }
            None => {
                let item = InventoryItem::create(cmd)?;
                let row = to_row(&item).map_err(|e| LendError::inventory_write(e.to_string()))?;
                self.store
                    .insert(INVENTORY, row)
                    .await
                    .map_err(|e| LendError::inventory_write(e.to_string()))?;
                item
            }
        };

        info!(
            owner = %cmd.owner,
            item_name,
            quantity = cmd.quantity,
            total = item.quantity(),
            "inventory item added"
        );
        Ok(item)
    }

    async fn fetch_item(&self, owner: &Identity, item_name: &str) -> LendResult<InventoryItem> {
        let row = self
            .store
            .fetch_one(INVENTORY, &item_filter(owner, item_name))
            .await
            .map_err(|e| LendError::store_unavailable(e.to_string()))?
            .ok_or_else(|| LendError::item_not_found(item_name))?;

        from_row(row).map_err(|e| LendError::store_unavailable(e.to_string()))
    }

    /// Write back quantity and the derived availability flag of one row.
    async fn persist_item(&self, item: &InventoryItem) -> LendResult<()> {
        let filter = Filter::new().eq(tables::inventory::ID, item.id().to_string());
        let mut patch = Row::new();
        patch.insert(
            tables::inventory::QUANTITY.to_string(),
            JsonValue::from(item.quantity()),
        );
        patch.insert(
            tables::inventory::AVAILABLE.to_string(),
            JsonValue::Bool(item.available()),
        );

        let matched = self
            .store
            .update(INVENTORY, &filter, patch)
            .await
            .map_err(|e| LendError::inventory_write(e.to_string()))?;
        if matched == 0 {
            return Err(LendError::inventory_write(format!(
                "inventory row for '{}' disappeared",
                item.item_name()
            )));
        }
        Ok(())
    }
}

pub(crate) fn item_filter(owner: &Identity, item_name: &str) -> Filter {
    Filter::new()
        .eq(tables::inventory::OWNER, owner.as_str())
        .eq(tables::inventory::ITEM_NAME, item_name)
}
