//! Read-only listings over the ledger and inventory tables.
//!
//! These back the list screens: lent, borrowed, everything outstanding, the
//! archive of returned loans, and the owner's inventory. Reads take no locks.

use lendbook_core::{Identity, LendError, LendResult};
use lendbook_inventory::InventoryItem;
use lendbook_ledger::LoanRecord;
use lendbook_store::{Filter, Order, TableStore, from_row};

use crate::reconciler::Reconciler;
use crate::tables::{self, BORROWINGS, INVENTORY};

impl<S: TableStore> Reconciler<S> {
    /// Outstanding loans the identity gave out, newest first.
    pub async fn lent_by(&self, lender: &Identity) -> LendResult<Vec<LoanRecord>> {
        self.loans(
            Filter::new()
                .eq(tables::borrowings::LENDER, lender.as_str())
                .eq(tables::borrowings::RETURNED, false),
        )
        .await
    }

    /// Outstanding loans the identity received, newest first.
    pub async fn borrowed_by(&self, borrower: &Identity) -> LendResult<Vec<LoanRecord>> {
        self.loans(
            Filter::new()
                .eq(tables::borrowings::BORROWER, borrower.as_str())
                .eq(tables::borrowings::RETURNED, false),
        )
        .await
    }

    /// Every outstanding loan, newest first.
    pub async fn outstanding(&self) -> LendResult<Vec<LoanRecord>> {
        self.loans(Filter::new().eq(tables::borrowings::RETURNED, false))
            .await
    }

    /// Returned loans with the identity on either side, newest first.
    pub async fn archive_for(&self, identity: &Identity) -> LendResult<Vec<LoanRecord>> {
        self.loans(
            Filter::new()
                .eq(tables::borrowings::RETURNED, true)
                .any_of([
                    (tables::borrowings::LENDER, identity.as_str()),
                    (tables::borrowings::BORROWER, identity.as_str()),
                ]),
        )
        .await
    }

    /// The owner's inventory, optionally restricted to available rows.
    pub async fn inventory_of(
        &self,
        owner: &Identity,
        only_available: bool,
    ) -> LendResult<Vec<InventoryItem>> {
        let mut filter = Filter::new().eq(tables::inventory::OWNER, owner.as_str());
        if only_available {
            filter = filter.eq(tables::inventory::AVAILABLE, true);
        }

        let rows = self
            .store()
            .fetch_many(INVENTORY, &filter, Order::asc(tables::inventory::ITEM_NAME))
            .await
            .map_err(|e| LendError::store_unavailable(e.to_string()))?;

        rows.into_iter()
            .map(|row| from_row(row).map_err(|e| LendError::store_unavailable(e.to_string())))
            .collect()
    }

    async fn loans(&self, filter: Filter) -> LendResult<Vec<LoanRecord>> {
        let rows = self
            .store()
            .fetch_many(
                BORROWINGS,
                &filter,
                Order::desc(tables::borrowings::DATE_GIVEN),
            )
            .await
            .map_err(|e| LendError::store_unavailable(e.to_string()))?;

        rows.into_iter()
            .map(|row| from_row(row).map_err(|e| LendError::store_unavailable(e.to_string())))
            .collect()
    }
}
