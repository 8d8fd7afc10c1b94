use serde::{Deserialize, Serialize};

use lendbook_core::{Identity, ItemId, LendError, LendResult};

/// Command: add units of a named item to an owner's inventory.
///
/// Merge semantics: repeated adds of the same name accumulate on one row, they
/// never overwrite or duplicate it. The row-vs-merge decision itself lives in
/// the reconciler; this command only carries the validated input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub owner: Identity,
    pub item_name: String,
    pub quantity: i64,
}

impl AddItem {
    /// Validate the command. `quantity` must be positive, `item_name` non-blank.
    pub fn validate(&self) -> LendResult<()> {
        if self.item_name.trim().is_empty() {
            return Err(LendError::validation("item name cannot be empty"));
        }
        if self.quantity <= 0 {
            return Err(LendError::validation("quantity must be positive"));
        }
        Ok(())
    }
}

/// One row of an owner's inventory.
///
/// Invariant: `available == (quantity > 0)` and `quantity >= 0`, maintained by
/// every transition. Rows are scoped to exactly one owner and are never deleted
/// by the lending flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    id: ItemId,
    owner: Identity,
    item_name: String,
    quantity: i64,
    available: bool,
}

impl InventoryItem {
    /// Create the first row for `(owner, item_name)`.
    pub fn create(cmd: &AddItem) -> LendResult<Self> {
        cmd.validate()?;
        Ok(Self {
            id: ItemId::new(),
            owner: cmd.owner.clone(),
            item_name: cmd.item_name.trim().to_string(),
            quantity: cmd.quantity,
            available: cmd.quantity > 0,
        })
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn owner(&self) -> &Identity {
        &self.owner
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn available(&self) -> bool {
        self.available
    }

    /// Fold another add of the same name into this row.
    pub fn merge_add(&mut self, quantity: i64) -> LendResult<()> {
        if quantity <= 0 {
            return Err(LendError::validation("quantity must be positive"));
        }
        self.quantity += quantity;
        self.recompute_availability();
        Ok(())
    }

    /// Remove loaned units from stock.
    ///
    /// Fails with `InsufficientQuantity` before touching anything when the
    /// request exceeds current stock; quantity never goes below zero.
    pub fn deduct(&mut self, quantity: i64) -> LendResult<()> {
        if quantity <= 0 {
            return Err(LendError::validation("quantity must be positive"));
        }
        if self.quantity < quantity {
            return Err(LendError::insufficient(quantity, self.quantity));
        }
        self.quantity -= quantity;
        self.recompute_availability();
        Ok(())
    }

    /// Put returned units back into stock.
    pub fn restock(&mut self, quantity: i64) -> LendResult<()> {
        if quantity <= 0 {
            return Err(LendError::validation("quantity must be positive"));
        }
        self.quantity += quantity;
        self.recompute_availability();
        Ok(())
    }

    fn recompute_availability(&mut self) {
        self.available = self.quantity > 0;
    }
}
