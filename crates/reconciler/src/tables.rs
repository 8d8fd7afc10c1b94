//! Table and column names of the remote store, as the backend exposes them.

/// Personal inventories: one row per (owner, item_name).
pub const INVENTORY: &str = "inventory";

/// The shared loan ledger.
pub const BORROWINGS: &str = "borrowings";

pub mod inventory {
    pub const ID: &str = "id";
    pub const OWNER: &str = "owner";
    pub const ITEM_NAME: &str = "item_name";
    pub const QUANTITY: &str = "quantity";
    pub const AVAILABLE: &str = "available";
}

pub mod borrowings {
    pub const ID: &str = "id";
    pub const LENDER: &str = "lender";
    pub const BORROWER: &str = "borrower";
    pub const DATE_GIVEN: &str = "date_given";
    pub const RETURNED: &str = "returned";
}
