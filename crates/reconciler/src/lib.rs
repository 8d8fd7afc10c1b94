//! The reconciler: paired updates of the loan ledger and the inventory store.
//!
//! Creating a loan reads current stock, validates, appends a ledger row, then
//! deducts stock. Returning a loan flips the ledger row, then restores stock.
//! Both are sequential chains of remote calls with no cross-call transaction;
//! the failure semantics of every step are part of the contract and are
//! documented on the operations themselves.

pub mod locks;
pub mod queries;
pub mod reconciler;
pub mod tables;


pub use reconciler::{LoanReceipt, Reconciler, ReturnLoan, StockWarning};
