//! Loan ledger domain module.
//!
//! This crate contains business rules for loan records, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod loan;

pub use loan::{LoanRecord, OpenLoan};
