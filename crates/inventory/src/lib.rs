//! Inventory domain module.
//!
//! This crate contains business rules for the personal inventory of lendable
//! items, implemented purely as deterministic domain logic (no IO, no HTTP,
//! no storage).

pub mod item;

pub use item::{AddItem, InventoryItem};
