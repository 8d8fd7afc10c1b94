//! Generic remote tabular store.
//!
//! The backend-as-a-service is modeled as a plain table store: filtered reads,
//! inserts and field-wise patches, one call per operation, no cross-call
//! transactions. The `TableStore` trait is the seam; the in-memory
//! implementation backs tests and dev, the Postgres one (cargo feature
//! `postgres`) backs deployments.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod table;

pub use in_memory::InMemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;
pub use table::{Filter, Order, Row, StoreError, TableStore, from_row, to_row};
