//! Process-wide observability setup.

mod tracing_setup;

pub use tracing_setup::init;
