//! Runtime for applying conversation events
//!
//! The coordinator is the only writer of conversation records. Events for
//! one thread are serialized; distinct threads run in parallel.

mod coordinator;
mod locks;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use coordinator::{Coordinator, CoordinatorError, Outcome};
pub use traits::*;

/// Type alias for the production coordinator backed by SQLite
pub type ProductionCoordinator = Coordinator<DatabaseStorage>;
