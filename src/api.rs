//! HTTP API for threadline
//!
//! Decodes inbound messages into coordinator calls and encodes the results.

mod handlers;
mod types;

pub use handlers::create_router;

use crate::runtime::ProductionCoordinator;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<ProductionCoordinator>,
}

impl AppState {
    pub fn new(coordinator: Arc<ProductionCoordinator>) -> Self {
        Self { coordinator }
    }
}
