//! Application state shared by the REST API handlers.

use std::sync::Arc;

use flowstate_core::WorkflowEngine;

/// Shared application state.
///
/// The engine does its own locking, so cloning the state per request only
/// bumps a reference count.
#[derive(Clone, Default)]
pub struct AppState {
    pub engine: Arc<WorkflowEngine>,
}

impl AppState {
    /// Create state around a fresh, empty engine.
    pub fn new() -> Self {
        Self::default()
    }
}
