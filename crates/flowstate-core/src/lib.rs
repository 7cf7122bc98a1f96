//! Workflow engine for Flowstate.
//!
//! - [`store`]: the definition and instance stores, each owning its own
//!   synchronization.
//! - [`transition`]: pure decision logic (initial state, action lookup,
//!   transition validation). No shared state, no side effects.
//! - [`engine`]: the thread-safe facade the transport layer calls.
//!
//! Depends only on `flowstate-types` -- never on HTTP or IO crates.

pub mod engine;
pub mod store;
pub mod transition;

pub use engine::WorkflowEngine;
