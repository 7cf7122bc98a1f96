//! In-memory stores for definitions and instances.
//!
//! Callers never see the underlying maps. Definitions are shared as
//! `Arc<WorkflowDefinition>`; instances are handed out as copies and only
//! changed through [`InstanceStore::mutate`].

pub mod definition;
pub mod instance;

pub use definition::DefinitionStore;
pub use instance::{InstanceStore, StoreError};
