//! Registry of immutable workflow definitions.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use flowstate_types::error::DefinitionError;
use flowstate_types::workflow::{DefinitionId, WorkflowDefinition};
use tracing::debug;

/// A registered definition plus its registration sequence number.
#[derive(Debug)]
struct StoredDefinition {
    seq: u64,
    def: Arc<WorkflowDefinition>,
}

/// Concurrent store of workflow definitions keyed by id.
///
/// Registration is a single check-and-insert on the map entry, so two
/// concurrent registrations of the same id cannot both succeed. Entries are
/// never replaced or removed.
#[derive(Debug, Default)]
pub struct DefinitionStore {
    entries: DashMap<DefinitionId, StoredDefinition>,
    next_seq: AtomicU64,
}

impl DefinitionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition under its own id.
    ///
    /// Returns the shared handle on success. If the id is taken the stored
    /// definition is left untouched and `AlreadyExists` is returned.
    pub fn register(
        &self,
        def: WorkflowDefinition,
    ) -> Result<Arc<WorkflowDefinition>, DefinitionError> {
        match self.entries.entry(def.id.clone()) {
            Entry::Occupied(_) => Err(DefinitionError::AlreadyExists(def.id)),
            Entry::Vacant(slot) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                let def = Arc::new(def);
                slot.insert(StoredDefinition {
                    seq,
                    def: Arc::clone(&def),
                });
                debug!(def_id = %def.id, seq, "stored workflow definition");
                Ok(def)
            }
        }
    }

    /// Get a definition by id.
    pub fn get(&self, id: &str) -> Option<Arc<WorkflowDefinition>> {
        self.entries.get(id).map(|r| Arc::clone(&r.value().def))
    }

    /// All definitions in registration order.
    pub fn list(&self) -> Vec<Arc<WorkflowDefinition>> {
        let mut stored: Vec<(u64, Arc<WorkflowDefinition>)> = self
            .entries
            .iter()
            .map(|r| (r.value().seq, Arc::clone(&r.value().def)))
            .collect();
        stored.sort_by_key(|(seq, _)| *seq);
        stored.into_iter().map(|(_, def)| def).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
