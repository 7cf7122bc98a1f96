//! Store of running workflow instances.
//!
//! Each instance lives behind its own `Mutex` inside an `Arc`. The map is
//! only touched to find or insert that `Arc`; its shard guard is dropped
//! before the instance lock is taken. Mutations of one instance therefore
//! serialize on that instance's lock while different instances never
//! contend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use flowstate_types::workflow::{InstanceId, WorkflowInstance};
use thiserror::Error;
use tracing::{debug, warn};

/// Failures of the store itself, as opposed to rejections from the mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("instance {0} not found")]
    NotFound(InstanceId),

    /// A previous mutation panicked while holding the instance lock.
    #[error("instance {0} lock poisoned")]
    Poisoned(InstanceId),
}

#[derive(Debug)]
struct InstanceSlot {
    seq: u64,
    instance: Mutex<WorkflowInstance>,
}

impl InstanceSlot {
    /// Lock for reading. A poisoned lock still yields its value: the
    /// snapshot is only copied out, never written back.
    fn read(&self) -> MutexGuard<'_, WorkflowInstance> {
        self.instance.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Concurrent store of workflow instances keyed by store-generated id.
#[derive(Debug, Default)]
pub struct InstanceStore {
    entries: DashMap<InstanceId, Arc<InstanceSlot>>,
    next_seq: AtomicU64,
}

impl InstanceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new instance under a fresh id and return a copy of it.
    ///
    /// The store picks the id (UUID v7) and hands it to `build`; the id is
    /// reserved on the map entry before `build` runs, so it is never shared
    /// with another instance.
    pub fn insert<F>(&self, build: F) -> WorkflowInstance
    where
        F: FnOnce(InstanceId) -> WorkflowInstance,
    {
        loop {
            let id = InstanceId::new();
            match self.entries.entry(id) {
                Entry::Occupied(_) => {
                    warn!(%id, "instance id collision, regenerating");
                }
                Entry::Vacant(slot) => {
                    let mut instance = build(id);
                    instance.id = id;
                    let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                    slot.insert(Arc::new(InstanceSlot {
                        seq,
                        instance: Mutex::new(instance.clone()),
                    }));
                    debug!(%id, def_id = %instance.def_id, "stored workflow instance");
                    return instance;
                }
            }
        }
    }

    /// Snapshot of an instance, or `None` if the id is unknown.
    pub fn get(&self, id: &InstanceId) -> Option<WorkflowInstance> {
        let slot = self.slot(id)?;
        let snapshot = slot.read().clone();
        Some(snapshot)
    }

    /// Atomically read-modify-write one instance.
    ///
    /// `f` runs with the instance lock held and sees the state as of that
    /// moment. If `f` returns `Err`, it must not have modified the
    /// instance; the error is handed back unchanged inside `Ok`.
    pub fn mutate<T, E, F>(&self, id: &InstanceId, f: F) -> Result<Result<T, E>, StoreError>
    where
        F: FnOnce(&mut WorkflowInstance) -> Result<T, E>,
    {
        let slot = self.slot(id).ok_or(StoreError::NotFound(*id))?;
        let mut guard = slot
            .instance
            .lock()
            .map_err(|_| StoreError::Poisoned(*id))?;
        Ok(f(&mut *guard))
    }

    /// Snapshots of all instances in creation order, optionally restricted
    /// to one definition.
    pub fn list(&self, def_id: Option<&str>) -> Vec<WorkflowInstance> {
        let mut slots: Vec<Arc<InstanceSlot>> =
            self.entries.iter().map(|r| Arc::clone(r.value())).collect();
        slots.sort_by_key(|slot| slot.seq);

        slots
            .iter()
            .map(|slot| slot.read().clone())
            .filter(|instance| def_id.is_none_or(|d| instance.def_id == d))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clone the slot handle out so no map guard outlives this call.
    fn slot(&self, id: &InstanceId) -> Option<Arc<InstanceSlot>> {
        self.entries.get(id).map(|r| Arc::clone(r.value()))
    }
}
