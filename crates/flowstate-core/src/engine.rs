//! Thread-safe engine facade.
//!
//! `WorkflowEngine` is the only component that mutates the stores. Every
//! method is synchronous and bounded; share one engine behind an `Arc` and
//! call it from any number of tasks or threads.

use std::sync::Arc;

use flowstate_types::error::{ActionError, DefinitionError, InstanceError};
use flowstate_types::workflow::{DefinitionId, InstanceId, WorkflowDefinition, WorkflowInstance};
use tracing::{debug, error, info};

use crate::store::{DefinitionStore, InstanceStore, StoreError};
use crate::transition;

/// Entry point for registering definitions and driving instances.
#[derive(Debug, Default)]
pub struct WorkflowEngine {
    definitions: DefinitionStore,
    instances: InstanceStore,
}

impl WorkflowEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Definitions
    // -----------------------------------------------------------------------

    /// Validate and register a definition. Returns its id.
    pub fn create_definition(
        &self,
        def: WorkflowDefinition,
    ) -> Result<DefinitionId, DefinitionError> {
        transition::validate_definition(&def)?;
        let stored = self.definitions.register(def)?;
        info!(
            def_id = %stored.id,
            states = stored.states.len(),
            actions = stored.actions.len(),
            "registered workflow definition"
        );
        Ok(stored.id.clone())
    }

    pub fn get_definition(&self, id: &str) -> Option<Arc<WorkflowDefinition>> {
        self.definitions.get(id)
    }

    /// All definitions in registration order.
    pub fn list_definitions(&self) -> Vec<Arc<WorkflowDefinition>> {
        self.definitions.list()
    }

    // -----------------------------------------------------------------------
    // Instances
    // -----------------------------------------------------------------------

    /// Start a new instance of `def_id` in the definition's initial state.
    ///
    /// Nothing is inserted unless every check passes.
    pub fn create_instance(&self, def_id: &str) -> Result<WorkflowInstance, InstanceError> {
        let def = self
            .definitions
            .get(def_id)
            .ok_or_else(|| InstanceError::DefinitionNotFound(def_id.to_string()))?;
        let initial = transition::pick_initial_state(&def)?;

        let instance = self.instances.insert(|id| WorkflowInstance {
            id,
            def_id: def.id.clone(),
            current_state: initial.id.clone(),
            history: Vec::new(),
        });

        info!(
            instance_id = %instance.id,
            def_id = %instance.def_id,
            state = %instance.current_state,
            "created workflow instance"
        );
        Ok(instance)
    }

    /// Snapshot of an instance. Ids that are not valid instance ids are
    /// simply unknown.
    pub fn get_instance(&self, id: &str) -> Option<WorkflowInstance> {
        let id = id.parse::<InstanceId>().ok()?;
        self.instances.get(&id)
    }

    /// Instances in creation order, optionally only those of one definition.
    pub fn list_instances(&self, def_id: Option<&str>) -> Vec<WorkflowInstance> {
        self.instances.list(def_id)
    }

    /// Apply `action_id` to an instance and return the updated instance.
    ///
    /// Validation runs inside the instance's atomic mutate step against the
    /// state at that moment, so concurrent calls on one instance serialize
    /// and a rejected call leaves the instance untouched.
    pub fn apply_action(
        &self,
        instance_id: &str,
        action_id: &str,
    ) -> Result<WorkflowInstance, ActionError> {
        let not_found = || ActionError::InstanceNotFound(instance_id.to_string());

        let id = instance_id.parse::<InstanceId>().map_err(|_| not_found())?;
        // def_id never changes, so reading it ahead of the mutate is safe.
        let def_id = self.instances.get(&id).ok_or_else(not_found)?.def_id;

        let def = self.definitions.get(&def_id).ok_or_else(|| {
            error!(
                %instance_id,
                %def_id,
                "instance references a definition missing from the store"
            );
            ActionError::Internal(format!(
                "instance '{instance_id}' references missing definition '{def_id}'"
            ))
        })?;

        let outcome = self
            .instances
            .mutate(
                &id,
                |instance: &mut WorkflowInstance| -> Result<WorkflowInstance, ActionError> {
                    let step = transition::apply_action(&def, instance, action_id)?;
                    step.commit(instance);
                    Ok(instance.clone())
                },
            )
            .map_err(|e| match e {
                StoreError::NotFound(_) => not_found(),
                StoreError::Poisoned(_) => {
                    error!(%instance_id, "instance lock poisoned");
                    ActionError::Internal(e.to_string())
                }
            })?;

        match &outcome {
            Ok(updated) => info!(
                %instance_id,
                %action_id,
                state = %updated.current_state,
                history_len = updated.history.len(),
                "applied action"
            ),
            Err(e) => debug!(%instance_id, %action_id, error = %e, "action rejected"),
        }
        outcome
    }
}
