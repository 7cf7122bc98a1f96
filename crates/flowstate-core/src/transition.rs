//! Pure transition logic.
//!
//! Everything here works on borrowed definitions and instances and returns
//! a decision; nothing is mutated and no store is touched. The engine
//! facade is responsible for committing a [`Transition`] under the
//! instance lock.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use flowstate_types::error::{DefinitionError, InstanceError, TransitionError};
use flowstate_types::workflow::{
    ActionDef, HistoryItem, State, WorkflowDefinition, WorkflowInstance,
};

/// The outcome of a validated action: where the instance goes next and the
/// history entry recording it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub new_state: String,
    pub history_item: HistoryItem,
}

impl Transition {
    /// Write this transition into `instance`.
    pub fn commit(self, instance: &mut WorkflowInstance) {
        instance.history.push(self.history_item);
        instance.current_state = self.new_state;
    }
}

/// The state new instances start in: the first state marked initial, in
/// declared order.
pub fn pick_initial_state(def: &WorkflowDefinition) -> Result<&State, InstanceError> {
    def.states
        .iter()
        .find(|s| s.is_initial)
        .ok_or_else(|| InstanceError::NoInitialState(def.id.clone()))
}

/// First action whose id matches exactly.
pub fn find_action<'a>(def: &'a WorkflowDefinition, action_id: &str) -> Option<&'a ActionDef> {
    def.actions.iter().find(|a| a.id == action_id)
}

/// Decide whether `action_id` applies to `instance` right now.
pub fn apply_action(
    def: &WorkflowDefinition,
    instance: &WorkflowInstance,
    action_id: &str,
) -> Result<Transition, TransitionError> {
    apply_action_at(def, instance, action_id, Utc::now())
}

/// [`apply_action`] with an explicit clock reading.
///
/// The history timestamp is `now`, raised to the instance's latest history
/// timestamp if the clock has stepped backwards, so history stays
/// chronological.
pub fn apply_action_at(
    def: &WorkflowDefinition,
    instance: &WorkflowInstance,
    action_id: &str,
    now: DateTime<Utc>,
) -> Result<Transition, TransitionError> {
    let action = find_action(def, action_id)
        .ok_or_else(|| TransitionError::ActionNotFound(action_id.to_string()))?;

    if !action.allowed_from(&instance.current_state) {
        return Err(TransitionError::ActionNotAllowedFromState {
            action: action_id.to_string(),
            state: instance.current_state.clone(),
        });
    }

    let timestamp = match instance.last_transition_at() {
        Some(last) if last > now => last,
        _ => now,
    };

    Ok(Transition {
        new_state: action.to_state.clone(),
        history_item: HistoryItem {
            action_id: action.id.clone(),
            timestamp,
        },
    })
}

/// Registration-time checks on a definition.
///
/// Rejects an empty id, empty or duplicate state ids, empty action ids,
/// and actions referring to undeclared states. Does not require an initial
/// state (that is checked when an instance is created) and accepts
/// several initial states (the first one wins).
pub fn validate_definition(def: &WorkflowDefinition) -> Result<(), DefinitionError> {
    if def.id.trim().is_empty() {
        return Err(DefinitionError::Invalid("definition id must not be empty".to_string()));
    }

    let mut declared: HashSet<&str> = HashSet::with_capacity(def.states.len());
    for state in &def.states {
        if state.id.trim().is_empty() {
            return Err(DefinitionError::Invalid("state id must not be empty".to_string()));
        }
        if !declared.insert(state.id.as_str()) {
            return Err(DefinitionError::Invalid(format!(
                "duplicate state id '{}'",
                state.id
            )));
        }
    }

    for action in &def.actions {
        if action.id.trim().is_empty() {
            return Err(DefinitionError::Invalid("action id must not be empty".to_string()));
        }
        if !def.has_state(&action.to_state) {
            return Err(DefinitionError::Invalid(format!(
                "action '{}' targets unknown state '{}'",
                action.id, action.to_state
            )));
        }
        if let Some(unknown) = action
            .from_states
            .iter()
            .find(|s| !def.has_state(s))
        {
            return Err(DefinitionError::Invalid(format!(
                "action '{}' fires from unknown state '{}'",
                action.id, unknown
            )));
        }
    }

    Ok(())
}
