//! Workflow domain types for Flowstate.
//!
//! A `WorkflowDefinition` is an immutable template (states plus the actions
//! that move between them). A `WorkflowInstance` is one running execution of
//! a definition with its own current state and append-only history.
//!
//! Field names serialize as camelCase (`isInitial`, `fromStates`, `defId`, ...)
//! to match the public JSON wire format.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a workflow definition. Chosen by the client at registration.
pub type DefinitionId = String;

// ---------------------------------------------------------------------------
// Workflow Definition
// ---------------------------------------------------------------------------

/// An immutable workflow template.
///
/// `states` and `actions` keep their declared order; lookups that can match
/// more than one entry always take the first match in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    pub id: DefinitionId,
    pub states: Vec<State>,
    pub actions: Vec<ActionDef>,
}

impl WorkflowDefinition {
    /// Whether `state_id` names one of this definition's states.
    pub fn has_state(&self, state_id: &str) -> bool {
        self.states.iter().any(|s| s.id == state_id)
    }
}

/// A single state in a workflow definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Unique within the owning definition.
    pub id: String,
    #[serde(default)]
    pub is_initial: bool,
    #[serde(default)]
    pub is_final: bool,
}

/// A named transition rule: fires from any of `from_states`, lands on `to_state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDef {
    pub id: String,
    #[serde(default)]
    pub from_states: Vec<String>,
    pub to_state: String,
}

impl ActionDef {
    /// Whether this action may fire while an instance sits in `state_id`.
    pub fn allowed_from(&self, state_id: &str) -> bool {
        self.from_states.iter().any(|s| s == state_id)
    }
}

// ---------------------------------------------------------------------------
// Workflow Instance
// ---------------------------------------------------------------------------

/// Unique identifier for a workflow instance, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub Uuid);

impl InstanceId {
    /// Create a new InstanceId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InstanceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// One running execution of a workflow definition.
///
/// Only ever mutated through the instance store's atomic `mutate`; every
/// other holder works on a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstance {
    pub id: InstanceId,
    /// The definition this instance runs. Lookup only; not owned.
    pub def_id: DefinitionId,
    pub current_state: String,
    /// Append-only, chronological.
    #[serde(default)]
    pub history: Vec<HistoryItem>,
}

impl WorkflowInstance {
    /// Timestamp of the most recent successful transition, if any.
    pub fn last_transition_at(&self) -> Option<DateTime<Utc>> {
        self.history.last().map(|h| h.timestamp)
    }
}

/// Record of one successfully applied action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub action_id: String,
    pub timestamp: DateTime<Utc>,
}
