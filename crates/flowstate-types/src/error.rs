use thiserror::Error;

/// Errors from registering a workflow definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("definition '{0}' already exists")]
    AlreadyExists(String),

    #[error("invalid definition: {0}")]
    Invalid(String),
}

/// Errors from creating a workflow instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    #[error("definition '{0}' not found")]
    DefinitionNotFound(String),

    #[error("definition '{0}' has no initial state")]
    NoInitialState(String),
}

/// Rejections produced by the pure transition logic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("action '{0}' not found")]
    ActionNotFound(String),

    #[error("action '{action}' is not allowed from state '{state}'")]
    ActionNotAllowedFromState { action: String, state: String },
}

/// Errors from applying an action to a running instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("instance '{0}' not found")]
    InstanceNotFound(String),

    #[error("action '{0}' not found")]
    ActionNotFound(String),

    #[error("action '{action}' is not allowed from state '{state}'")]
    ActionNotAllowedFromState { action: String, state: String },

    /// A broken engine invariant (e.g. an instance whose definition is gone).
    #[error("internal consistency fault: {0}")]
    Internal(String),
}

impl From<TransitionError> for ActionError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::ActionNotFound(action) => ActionError::ActionNotFound(action),
            TransitionError::ActionNotAllowedFromState { action, state } => {
                ActionError::ActionNotAllowedFromState { action, state }
            }
        }
    }
}
