//! Application error type mapping engine errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use flowstate_types::error::{ActionError, DefinitionError, InstanceError};

use crate::http::response::ErrorBody;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Definition registration errors.
    Definition(DefinitionError),
    /// Instance creation errors.
    Instance(InstanceError),
    /// Action application errors.
    Action(ActionError),
    /// A looked-up resource does not exist.
    NotFound(String),
    /// Malformed request (bad JSON, missing query parameter).
    Validation(String),
}

impl From<DefinitionError> for AppError {
    fn from(e: DefinitionError) -> Self {
        AppError::Definition(e)
    }
}

impl From<InstanceError> for AppError {
    fn from(e: InstanceError) -> Self {
        AppError::Instance(e)
    }
}

impl From<ActionError> for AppError {
    fn from(e: ActionError) -> Self {
        AppError::Action(e)
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Definition(DefinitionError::AlreadyExists(_)) => {
                (StatusCode::BAD_REQUEST, "Definition already exists".to_string())
            }
            AppError::Definition(DefinitionError::Invalid(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Instance(InstanceError::DefinitionNotFound(_)) => {
                (StatusCode::BAD_REQUEST, "Definition not found".to_string())
            }
            AppError::Instance(InstanceError::NoInitialState(_)) => {
                (StatusCode::BAD_REQUEST, "Initial state missing".to_string())
            }
            AppError::Action(ActionError::InstanceNotFound(_)) => {
                (StatusCode::NOT_FOUND, "Instance not found".to_string())
            }
            AppError::Action(ActionError::ActionNotFound(_)) => {
                (StatusCode::BAD_REQUEST, "Invalid action".to_string())
            }
            AppError::Action(ActionError::ActionNotAllowedFromState { .. }) => (
                StatusCode::BAD_REQUEST,
                "Action not allowed from current state".to_string(),
            ),
            AppError::Action(ActionError::Internal(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed with internal error");
        } else {
            tracing::debug!(%status, error = ?self, "request rejected");
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
