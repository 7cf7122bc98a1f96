//! Workflow definition handlers.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};

use flowstate_types::workflow::WorkflowDefinition;

use crate::http::error::AppError;
use crate::http::response::DefinitionAdded;
use crate::state::AppState;

/// POST /defs - Register a new workflow definition.
pub async fn create_definition(
    State(state): State<AppState>,
    payload: Result<Json<WorkflowDefinition>, JsonRejection>,
) -> Result<Json<DefinitionAdded>, AppError> {
    let Json(def) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let id = state.engine.create_definition(def)?;
    Ok(Json(DefinitionAdded::new(id)))
}

/// GET /defs - List definitions in registration order.
pub async fn list_definitions(State(state): State<AppState>) -> Json<Vec<WorkflowDefinition>> {
    let defs = state
        .engine
        .list_definitions()
        .iter()
        .map(|d| d.as_ref().clone())
        .collect();
    Json(defs)
}

/// GET /defs/{id} - Get one definition.
pub async fn get_definition(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<WorkflowDefinition>, AppError> {
    let not_found = || AppError::NotFound("Definition not found".to_string());
    let Path(id) = path.map_err(|_| not_found())?;
    let def = state
        .engine
        .get_definition(&id)
        .ok_or_else(not_found)?;
    Ok(Json(def.as_ref().clone()))
}
