//! Workflow instance handlers: create, inspect, and drive instances.

use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use flowstate_types::workflow::WorkflowInstance;

use crate::http::error::AppError;
use crate::state::AppState;

/// Query parameters accepted by `/instances`.
#[derive(Debug, Deserialize, Default)]
pub struct InstanceQuery {
    /// Definition to instantiate (POST) or filter by (GET).
    #[serde(rename = "defId")]
    pub def_id: Option<String>,
}

fn instance_not_found(_: PathRejection) -> AppError {
    AppError::NotFound("Instance not found".to_string())
}

/// POST /instances?defId={id} - Start a new instance of a definition.
pub async fn create_instance(
    State(state): State<AppState>,
    query: Result<Query<InstanceQuery>, QueryRejection>,
) -> Result<Json<WorkflowInstance>, AppError> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let def_id = query
        .def_id
        .ok_or_else(|| AppError::Validation("defId query parameter is required".to_string()))?;
    let instance = state.engine.create_instance(&def_id)?;
    Ok(Json(instance))
}

/// GET /instances[?defId={id}] - List instances in creation order.
pub async fn list_instances(
    State(state): State<AppState>,
    query: Result<Query<InstanceQuery>, QueryRejection>,
) -> Result<Json<Vec<WorkflowInstance>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    Ok(Json(state.engine.list_instances(query.def_id.as_deref())))
}

/// GET /instances/{id} - Get one instance.
pub async fn get_instance(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<WorkflowInstance>, AppError> {
    let Path(id) = path.map_err(instance_not_found)?;
    state
        .engine
        .get_instance(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Instance not found".to_string()))
}

/// POST /instances/{id}/actions/{action_id} - Apply an action to an instance.
pub async fn apply_action(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<WorkflowInstance>, AppError> {
    // An undecodable action id is reported as a missing instance too.
    let Path((id, action_id)) = path.map_err(instance_not_found)?;
    let instance = state.engine.apply_action(&id, &action_id)?;
    Ok(Json(instance))
}
