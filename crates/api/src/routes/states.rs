//! State endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{CreateStateRequest, EntityKind, State as StateModel, UpdateStateRequest};
use tracing::info;

use super::{destroy, fetch, list_all, required, save, to_json, CreatedResult, JsonListResult, JsonResult};
use crate::app::AppState;
use crate::extractors::JsonBody;

/// GET /api/v1/states
pub async fn list_states(State(state): State<AppState>) -> JsonListResult {
    list_all(state.storage.as_ref(), EntityKind::State).await
}

/// GET /api/v1/states/:state_id
pub async fn get_state(State(state): State<AppState>, Path(state_id): Path<String>) -> JsonResult {
    let model: StateModel = fetch(state.storage.as_ref(), &state_id).await?;
    Ok(Json(to_json(model)))
}

/// DELETE /api/v1/states/:state_id
///
/// Removes the state together with its cities and everything in them.
pub async fn delete_state(
    State(state): State<AppState>,
    Path(state_id): Path<String>,
) -> JsonResult {
    let response = destroy::<StateModel>(state.storage.as_ref(), &state_id).await?;
    info!(state_id = %state_id, "State deleted");
    Ok(response)
}

/// POST /api/v1/states
pub async fn create_state(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateStateRequest>,
) -> CreatedResult {
    let model = StateModel::new(required(request.name, "name")?);
    let state_id = model.base.id;
    let body = save(state.storage.as_ref(), model).await?;
    info!(state_id = %state_id, "State created");
    Ok((StatusCode::CREATED, Json(body)))
}

/// PUT /api/v1/states/:state_id
pub async fn update_state(
    State(state): State<AppState>,
    Path(state_id): Path<String>,
    JsonBody(request): JsonBody<UpdateStateRequest>,
) -> JsonResult {
    let mut model: StateModel = fetch(state.storage.as_ref(), &state_id).await?;
    request.apply(&mut model);
    Ok(Json(save(state.storage.as_ref(), model).await?))
}
