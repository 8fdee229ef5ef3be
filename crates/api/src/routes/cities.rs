//! City endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{City, CreateCityRequest, State as StateModel, UpdateCityRequest};
use persistence::relations;

use super::{destroy, fetch, required, save, to_json, to_json_list, CreatedResult, JsonListResult, JsonResult};
use crate::app::AppState;
use crate::extractors::JsonBody;

/// GET /api/v1/states/:state_id/cities
pub async fn list_cities_of_state(
    State(state): State<AppState>,
    Path(state_id): Path<String>,
) -> JsonListResult {
    let owner: StateModel = fetch(state.storage.as_ref(), &state_id).await?;
    let cities = relations::cities_of_state(state.storage.as_ref(), owner.base.id).await?;
    Ok(to_json_list(cities))
}

/// GET /api/v1/cities/:city_id
pub async fn get_city(State(state): State<AppState>, Path(city_id): Path<String>) -> JsonResult {
    let city: City = fetch(state.storage.as_ref(), &city_id).await?;
    Ok(Json(to_json(city)))
}

/// DELETE /api/v1/cities/:city_id
pub async fn delete_city(
    State(state): State<AppState>,
    Path(city_id): Path<String>,
) -> JsonResult {
    destroy::<City>(state.storage.as_ref(), &city_id).await
}

/// POST /api/v1/states/:state_id/cities
pub async fn create_city(
    State(state): State<AppState>,
    Path(state_id): Path<String>,
    JsonBody(request): JsonBody<CreateCityRequest>,
) -> CreatedResult {
    let owner: StateModel = fetch(state.storage.as_ref(), &state_id).await?;
    let city = City::new(owner.base.id, required(request.name, "name")?);
    let body = save(state.storage.as_ref(), city).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// PUT /api/v1/cities/:city_id
pub async fn update_city(
    State(state): State<AppState>,
    Path(city_id): Path<String>,
    JsonBody(request): JsonBody<UpdateCityRequest>,
) -> JsonResult {
    let mut city: City = fetch(state.storage.as_ref(), &city_id).await?;
    request.apply(&mut city);
    Ok(Json(save(state.storage.as_ref(), city).await?))
}
