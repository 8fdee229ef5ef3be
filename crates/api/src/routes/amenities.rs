//! Amenity endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{Amenity, CreateAmenityRequest, EntityKind, UpdateAmenityRequest};

use super::{destroy, fetch, list_all, required, save, to_json, CreatedResult, JsonListResult, JsonResult};
use crate::app::AppState;
use crate::extractors::JsonBody;

pub async fn list_amenities(State(state): State<AppState>) -> JsonListResult {
    list_all(state.storage.as_ref(), EntityKind::Amenity).await
}

pub async fn get_amenity(
    State(state): State<AppState>,
    Path(amenity_id): Path<String>,
) -> JsonResult {
    let amenity: Amenity = fetch(state.storage.as_ref(), &amenity_id).await?;
    Ok(Json(to_json(amenity)))
}

/// Deleting an amenity also unlinks it from every place.
pub async fn delete_amenity(
    State(state): State<AppState>,
    Path(amenity_id): Path<String>,
) -> JsonResult {
    destroy::<Amenity>(state.storage.as_ref(), &amenity_id).await
}

pub async fn create_amenity(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateAmenityRequest>,
) -> CreatedResult {
    let amenity = Amenity::new(required(request.name, "name")?);
    let body = save(state.storage.as_ref(), amenity).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn update_amenity(
    State(state): State<AppState>,
    Path(amenity_id): Path<String>,
    JsonBody(request): JsonBody<UpdateAmenityRequest>,
) -> JsonResult {
    let mut amenity: Amenity = fetch(state.storage.as_ref(), &amenity_id).await?;
    request.apply(&mut amenity);
    Ok(Json(save(state.storage.as_ref(), amenity).await?))
}
