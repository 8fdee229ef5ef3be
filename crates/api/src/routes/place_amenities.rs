//! Links between places and amenities.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{Amenity, Place};
use persistence::relations;
use serde_json::json;

use super::{fetch, save, to_json, to_json_list, CreatedResult, JsonListResult, JsonResult};
use crate::app::AppState;
use crate::error::ApiError;

/// GET /api/v1/places/:place_id/amenities
pub async fn list_amenities_of_place(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> JsonListResult {
    let place: Place = fetch(state.storage.as_ref(), &place_id).await?;
    let amenities = relations::amenities_of_place(state.storage.as_ref(), &place).await?;
    Ok(to_json_list(amenities))
}

/// POST /api/v1/places/:place_id/amenities/:amenity_id
///
/// 201 when the link is created, 200 when it already existed.
pub async fn link_amenity(
    State(state): State<AppState>,
    Path((place_id, amenity_id)): Path<(String, String)>,
) -> CreatedResult {
    let storage = state.storage.as_ref();
    let mut place: Place = fetch(storage, &place_id).await?;
    let amenity: Amenity = fetch(storage, &amenity_id).await?;

    if !place.link_amenity(amenity.base.id) {
        return Ok((StatusCode::OK, Json(to_json(amenity))));
    }

    save(storage, place).await?;
    Ok((StatusCode::CREATED, Json(to_json(amenity))))
}

/// DELETE /api/v1/places/:place_id/amenities/:amenity_id
///
/// 404 when the amenity is not linked to the place.
pub async fn unlink_amenity(
    State(state): State<AppState>,
    Path((place_id, amenity_id)): Path<(String, String)>,
) -> JsonResult {
    let storage = state.storage.as_ref();
    let mut place: Place = fetch(storage, &place_id).await?;
    let amenity: Amenity = fetch(storage, &amenity_id).await?;

    if !place.unlink_amenity(amenity.base.id) {
        return Err(ApiError::not_found());
    }

    save(storage, place).await?;
    Ok(Json(json!({})))
}
