//! Place endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{City, CreatePlaceRequest, Place, PlacesSearchRequest, UpdatePlaceRequest, User};
use persistence::relations;
use tracing::info;

use super::{destroy, fetch, required, save, to_json, to_json_list, CreatedResult, JsonListResult, JsonResult};
use crate::app::AppState;
use crate::extractors::JsonBody;

/// GET /api/v1/cities/:city_id/places
pub async fn list_places_of_city(
    State(state): State<AppState>,
    Path(city_id): Path<String>,
) -> JsonListResult {
    let city: City = fetch(state.storage.as_ref(), &city_id).await?;
    let places = relations::places_of_city(state.storage.as_ref(), city.base.id).await?;
    Ok(to_json_list(places))
}

/// GET /api/v1/places/:place_id
pub async fn get_place(State(state): State<AppState>, Path(place_id): Path<String>) -> JsonResult {
    let place: Place = fetch(state.storage.as_ref(), &place_id).await?;
    Ok(Json(to_json(place)))
}

/// DELETE /api/v1/places/:place_id
pub async fn delete_place(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> JsonResult {
    destroy::<Place>(state.storage.as_ref(), &place_id).await
}

/// POST /api/v1/cities/:city_id/places
///
/// The city and the hosting user must both exist.
pub async fn create_place(
    State(state): State<AppState>,
    Path(city_id): Path<String>,
    JsonBody(request): JsonBody<CreatePlaceRequest>,
) -> CreatedResult {
    let storage = state.storage.as_ref();
    let name = required(request.name.clone(), "name")?;
    let user_id = required(request.user_id, "user_id")?;

    let city: City = fetch(storage, &city_id).await?;
    let user: User = fetch(storage, &user_id.to_string()).await?;

    let place = request.into_place(city.base.id, user.base.id, name);
    let place_id = place.base.id;
    let body = save(storage, place).await?;

    info!(place_id = %place_id, city_id = %city.base.id, "Place created");
    Ok((StatusCode::CREATED, Json(body)))
}

/// PUT /api/v1/places/:place_id
///
/// A new `city_id` must name an existing city. `user_id` is ignored.
pub async fn update_place(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
    JsonBody(request): JsonBody<UpdatePlaceRequest>,
) -> JsonResult {
    let storage = state.storage.as_ref();
    let mut place: Place = fetch(storage, &place_id).await?;
    if let Some(city_id) = request.city_id {
        fetch::<City>(storage, &city_id.to_string()).await?;
    }
    request.apply(&mut place);
    Ok(Json(save(storage, place).await?))
}

/// POST /api/v1/places_search
pub async fn search_places(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<PlacesSearchRequest>,
) -> JsonListResult {
    let places = relations::search_places(state.storage.as_ref(), &request).await?;
    Ok(to_json_list(places))
}
