//! HTTP route handlers.
//!
//! Path ids are taken as plain strings: an id that is not a UUID simply
//! matches nothing and yields 404, like any other unknown id.

pub mod amenities;
pub mod cities;
pub mod index;
pub mod place_amenities;
pub mod places;
pub mod reviews;
pub mod states;
pub mod users;

use axum::{http::StatusCode, Json};
use domain::models::{Entity, EntityKind, Model};
use persistence::relations::sort_entities;
use persistence::Storage;
use serde_json::{json, Value};

use crate::error::ApiError;

pub type JsonResult = Result<Json<Value>, ApiError>;
pub type JsonListResult = Result<Json<Vec<Value>>, ApiError>;
pub type CreatedResult = Result<(StatusCode, Json<Value>), ApiError>;

/// Loads a model by id or fails with 404.
pub(crate) async fn fetch<M: Model>(storage: &dyn Storage, id: &str) -> Result<M, ApiError> {
    storage
        .get(M::KIND, id)
        .await?
        .and_then(|entity| M::try_from(entity).ok())
        .ok_or_else(ApiError::not_found)
}

/// Every entity of `kind`, oldest first.
pub(crate) async fn list_all(storage: &dyn Storage, kind: EntityKind) -> JsonListResult {
    let mut entities: Vec<Entity> = storage.all(Some(kind)).await?.into_values().collect();
    sort_entities(&mut entities);
    Ok(Json(entities.iter().map(Entity::to_public_json).collect()))
}

pub(crate) fn to_json<M: Model>(model: M) -> Value {
    let entity: Entity = model.into();
    entity.to_public_json()
}

pub(crate) fn to_json_list<M: Model>(models: Vec<M>) -> Json<Vec<Value>> {
    Json(models.into_iter().map(to_json).collect())
}

/// Touches, stores and commits `model`, returning its public form.
pub(crate) async fn save<M: Model>(storage: &dyn Storage, model: M) -> Result<Value, ApiError> {
    let stored = storage.persist(model.into()).await?;
    Ok(stored.to_public_json())
}

/// Deletes the model with `id` (and whatever it owns) and commits.
pub(crate) async fn destroy<M: Model>(storage: &dyn Storage, id: &str) -> JsonResult {
    let entity: Entity = fetch::<M>(storage, id).await?.into();
    storage.remove(&entity).await?;
    Ok(Json(json!({})))
}

/// Unwraps a field the validator already checked for presence.
pub(crate) fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::Validation(format!("Missing {}", field)))
}

pub async fn fallback() -> ApiError {
    ApiError::not_found()
}
