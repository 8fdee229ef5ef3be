//! User endpoint handlers. Password digests never leave the service.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{CreateUserRequest, EntityKind, UpdateUserRequest, User};
use tracing::info;

use super::{destroy, fetch, list_all, required, save, to_json, CreatedResult, JsonListResult, JsonResult};
use crate::app::AppState;
use crate::extractors::JsonBody;

pub async fn list_users(State(state): State<AppState>) -> JsonListResult {
    list_all(state.storage.as_ref(), EntityKind::User).await
}

pub async fn get_user(State(state): State<AppState>, Path(user_id): Path<String>) -> JsonResult {
    let user: User = fetch(state.storage.as_ref(), &user_id).await?;
    Ok(Json(to_json(user)))
}

/// Removes the user with their places and reviews.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> JsonResult {
    destroy::<User>(state.storage.as_ref(), &user_id).await
}

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> CreatedResult {
    let email = required(request.email, "email")?;
    let password = required(request.password, "password")?;

    let mut user = User::new(email, &password)?;
    user.first_name = request.first_name;
    user.last_name = request.last_name;
    let user_id = user.base.id;

    let body = save(state.storage.as_ref(), user).await?;
    info!(user_id = %user_id, "User created");
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    JsonBody(request): JsonBody<UpdateUserRequest>,
) -> JsonResult {
    let mut user: User = fetch(state.storage.as_ref(), &user_id).await?;
    request.apply(&mut user)?;
    Ok(Json(save(state.storage.as_ref(), user).await?))
}
