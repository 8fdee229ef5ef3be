//! Review endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{CreateReviewRequest, Place, Review, UpdateReviewRequest, User};
use persistence::relations;

use super::{destroy, fetch, required, save, to_json, to_json_list, CreatedResult, JsonListResult, JsonResult};
use crate::app::AppState;
use crate::extractors::JsonBody;

/// GET /api/v1/places/:place_id/reviews
pub async fn list_reviews_of_place(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> JsonListResult {
    let place: Place = fetch(state.storage.as_ref(), &place_id).await?;
    let reviews = relations::reviews_of_place(state.storage.as_ref(), place.base.id).await?;
    Ok(to_json_list(reviews))
}

/// GET /api/v1/reviews/:review_id
pub async fn get_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> JsonResult {
    let review: Review = fetch(state.storage.as_ref(), &review_id).await?;
    Ok(Json(to_json(review)))
}

/// DELETE /api/v1/reviews/:review_id
pub async fn delete_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> JsonResult {
    destroy::<Review>(state.storage.as_ref(), &review_id).await
}

/// POST /api/v1/places/:place_id/reviews
///
/// Both the place and the reviewing user must exist.
pub async fn create_review(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
    JsonBody(request): JsonBody<CreateReviewRequest>,
) -> CreatedResult {
    let storage = state.storage.as_ref();
    let user_id = required(request.user_id, "user_id")?;
    let text = required(request.text, "text")?;

    let place: Place = fetch(storage, &place_id).await?;
    let user: User = fetch(storage, &user_id.to_string()).await?;

    let review = Review::new(place.base.id, user.base.id, text);
    let body = save(storage, review).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// PUT /api/v1/reviews/:review_id
pub async fn update_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    JsonBody(request): JsonBody<UpdateReviewRequest>,
) -> JsonResult {
    let mut review: Review = fetch(state.storage.as_ref(), &review_id).await?;
    request.apply(&mut review);
    Ok(Json(save(state.storage.as_ref(), review).await?))
}
