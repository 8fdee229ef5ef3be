//! Review domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::base::BaseModel;

/// A user's review of a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(flatten)]
    pub base: BaseModel,
    pub place_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
}

impl Review {
    pub fn new(place_id: Uuid, user_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            base: BaseModel::new(),
            place_id,
            user_id,
            text: text.into(),
        }
    }
}

/// Request payload for creating a review. The place comes from the path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(required(message = "Missing user_id"))]
    pub user_id: Option<Uuid>,

    #[validate(
        required(message = "Missing text"),
        length(min = 1, max = 1024, message = "Text must be between 1 and 1024 characters")
    )]
    pub text: Option<String>,
}

/// Request payload for updating a review. Only the text can change.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(length(min = 1, max = 1024, message = "Text must be between 1 and 1024 characters"))]
    pub text: Option<String>,
}

impl UpdateReviewRequest {
    pub fn apply(self, review: &mut Review) {
        if let Some(text) = self.text {
            review.text = text;
        }
    }
}
