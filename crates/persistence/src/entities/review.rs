//! Review entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{BaseModel, Review};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the reviews table.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewEntity {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub place_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
}

impl From<ReviewEntity> for Review {
    fn from(entity: ReviewEntity) -> Self {
        Self {
            base: BaseModel {
                id: entity.id,
                created_at: entity.created_at,
                updated_at: entity.updated_at,
            },
            place_id: entity.place_id,
            user_id: entity.user_id,
            text: entity.text,
        }
    }
}
