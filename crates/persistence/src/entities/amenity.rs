//! Amenity entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Amenity, BaseModel};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the amenities table.
#[derive(Debug, Clone, FromRow)]
pub struct AmenityEntity {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
}

impl From<AmenityEntity> for Amenity {
    fn from(entity: AmenityEntity) -> Self {
        Self {
            base: BaseModel {
                id: entity.id,
                created_at: entity.created_at,
                updated_at: entity.updated_at,
            },
            name: entity.name,
        }
    }
}
