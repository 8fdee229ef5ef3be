//! City entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{BaseModel, City};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the cities table.
#[derive(Debug, Clone, FromRow)]
pub struct CityEntity {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub state_id: Uuid,
    pub name: String,
}

impl From<CityEntity> for City {
    fn from(entity: CityEntity) -> Self {
        Self {
            base: BaseModel {
                id: entity.id,
                created_at: entity.created_at,
                updated_at: entity.updated_at,
            },
            state_id: entity.state_id,
            name: entity.name,
        }
    }
}
