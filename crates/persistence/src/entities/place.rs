//! Place entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{BaseModel, Place};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the places table joined with its amenity links.
///
/// `amenity_ids` is aggregated from `place_amenity`.
#[derive(Debug, Clone, FromRow)]
pub struct PlaceEntity {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub city_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub number_rooms: i32,
    pub number_bathrooms: i32,
    pub max_guest: i32,
    pub price_by_night: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub amenity_ids: Vec<Uuid>,
}

impl From<PlaceEntity> for Place {
    fn from(entity: PlaceEntity) -> Self {
        Self {
            base: BaseModel {
                id: entity.id,
                created_at: entity.created_at,
                updated_at: entity.updated_at,
            },
            city_id: entity.city_id,
            user_id: entity.user_id,
            name: entity.name,
            description: entity.description,
            number_rooms: entity.number_rooms,
            number_bathrooms: entity.number_bathrooms,
            max_guest: entity.max_guest,
            price_by_night: entity.price_by_night,
            latitude: entity.latitude,
            longitude: entity.longitude,
            amenity_ids: entity.amenity_ids,
        }
    }
}
