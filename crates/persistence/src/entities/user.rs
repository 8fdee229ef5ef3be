//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{BaseModel, User};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the users table. `password` is the digest.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            base: BaseModel {
                id: entity.id,
                created_at: entity.created_at,
                updated_at: entity.updated_at,
            },
            email: entity.email,
            password: entity.password,
            first_name: entity.first_name,
            last_name: entity.last_name,
        }
    }
}
