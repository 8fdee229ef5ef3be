//! State entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{BaseModel, State};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the states table.
#[derive(Debug, Clone, FromRow)]
pub struct StateEntity {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
}

impl From<StateEntity> for State {
    fn from(entity: StateEntity) -> Self {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_entity_to_domain() {
        let entity = StateEntity {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            name: "California".to_string(),
        };
        let state: State = entity.clone().into();
        assert_eq!(state.base.id, entity.id);
        assert_eq!(state.base.created_at, entity.created_at);
        assert_eq!(state.name, "California");
    }
}
