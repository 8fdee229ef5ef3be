//! City domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::base::BaseModel;

/// A city inside a state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(flatten)]
    pub base: BaseModel,
    pub state_id: Uuid,
    pub name: String,
}

impl City {
    pub fn new(state_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            base: BaseModel::new(),
            state_id,
            name: name.into(),
        }
    }
}

/// Request payload for creating a city. The state comes from the path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCityRequest {
    #[validate(
        required(message = "Missing name"),
        length(min = 1, max = 128, message = "Name must be between 1 and 128 characters")
    )]
    pub name: Option<String>,
}

/// Request payload for updating a city. `state_id` cannot be changed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCityRequest {
    #[validate(length(min = 1, max = 128, message = "Name must be between 1 and 128 characters"))]
    pub name: Option<String>,
}

impl UpdateCityRequest {
    pub fn apply(self, city: &mut City) {
        if let Some(name) = self.name {
            city.name = name;
        }
    }
}
