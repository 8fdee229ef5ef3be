//! State domain model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::base::BaseModel;

/// A state or region grouping cities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(flatten)]
    pub base: BaseModel,
    pub name: String,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseModel::new(),
            name: name.into(),
        }
    }
}

/// Request payload for creating a state.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStateRequest {
    #[validate(
        required(message = "Missing name"),
        length(min = 1, max = 128, message = "Name must be between 1 and 128 characters")
    )]
    pub name: Option<String>,
}

/// Request payload for updating a state. Unlisted keys are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateStateRequest {
    #[validate(length(min = 1, max = 128, message = "Name must be between 1 and 128 characters"))]
    pub name: Option<String>,
}

impl UpdateStateRequest {
    pub fn apply(self, state: &mut State) {
        if let Some(name) = self.name {
            state.name = name;
        }
    }
}
