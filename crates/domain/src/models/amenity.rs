//! Amenity domain model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::base::BaseModel;

/// A feature a place can offer, such as "Wifi".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    #[serde(flatten)]
    pub base: BaseModel,
    pub name: String,
}

impl Amenity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseModel::new(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAmenityRequest {
    #[validate(
        required(message = "Missing name"),
        length(min = 1, max = 128, message = "Name must be between 1 and 128 characters")
    )]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAmenityRequest {
    #[validate(length(min = 1, max = 128, message = "Name must be between 1 and 128 characters"))]
    pub name: Option<String>,
}

impl UpdateAmenityRequest {
    pub fn apply(self, amenity: &mut Amenity) {
        if let Some(name) = self.name {
            amenity.name = name;
        }
    }
}
