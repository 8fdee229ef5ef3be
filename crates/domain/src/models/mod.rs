//! Domain models.

pub mod amenity;
pub mod base;
pub mod city;
pub mod entity;
pub mod kind;
pub mod place;
pub mod review;
pub mod state;
pub mod user;

pub use amenity::{Amenity, CreateAmenityRequest, UpdateAmenityRequest};
pub use base::BaseModel;
pub use city::{City, CreateCityRequest, UpdateCityRequest};
pub use entity::{Entity, Model};
pub use kind::{split_key, EntityKind, UnknownEntityKind, KEY_SEPARATOR};
pub use place::{CreatePlaceRequest, Place, PlacesSearchRequest, UpdatePlaceRequest};
pub use review::{CreateReviewRequest, Review, UpdateReviewRequest};
pub use state::{CreateStateRequest, State, UpdateStateRequest};
pub use user::{CreateUserRequest, UpdateUserRequest, User};
