//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod amenity;
pub mod city;
pub mod place;
pub mod review;
pub mod state;
pub mod user;

pub use amenity::AmenityEntity;
pub use city::CityEntity;
pub use place::PlaceEntity;
pub use review::ReviewEntity;
pub use state::StateEntity;
pub use user::UserEntity;
