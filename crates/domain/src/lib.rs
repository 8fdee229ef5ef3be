//! Domain layer for the rental listing backend.
//!
//! This crate contains:
//! - The six listing entities (State, City, User, Place, Review, Amenity)
//! - Entity type tags and composite storage keys
//! - Request payloads with their validation rules

pub mod models;
