//! Place domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::base::BaseModel;

/// A rental listing.
///
/// `amenity_ids` mirrors the place/amenity link table: each amenity appears
/// at most once, and the list is kept sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(flatten)]
    pub base: BaseModel,
    pub city_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub number_rooms: i32,
    #[serde(default)]
    pub number_bathrooms: i32,
    #[serde(default)]
    pub max_guest: i32,
    #[serde(default)]
    pub price_by_night: i32,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub amenity_ids: Vec<Uuid>,
}

impl Place {
    pub fn new(city_id: Uuid, user_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            base: BaseModel::new(),
            city_id,
            user_id,
            name: name.into(),
            description: None,
            number_rooms: 0,
            number_bathrooms: 0,
            max_guest: 0,
            price_by_night: 0,
            latitude: None,
            longitude: None,
            amenity_ids: Vec::new(),
        }
    }

    /// Links an amenity. Returns `false` when it was already linked.
    pub fn link_amenity(&mut self, amenity_id: Uuid) -> bool {
        match self.amenity_ids.binary_search(&amenity_id) {
            Ok(_) => false,
            Err(at) => {
                self.amenity_ids.insert(at, amenity_id);
                true
            }
        }
    }

    /// Unlinks an amenity. Returns `false` when it was not linked.
    pub fn unlink_amenity(&mut self, amenity_id: Uuid) -> bool {
        let before = self.amenity_ids.len();
        self.amenity_ids.retain(|id| *id != amenity_id);
        self.amenity_ids.len() != before
    }

    pub fn has_amenity(&self, amenity_id: Uuid) -> bool {
        self.amenity_ids.contains(&amenity_id)
    }
}

/// Request payload for creating a place. The city comes from the path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlaceRequest {
    #[validate(required(message = "Missing user_id"))]
    pub user_id: Option<Uuid>,

    #[validate(
        required(message = "Missing name"),
        length(min = 1, max = 128, message = "Name must be between 1 and 128 characters")
    )]
    pub name: Option<String>,

    #[validate(length(max = 1024, message = "Description must be at most 1024 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "Value must be non-negative"))]
    pub number_rooms: Option<i32>,

    #[validate(range(min = 0, message = "Value must be non-negative"))]
    pub number_bathrooms: Option<i32>,

    #[validate(range(min = 0, message = "Value must be non-negative"))]
    pub max_guest: Option<i32>,

    #[validate(range(min = 0, message = "Value must be non-negative"))]
    pub price_by_night: Option<i32>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
}

impl CreatePlaceRequest {
    /// Builds the place once the caller has resolved city and user.
    pub fn into_place(self, city_id: Uuid, user_id: Uuid, name: String) -> Place {
        let mut place = Place::new(city_id, user_id, name);
        place.description = self.description;
        place.number_rooms = self.number_rooms.unwrap_or_default();
        place.number_bathrooms = self.number_bathrooms.unwrap_or_default();
        place.max_guest = self.max_guest.unwrap_or_default();
        place.price_by_night = self.price_by_night.unwrap_or_default();
        place.latitude = self.latitude;
        place.longitude = self.longitude;
        place
    }
}

/// Request payload for updating a place. The hosting user is fixed; moving
/// the place to another city is allowed once the caller has checked that
/// city exists.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePlaceRequest {
    pub city_id: Option<Uuid>,

    #[validate(length(min = 1, max = 128, message = "Name must be between 1 and 128 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 1024, message = "Description must be at most 1024 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "Value must be non-negative"))]
    pub number_rooms: Option<i32>,

    #[validate(range(min = 0, message = "Value must be non-negative"))]
    pub number_bathrooms: Option<i32>,

    #[validate(range(min = 0, message = "Value must be non-negative"))]
    pub max_guest: Option<i32>,

    #[validate(range(min = 0, message = "Value must be non-negative"))]
    pub price_by_night: Option<i32>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
}

impl UpdatePlaceRequest {
    pub fn apply(self, place: &mut Place) {
        if let Some(city_id) = self.city_id {
            place.city_id = city_id;
        }
        if let Some(name) = self.name {
            place.name = name;
        }
        if let Some(description) = self.description {
            place.description = Some(description);
        }
        if let Some(rooms) = self.number_rooms {
            place.number_rooms = rooms;
        }
        if let Some(bathrooms) = self.number_bathrooms {
            place.number_bathrooms = bathrooms;
        }
        if let Some(guests) = self.max_guest {
            place.max_guest = guests;
        }
        if let Some(price) = self.price_by_night {
            place.price_by_night = price;
        }
        if let Some(latitude) = self.latitude {
            place.latitude = Some(latitude);
        }
        if let Some(longitude) = self.longitude {
            place.longitude = Some(longitude);
        }
    }
}

/// Filters for `POST /places_search`. Every list is optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PlacesSearchRequest {
    #[serde(default)]
    pub states: Vec<Uuid>,
    #[serde(default)]
    pub cities: Vec<Uuid>,
    #[serde(default)]
    pub amenities: Vec<Uuid>,
}

impl PlacesSearchRequest {
    /// True when neither states nor cities narrow the search.
    pub fn is_unscoped(&self) -> bool {
        self.states.is_empty() && self.cities.is_empty()
    }

    /// Whether `place` is linked to every requested amenity.
    pub fn matches_amenities(&self, place: &Place) -> bool {
        self.amenities.iter().all(|id| place.has_amenity(*id))
    }
}
