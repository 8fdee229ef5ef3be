//! The closed set of storable entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::base::BaseModel;
use super::kind::EntityKind;
use super::{Amenity, City, Place, Review, State, User};

/// Any storable entity.
///
/// Serializes as a flat attribute map tagged with `"__class__"`, which is
/// also the on-disk record format of the file backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__class__")]
pub enum Entity {
    State(State),
    City(City),
    User(User),
    Place(Place),
    Review(Review),
    Amenity(Amenity),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::State(_) => EntityKind::State,
            Entity::City(_) => EntityKind::City,
            Entity::User(_) => EntityKind::User,
            Entity::Place(_) => EntityKind::Place,
            Entity::Review(_) => EntityKind::Review,
            Entity::Amenity(_) => EntityKind::Amenity,
        }
    }

    pub fn base(&self) -> &BaseModel {
        match self {
            Entity::State(e) => &e.base,
            Entity::City(e) => &e.base,
            Entity::User(e) => &e.base,
            Entity::Place(e) => &e.base,
            Entity::Review(e) => &e.base,
            Entity::Amenity(e) => &e.base,
        }
    }

    fn base_mut(&mut self) -> &mut BaseModel {
        match self {
            Entity::State(e) => &mut e.base,
            Entity::City(e) => &mut e.base,
            Entity::User(e) => &mut e.base,
            Entity::Place(e) => &mut e.base,
            Entity::Review(e) => &mut e.base,
            Entity::Amenity(e) => &mut e.base,
        }
    }

    pub fn id(&self) -> Uuid {
        self.base().id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.base().created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.base().updated_at
    }

    /// Composite storage key, `"<TypeName>.<id>"`.
    pub fn key(&self) -> String {
        self.kind().key(self.id())
    }

    /// Refreshes `updated_at` ahead of a persisted mutation.
    pub fn touch(&mut self) {
        self.base_mut().touch();
    }

    /// Attribute map for API responses. Password digests are never exposed.
    pub fn to_public_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        if let Some(map) = value.as_object_mut() {
            map.remove("password");
        }
        value
    }

    pub fn as_state(&self) -> Option<&State> {
        match self {
            Entity::State(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_city(&self) -> Option<&City> {
        match self {
            Entity::City(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_user(&self) -> Option<&User> {
        match self {
            Entity::User(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_place(&self) -> Option<&Place> {
        match self {
            Entity::Place(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_review(&self) -> Option<&Review> {
        match self {
            Entity::Review(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_amenity(&self) -> Option<&Amenity> {
        match self {
            Entity::Amenity(e) => Some(e),
            _ => None,
        }
    }

    /// Whether `self` directly references `owner` through a foreign key.
    ///
    /// Used to compute delete cascades without a relational engine.
    pub fn is_owned_by(&self, owner: &Entity) -> bool {
        let owner_id = owner.id();
        match (self, owner) {
            (Entity::City(city), Entity::State(_)) => city.state_id == owner_id,
            (Entity::Place(place), Entity::City(_)) => place.city_id == owner_id,
            (Entity::Place(place), Entity::User(_)) => place.user_id == owner_id,
            (Entity::Review(review), Entity::Place(_)) => review.place_id == owner_id,
            (Entity::Review(review), Entity::User(_)) => review.user_id == owner_id,
            _ => false,
        }
    }
}

/// A concrete model that can be stored as an [`Entity`].
pub trait Model: Into<Entity> + TryFrom<Entity, Error = Entity> + Send + 'static {
    const KIND: EntityKind;
}

macro_rules! impl_model {
    ($($model:ident),*) => {
        $(
            impl From<$model> for Entity {
                fn from(model: $model) -> Self {
                    Entity::$model(model)
                }
            }

            impl TryFrom<Entity> for $model {
                type Error = Entity;

                fn try_from(entity: Entity) -> Result<Self, Entity> {
                    match entity {
                        Entity::$model(model) => Ok(model),
                        other => Err(other),
                    }
                }
            }

            impl Model for $model {
                const KIND: EntityKind = EntityKind::$model;
            }
        )*
    };
}

impl_model!(State, City, User, Place, Review, Amenity);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_record_is_tagged_and_flat() {
        let state = State::new("California");
        let id = state.base.id;
        let value = serde_json::to_value(Entity::from(state)).unwrap();
        assert_eq!(value["__class__"], "State");
        assert_eq!(value["name"], "California");
        assert_eq!(value["id"], id.to_string());
        assert!(value.get("base").is_none());
    }

    #[test]
    fn test_record_round_trip() {
        let mut place = Place::new(Uuid::new_v4(), Uuid::new_v4(), "Loft");
        place.latitude = Some(37.7749);
        place.link_amenity(Uuid::new_v4());
        let entity = Entity::from(place);

        let text = serde_json::to_string(&entity).unwrap();
        let back: Entity = serde_json::from_str(&text).unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn test_key_and_kind() {
        let city = City::new(Uuid::new_v4(), "San Francisco");
        let id = city.base.id;
        let entity = Entity::from(city);
        assert_eq!(entity.kind(), EntityKind::City);
        assert_eq!(entity.key(), format!("City.{}", id));
    }

    #[test]
    fn test_public_json_hides_password() {
        let user = User::new("guest@example.com", "secret").unwrap();
        let value = Entity::from(user).to_public_json();
        assert!(value.get("password").is_none());
        assert_eq!(value["email"], "guest@example.com");
        assert_eq!(value["__class__"], "User");
    }

    #[test]
    fn test_ownership() {
        let state = Entity::from(State::new("CA"));
        let city = Entity::from(City::new(state.id(), "SF"));
        let other_city = Entity::from(City::new(Uuid::new_v4(), "LA"));
        let user = Entity::from(User::new("h@example.com", "pw").unwrap());
        let place = Entity::from(Place::new(city.id(), user.id(), "Loft"));

        assert!(city.is_owned_by(&state));
        assert!(!other_city.is_owned_by(&state));
        assert!(place.is_owned_by(&city));
        assert!(place.is_owned_by(&user));
        assert!(!state.is_owned_by(&city));
    }

    #[test]
    fn test_touch_updates_timestamp_only() {
        let mut entity = Entity::from(Amenity::new("Wifi"));
        let id = entity.id();
        let created = entity.created_at();
        std::thread::sleep(std::time::Duration::from_millis(2));
        entity.touch();
        assert_eq!(entity.id(), id);
        assert_eq!(entity.created_at(), created);
        assert!(entity.updated_at() > created);
    }

    #[test]
    fn test_model_conversion() {
        assert_eq!(<Review as Model>::KIND, EntityKind::Review);

        let amenity = Amenity::new("Sauna");
        let entity = Entity::from(amenity.clone());
        assert_eq!(Amenity::try_from(entity.clone()), Ok(amenity));
        assert_eq!(State::try_from(entity.clone()), Err(entity));
    }
}
