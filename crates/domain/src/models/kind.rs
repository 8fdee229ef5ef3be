//! Entity type tags and composite keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between type name and id in a composite key.
pub const KEY_SEPARATOR: char = '.';

/// The closed set of entity types known to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    State,
    City,
    User,
    Place,
    Review,
    Amenity,
}

/// Returned when a type name does not match any [`EntityKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown entity type: {0}")]
pub struct UnknownEntityKind(pub String);

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::State,
        EntityKind::City,
        EntityKind::User,
        EntityKind::Place,
        EntityKind::Review,
        EntityKind::Amenity,
    ];

    /// Type name used in composite keys and the `__class__` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::State => "State",
            EntityKind::City => "City",
            EntityKind::User => "User",
            EntityKind::Place => "Place",
            EntityKind::Review => "Review",
            EntityKind::Amenity => "Amenity",
        }
    }

    /// Relational table holding this kind.
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::State => "states",
            EntityKind::City => "cities",
            EntityKind::User => "users",
            EntityKind::Place => "places",
            EntityKind::Review => "reviews",
            EntityKind::Amenity => "amenities",
        }
    }

    /// Plural name used by the stats endpoint.
    pub fn plural(&self) -> &'static str {
        self.table()
    }

    /// Write order: a kind only references kinds with a lower rank.
    pub fn rank(&self) -> u8 {
        match self {
            EntityKind::State | EntityKind::User | EntityKind::Amenity => 0,
            EntityKind::City => 1,
            EntityKind::Place => 2,
            EntityKind::Review => 3,
        }
    }

    /// Builds the composite key `"<TypeName>.<id>"`.
    pub fn key(&self, id: impl fmt::Display) -> String {
        format!("{}{}{}", self.as_str(), KEY_SEPARATOR, id)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEntityKind(s.to_string()))
    }
}

/// Splits a composite key into its kind and id parts.
pub fn split_key(key: &str) -> Option<(EntityKind, &str)> {
    let (name, id) = key.split_once(KEY_SEPARATOR)?;
    let kind = name.parse().ok()?;
    Some((kind, id))
}
