//! Relationship navigation built on [`Storage::all`].
//!
//! Both backends answer these the same way because nothing here touches a
//! backend directly. Results are ordered by `(created_at, id)`.

use std::collections::HashSet;

use domain::models::{Amenity, City, Entity, EntityKind, Place, PlacesSearchRequest, Review};
use uuid::Uuid;

use crate::error::StorageResult;
use crate::storage::Storage;

/// Stable order for entities pulled out of a keyed map.
pub fn sort_entities(entities: &mut [Entity]) {
    entities.sort_by_key(|e| (e.created_at(), e.id()));
}

async fn select<T>(
    storage: &dyn Storage,
    kind: EntityKind,
    pick: impl Fn(Entity) -> Option<T> + Send,
) -> StorageResult<Vec<T>> {
    let mut entities: Vec<Entity> = storage.all(Some(kind)).await?.into_values().collect();
    sort_entities(&mut entities);
    Ok(entities.into_iter().filter_map(pick).collect())
}

pub async fn cities_of_state(storage: &dyn Storage, state_id: Uuid) -> StorageResult<Vec<City>> {
    select(storage, EntityKind::City, |entity| match entity {
        Entity::City(city) if city.state_id == state_id => Some(city),
        _ => None,
    })
    .await
}

pub async fn places_of_city(storage: &dyn Storage, city_id: Uuid) -> StorageResult<Vec<Place>> {
    select(storage, EntityKind::Place, |entity| match entity {
        Entity::Place(place) if place.city_id == city_id => Some(place),
        _ => None,
    })
    .await
}

pub async fn reviews_of_place(storage: &dyn Storage, place_id: Uuid) -> StorageResult<Vec<Review>> {
    select(storage, EntityKind::Review, |entity| match entity {
        Entity::Review(review) if review.place_id == place_id => Some(review),
        _ => None,
    })
    .await
}

/// Amenities linked to `place`. Dangling link ids are skipped.
pub async fn amenities_of_place(storage: &dyn Storage, place: &Place) -> StorageResult<Vec<Amenity>> {
    select(storage, EntityKind::Amenity, |entity| match entity {
        Entity::Amenity(amenity) if place.has_amenity(amenity.base.id) => Some(amenity),
        _ => None,
    })
    .await
}

/// Places matching a search request.
///
/// Without state or city filters every place is a candidate. Otherwise the
/// candidates are the places in the listed cities plus those in any city of
/// the listed states, each place at most once. The amenity filter then keeps
/// places linked to every listed amenity. Unknown ids match nothing.
pub async fn search_places(
    storage: &dyn Storage,
    request: &PlacesSearchRequest,
) -> StorageResult<Vec<Place>> {
    let candidates = if request.is_unscoped() {
        select(storage, EntityKind::Place, |entity| match entity {
            Entity::Place(place) => Some(place),
            _ => None,
        })
        .await?
    } else {
        let states: HashSet<Uuid> = request.states.iter().copied().collect();
        let mut cities: HashSet<Uuid> = request.cities.iter().copied().collect();

        if !states.is_empty() {
            let in_states = select(storage, EntityKind::City, |entity| match entity {
                Entity::City(city) if states.contains(&city.state_id) => Some(city.base.id),
                _ => None,
            })
            .await?;
            cities.extend(in_states);
        }

        select(storage, EntityKind::Place, |entity| match entity {
            Entity::Place(place) if cities.contains(&place.city_id) => Some(place),
            _ => None,
        })
        .await?
    };

    Ok(candidates
        .into_iter()
        .filter(|place| request.matches_amenities(place))
        .collect())
}
