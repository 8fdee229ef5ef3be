//! Behaviour every storage backend must share.
//!
//! Each check takes a freshly reloaded `&dyn Storage` and only ever follows
//! `new`/`delete` with `save`, so it passes against both backends.

#![allow(dead_code)]

use domain::models::{Amenity, City, Entity, EntityKind, Place, Review, State, User};
use fake::faker::address::en::{CityName, StateName};
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use persistence::relations;
use persistence::Storage;

pub fn fake_state() -> State {
    State::new(StateName().fake::<String>())
}

pub fn fake_city(state: &State) -> City {
    City::new(state.base.id, CityName().fake::<String>())
}

pub fn fake_user() -> User {
    User::new(SafeEmail().fake::<String>(), "correct horse").unwrap()
}

/// The California / San Francisco walkthrough: deleting the state leaves no
/// city, no place in that city and no review of that place behind.
pub async fn state_delete_cascades_to_descendants(storage: &dyn Storage) {
    let cities_before = storage.count(Some(EntityKind::City)).await.unwrap();

    let california = storage
        .persist(State::new("California").into())
        .await
        .unwrap();
    let san_francisco = City::new(california.id(), "San Francisco");
    let san_francisco = storage.persist(san_francisco.into()).await.unwrap();
    let host = storage.persist(fake_user().into()).await.unwrap();
    let loft = Place::new(san_francisco.id(), host.id(), "Loft");
    let loft = storage.persist(loft.into()).await.unwrap();
    let review = Review::new(loft.id(), host.id(), "Foggy but lovely");
    let review = storage.persist(review.into()).await.unwrap();

    assert_eq!(
        storage.count(Some(EntityKind::City)).await.unwrap(),
        cities_before + 1
    );
    let cities = relations::cities_of_state(storage, california.id()).await.unwrap();
    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].name, "San Francisco");

    storage.remove(&california).await.unwrap();

    assert_eq!(
        storage.count(Some(EntityKind::City)).await.unwrap(),
        cities_before
    );
    for gone in [&san_francisco, &loft, &review] {
        assert!(
            storage
                .get(gone.kind(), &gone.id().to_string())
                .await
                .unwrap()
                .is_none(),
            "{} survived its state",
            gone.key()
        );
    }
    assert!(storage
        .get(EntityKind::User, &host.id().to_string())
        .await
        .unwrap()
        .is_some());
}

/// Registering a child and then deleting its committed parent in the same
/// unit of work commits cleanly and leaves neither behind.
pub async fn delete_takes_unsaved_children_along(storage: &dyn Storage) {
    let state = storage.persist(fake_state().into()).await.unwrap();
    let Entity::State(parent) = &state else {
        unreachable!()
    };
    let city = Entity::from(fake_city(parent));
    let states_before = storage.count(Some(EntityKind::State)).await.unwrap();
    let cities_before = storage.count(Some(EntityKind::City)).await.unwrap();

    storage.new(city.clone()).await.unwrap();
    storage.delete(Some(&state)).await.unwrap();
    storage.save().await.unwrap();

    assert_eq!(
        storage.count(Some(EntityKind::State)).await.unwrap(),
        states_before - 1
    );
    assert_eq!(
        storage.count(Some(EntityKind::City)).await.unwrap(),
        cities_before
    );
    assert!(storage
        .get(EntityKind::City, &city.id().to_string())
        .await
        .unwrap()
        .is_none());
}

pub async fn new_and_save_is_visible(storage: &dyn Storage) {
    let before = storage.count(Some(EntityKind::State)).await.unwrap();
    let state = Entity::from(fake_state());

    storage.new(state.clone()).await.unwrap();
    storage.save().await.unwrap();

    assert_eq!(storage.count(Some(EntityKind::State)).await.unwrap(), before + 1);
    let loaded = storage
        .get(EntityKind::State, &state.id().to_string())
        .await
        .unwrap();
    assert_eq!(loaded, Some(state));
}

pub async fn delete_and_save_is_gone(storage: &dyn Storage) {
    let amenity = storage.persist(Amenity::new("Wifi").into()).await.unwrap();
    let before = storage.count(Some(EntityKind::Amenity)).await.unwrap();

    storage.delete(Some(&amenity)).await.unwrap();
    storage.save().await.unwrap();

    assert_eq!(storage.count(Some(EntityKind::Amenity)).await.unwrap(), before - 1);
    assert!(storage
        .get_named("Amenity", &amenity.id().to_string())
        .await
        .unwrap()
        .is_none());
}

pub async fn count_agrees_with_all(storage: &dyn Storage) {
    let state = fake_state();
    let city = fake_city(&state);
    for entity in [Entity::from(state), city.into(), fake_user().into()] {
        storage.persist(entity).await.unwrap();
    }

    let mut per_kind = 0;
    for kind in EntityKind::ALL {
        let count = storage.count(Some(kind)).await.unwrap();
        assert_eq!(count, storage.all(Some(kind)).await.unwrap().len(), "{kind}");
        per_kind += count;
    }

    let total = storage.count(None).await.unwrap();
    assert_eq!(total, per_kind);
    assert_eq!(total, storage.all(None).await.unwrap().len());
}

pub async fn unknown_lookups_are_not_found(storage: &dyn Storage) {
    let state = storage.persist(fake_state().into()).await.unwrap();
    let id = state.id().to_string();

    assert!(storage.get_named("Spaceship", &id).await.unwrap().is_none());
    assert!(storage.get(EntityKind::City, &id).await.unwrap().is_none());
    assert!(storage
        .get(EntityKind::State, "nonexistent-id")
        .await
        .unwrap()
        .is_none());
    assert!(storage.all_named("Spaceship").await.unwrap().is_empty());
    assert_eq!(storage.count_named("Spaceship").await.unwrap(), 0);
}

pub async fn delete_none_is_noop(storage: &dyn Storage) {
    let before = storage.count(None).await.unwrap();
    storage.delete(None).await.unwrap();
    storage.save().await.unwrap();
    assert_eq!(storage.count(None).await.unwrap(), before);
}

/// Every attribute survives a trip through the durable medium.
pub async fn round_trip_through_reload(storage: &dyn Storage) {
    let state = fake_state();
    let city = fake_city(&state);
    let host = fake_user();
    let amenity = Amenity::new("Hot tub");
    let extras: Vec<Amenity> = ["Sauna", "Wifi", "Pool"]
        .into_iter()
        .map(Amenity::new)
        .collect();
    let mut place = Place::new(city.base.id, host.base.id, "Hillside loft");
    place.description = Some("Two rooms above the bakery".to_string());
    place.number_rooms = 2;
    place.max_guest = 3;
    place.price_by_night = 120;
    place.latitude = Some(37.7749);
    place.longitude = Some(-122.4194);
    place.link_amenity(amenity.base.id);
    for extra in &extras {
        place.link_amenity(extra.base.id);
    }
    let review = Review::new(place.base.id, host.base.id, "Would stay again");

    let mut entities: Vec<Entity> = vec![
        state.into(),
        city.into(),
        host.into(),
        amenity.into(),
        place.into(),
        review.into(),
    ];
    entities.extend(extras.into_iter().map(Entity::from));
    for entity in &entities {
        storage.new(entity.clone()).await.unwrap();
    }
    storage.save().await.unwrap();

    storage.reload().await.unwrap();

    for entity in &entities {
        let loaded = storage
            .get(entity.kind(), &entity.id().to_string())
            .await
            .unwrap();
        assert_eq!(loaded.as_ref(), Some(entity), "{}", entity.key());
    }

    let user = storage
        .get(EntityKind::User, &entities[2].id().to_string())
        .await
        .unwrap()
        .unwrap();
    assert!(user.as_user().unwrap().check_password("correct horse"));
}

pub async fn reload_close_reload_keeps_committed(storage: &dyn Storage) {
    let state = storage.persist(fake_state().into()).await.unwrap();
    let before = storage.count(None).await.unwrap();

    storage.close().await.unwrap();
    storage.close().await.unwrap();
    storage.reload().await.unwrap();

    assert_eq!(storage.count(None).await.unwrap(), before);
    assert!(storage
        .get(EntityKind::State, &state.id().to_string())
        .await
        .unwrap()
        .is_some());
}

pub async fn update_replaces_in_place(storage: &dyn Storage) {
    let state = storage.persist(State::new("Nevda").into()).await.unwrap();
    let before = storage.count(Some(EntityKind::State)).await.unwrap();

    let Entity::State(mut fixed) = state.clone() else {
        unreachable!()
    };
    fixed.name = "Nevada".to_string();
    let fixed = storage.persist(fixed.into()).await.unwrap();

    assert_eq!(storage.count(Some(EntityKind::State)).await.unwrap(), before);
    let loaded = storage
        .get(EntityKind::State, &state.id().to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.as_state().unwrap().name, "Nevada");
    assert_eq!(loaded.created_at(), state.created_at());
    assert_eq!(loaded.updated_at(), fixed.updated_at());
}

pub async fn amenity_links_follow_deletes(storage: &dyn Storage) {
    let state = fake_state();
    let city = fake_city(&state);
    let host = fake_user();
    let pool = Amenity::new("Pool");
    let mut place = Place::new(city.base.id, host.base.id, "Villa");
    place.link_amenity(pool.base.id);
    let place_id = place.base.id;

    for entity in [
        Entity::from(state),
        city.into(),
        host.into(),
        pool.clone().into(),
        place.into(),
    ] {
        storage.new(entity).await.unwrap();
    }
    storage.save().await.unwrap();

    let stored = storage
        .get(EntityKind::Place, &place_id.to_string())
        .await
        .unwrap()
        .unwrap();
    let amenities = relations::amenities_of_place(storage, stored.as_place().unwrap())
        .await
        .unwrap();
    assert_eq!(amenities, vec![pool.clone()]);

    storage.remove(&Entity::from(pool)).await.unwrap();

    let stored = storage
        .get(EntityKind::Place, &place_id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert!(stored.as_place().unwrap().amenity_ids.is_empty());
}
