//! Storage behaviour tests against PostgreSQL.
//!
//! Skipped unless `TEST_DATABASE_URL` points at a disposable database. Every
//! test starts from an empty schema, so they run one at a time.

mod common;

use domain::models::{EntityKind, State};
use lazy_static::lazy_static;
use persistence::{DatabaseConfig, DbStorage, Storage};
use tokio::sync::Mutex;

lazy_static! {
    static ref DB_LOCK: Mutex<()> = Mutex::new(());
}

fn test_config() -> Option<DatabaseConfig> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    Some(DatabaseConfig {
        url: Some(url),
        max_connections: 2,
        ..Default::default()
    })
}

/// Drops and recreates the schema, then hands back a storage that keeps
/// data across its own reloads.
async fn fresh_storage(config: DatabaseConfig) -> DbStorage {
    let reset = DbStorage::with_config(config.clone(), true);
    reset.reload().await.unwrap();
    reset.close().await.unwrap();

    let storage = DbStorage::with_config(config, false);
    storage.reload().await.unwrap();
    storage
}

macro_rules! db_test {
    ($name:ident, $check:path) => {
        #[tokio::test]
        async fn $name() {
            let Some(config) = test_config() else {
                eprintln!("TEST_DATABASE_URL not set, skipping");
                return;
            };
            let _guard = DB_LOCK.lock().await;
            let storage = fresh_storage(config).await;
            $check(&storage).await;
            storage.close().await.unwrap();
        }
    };
}

db_test!(test_state_delete_cascades_to_descendants, common::state_delete_cascades_to_descendants);
db_test!(test_new_and_save_is_visible, common::new_and_save_is_visible);
db_test!(test_delete_and_save_is_gone, common::delete_and_save_is_gone);
db_test!(test_count_agrees_with_all, common::count_agrees_with_all);
db_test!(test_unknown_lookups_are_not_found, common::unknown_lookups_are_not_found);
db_test!(test_delete_none_is_noop, common::delete_none_is_noop);
db_test!(test_round_trip_through_reload, common::round_trip_through_reload);
db_test!(test_reload_close_reload_keeps_committed, common::reload_close_reload_keeps_committed);
db_test!(test_update_replaces_in_place, common::update_replaces_in_place);
db_test!(test_amenity_links_follow_deletes, common::amenity_links_follow_deletes);
db_test!(
    test_delete_takes_unsaved_children_along,
    common::delete_takes_unsaved_children_along
);

/// Relational variant: registrations stay invisible until `save`.
#[tokio::test]
async fn test_new_invisible_until_save() {
    let Some(config) = test_config() else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let _guard = DB_LOCK.lock().await;
    let storage = fresh_storage(config).await;

    storage.new(State::new("Oregon").into()).await.unwrap();
    assert_eq!(storage.count(Some(EntityKind::State)).await.unwrap(), 0);

    storage.save().await.unwrap();
    assert_eq!(storage.count(Some(EntityKind::State)).await.unwrap(), 1);
    storage.close().await.unwrap();
}

#[tokio::test]
async fn test_failed_commit_discards_pending_work() {
    let Some(config) = test_config() else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let _guard = DB_LOCK.lock().await;
    let storage = fresh_storage(config).await;

    // A city whose state was never stored violates the foreign key.
    let orphan = domain::models::City::new(uuid::Uuid::new_v4(), "Nowhere");
    storage.new(State::new("Idaho").into()).await.unwrap();
    storage.new(orphan.into()).await.unwrap();
    assert!(storage.save().await.is_err());

    assert_eq!(storage.count(None).await.unwrap(), 0);
    storage.save().await.unwrap();
    assert_eq!(storage.count(None).await.unwrap(), 0);
    storage.close().await.unwrap();
}

#[tokio::test]
async fn test_reset_on_reload_empties_schema() {
    let Some(config) = test_config() else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let _guard = DB_LOCK.lock().await;
    let storage = fresh_storage(config.clone()).await;
    storage.persist(State::new("Maine").into()).await.unwrap();
    storage.close().await.unwrap();

    let reset = DbStorage::with_config(config, true);
    reset.reload().await.unwrap();
    assert_eq!(reset.count(None).await.unwrap(), 0);
    reset.close().await.unwrap();
}
