//! PostgreSQL storage backend.
//!
//! A session is a connection pool plus the changes staged since the last
//! commit. `new` and `delete` only stage; `save` applies everything in one
//! transaction, upserts first and deletes last. Cascades are declared in the
//! schema (`ON DELETE CASCADE`), so deleting a parent row removes its
//! dependents and link rows, including ones written earlier in the same
//! transaction.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use domain::models::{Amenity, City, Entity, EntityKind, Place, Review, State, User};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection, PgPool};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::db::{create_pool, DatabaseConfig};
use crate::entities::{
    AmenityEntity, CityEntity, PlaceEntity, ReviewEntity, StateEntity, UserEntity,
};
use crate::error::{StorageError, StorageResult};
use crate::metrics::{record_commit, record_pool_metrics, QueryTimer};
use crate::storage::Storage;
use crate::StorageBackend;

const CREATE_SCHEMA: &str = include_str!("schema/create.sql");
const DROP_SCHEMA: &str = include_str!("schema/drop.sql");

const PLACE_SELECT: &str = r#"
    SELECT p.id, p.created_at, p.updated_at, p.city_id, p.user_id, p.name,
           p.description, p.number_rooms, p.number_bathrooms, p.max_guest,
           p.price_by_night, p.latitude, p.longitude,
           COALESCE(
               array_agg(pa.amenity_id ORDER BY pa.amenity_id) FILTER (WHERE pa.amenity_id IS NOT NULL),
               '{}'::uuid[]
           ) AS amenity_ids
    FROM places p
    LEFT JOIN place_amenity pa ON pa.place_id = p.id
"#;

/// Changes staged since the last commit, keyed by composite key.
#[derive(Debug, Default)]
struct PendingChanges {
    upserts: HashMap<String, Entity>,
    deletes: HashMap<String, Entity>,
}

impl PendingChanges {
    fn stage_upsert(&mut self, entity: Entity) {
        let key = entity.key();
        self.deletes.remove(&key);
        self.upserts.insert(key, entity);
    }

    /// Stages a delete and drops every staged upsert the entity owns,
    /// transitively, so the commit never writes rows that die with it.
    fn stage_delete(&mut self, entity: &Entity) {
        let key = entity.key();
        self.upserts.remove(&key);

        let mut owners = vec![entity.clone()];
        while let Some(owner) = owners.pop() {
            let owned: Vec<String> = self
                .upserts
                .iter()
                .filter(|(_, staged)| staged.is_owned_by(&owner))
                .map(|(key, _)| key.clone())
                .collect();
            owners.extend(owned.iter().filter_map(|key| self.upserts.remove(key)));
        }

        self.deletes.insert(key, entity.clone());
    }

    fn len(&self) -> usize {
        self.upserts.len() + self.deletes.len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parents before children so foreign keys resolve.
    fn ordered_upserts(&self) -> Vec<&Entity> {
        let mut entities: Vec<_> = self.upserts.values().collect();
        entities.sort_by_key(|e| (e.kind().rank(), e.created_at(), e.id()));
        entities
    }

    /// Children before parents.
    fn ordered_deletes(&self) -> Vec<&Entity> {
        let mut entities: Vec<_> = self.deletes.values().collect();
        entities.sort_by_key(|e| (Reverse(e.kind().rank()), e.id()));
        entities
    }
}

struct Session {
    pool: PgPool,
    pending: PendingChanges,
}

/// Relational storage over a PostgreSQL pool.
pub struct DbStorage {
    config: DatabaseConfig,
    reset_on_reload: bool,
    session: RwLock<Option<Session>>,
}

impl DbStorage {
    /// Creates an unconnected backend. The pool is opened by
    /// [`Storage::reload`]. With `reset_on_reload` every reload drops the
    /// schema first.
    pub fn with_config(config: DatabaseConfig, reset_on_reload: bool) -> Self {
        Self {
            config,
            reset_on_reload,
            session: RwLock::new(None),
        }
    }

    async fn pool(&self) -> StorageResult<PgPool> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|session| session.pool.clone())
            .ok_or(StorageError::NotLoaded)
    }
}

fn select_sql(kind: EntityKind, by_id: bool) -> String {
    if kind == EntityKind::Place {
        let filter = if by_id { "WHERE p.id = $1" } else { "" };
        return format!("{PLACE_SELECT} {filter} GROUP BY p.id");
    }

    let columns = match kind {
        EntityKind::State | EntityKind::Amenity => "id, created_at, updated_at, name",
        EntityKind::City => "id, created_at, updated_at, state_id, name",
        EntityKind::User => {
            "id, created_at, updated_at, email, password, first_name, last_name"
        }
        EntityKind::Review => "id, created_at, updated_at, place_id, user_id, text",
        EntityKind::Place => unreachable!("places use PLACE_SELECT"),
    };
    let filter = if by_id { " WHERE id = $1" } else { "" };
    format!("SELECT {columns} FROM {}{filter}", kind.table())
}

async fn fetch_rows<R>(pool: &PgPool, sql: &str, id: Option<Uuid>) -> Result<Vec<R>, sqlx::Error>
where
    R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let query = sqlx::query_as::<_, R>(sql);
    let query = match id {
        Some(id) => query.bind(id),
        None => query,
    };
    query.fetch_all(pool).await
}

fn into_entities<R, M>(rows: Vec<R>) -> Vec<Entity>
where
    R: Into<M>,
    M: Into<Entity>,
{
    rows.into_iter().map(|row| row.into().into()).collect()
}

async fn fetch_entities(
    pool: &PgPool,
    kind: EntityKind,
    id: Option<Uuid>,
) -> Result<Vec<Entity>, sqlx::Error> {
    let sql = select_sql(kind, id.is_some());
    let timer = QueryTimer::new(format!("select_{}", kind.table()));

    let entities = match kind {
        EntityKind::State => {
            into_entities::<_, State>(fetch_rows::<StateEntity>(pool, &sql, id).await?)
        }
        EntityKind::City => {
            into_entities::<_, City>(fetch_rows::<CityEntity>(pool, &sql, id).await?)
        }
        EntityKind::User => {
            into_entities::<_, User>(fetch_rows::<UserEntity>(pool, &sql, id).await?)
        }
        EntityKind::Place => {
            into_entities::<_, Place>(fetch_rows::<PlaceEntity>(pool, &sql, id).await?)
        }
        EntityKind::Review => {
            into_entities::<_, Review>(fetch_rows::<ReviewEntity>(pool, &sql, id).await?)
        }
        EntityKind::Amenity => {
            into_entities::<_, Amenity>(fetch_rows::<AmenityEntity>(pool, &sql, id).await?)
        }
    };

    timer.record();
    Ok(entities)
}

async fn count_rows(pool: &PgPool, kind: EntityKind) -> Result<usize, sqlx::Error> {
    let timer = QueryTimer::new(format!("count_{}", kind.table()));
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", kind.table()))
        .fetch_one(pool)
        .await?;
    timer.record();
    Ok(count.max(0) as usize)
}

async fn upsert(conn: &mut PgConnection, entity: &Entity) -> Result<(), sqlx::Error> {
    match entity {
        Entity::State(state) => {
            sqlx::query(
                r#"
                INSERT INTO states (id, created_at, updated_at, name)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO UPDATE SET
                    updated_at = EXCLUDED.updated_at,
                    name = EXCLUDED.name
                "#,
            )
            .bind(state.base.id)
            .bind(state.base.created_at)
            .bind(state.base.updated_at)
            .bind(state.name.as_str())
            .execute(&mut *conn)
            .await?;
        }
        Entity::City(city) => {
            sqlx::query(
                r#"
                INSERT INTO cities (id, created_at, updated_at, state_id, name)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (id) DO UPDATE SET
                    updated_at = EXCLUDED.updated_at,
                    state_id = EXCLUDED.state_id,
                    name = EXCLUDED.name
                "#,
            )
            .bind(city.base.id)
            .bind(city.base.created_at)
            .bind(city.base.updated_at)
            .bind(city.state_id)
            .bind(city.name.as_str())
            .execute(&mut *conn)
            .await?;
        }
        Entity::User(user) => {
            sqlx::query(
                r#"
                INSERT INTO users (id, created_at, updated_at, email, password, first_name, last_name)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (id) DO UPDATE SET
                    updated_at = EXCLUDED.updated_at,
                    email = EXCLUDED.email,
                    password = EXCLUDED.password,
                    first_name = EXCLUDED.first_name,
                    last_name = EXCLUDED.last_name
                "#,
            )
            .bind(user.base.id)
            .bind(user.base.created_at)
            .bind(user.base.updated_at)
            .bind(user.email.as_str())
            .bind(user.password.as_str())
            .bind(user.first_name.as_deref())
            .bind(user.last_name.as_deref())
            .execute(&mut *conn)
            .await?;
        }
        Entity::Place(place) => {
            sqlx::query(
                r#"
                INSERT INTO places (id, created_at, updated_at, city_id, user_id, name, description,
                                    number_rooms, number_bathrooms, max_guest, price_by_night,
                                    latitude, longitude)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                ON CONFLICT (id) DO UPDATE SET
                    updated_at = EXCLUDED.updated_at,
                    city_id = EXCLUDED.city_id,
                    user_id = EXCLUDED.user_id,
                    name = EXCLUDED.name,
                    description = EXCLUDED.description,
                    number_rooms = EXCLUDED.number_rooms,
                    number_bathrooms = EXCLUDED.number_bathrooms,
                    max_guest = EXCLUDED.max_guest,
                    price_by_night = EXCLUDED.price_by_night,
                    latitude = EXCLUDED.latitude,
                    longitude = EXCLUDED.longitude
                "#,
            )
            .bind(place.base.id)
            .bind(place.base.created_at)
            .bind(place.base.updated_at)
            .bind(place.city_id)
            .bind(place.user_id)
            .bind(place.name.as_str())
            .bind(place.description.as_deref())
            .bind(place.number_rooms)
            .bind(place.number_bathrooms)
            .bind(place.max_guest)
            .bind(place.price_by_night)
            .bind(place.latitude)
            .bind(place.longitude)
            .execute(&mut *conn)
            .await?;

            replace_amenity_links(conn, place).await?;
        }
        Entity::Review(review) => {
            sqlx::query(
                r#"
                INSERT INTO reviews (id, created_at, updated_at, place_id, user_id, text)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO UPDATE SET
                    updated_at = EXCLUDED.updated_at,
                    place_id = EXCLUDED.place_id,
                    user_id = EXCLUDED.user_id,
                    text = EXCLUDED.text
                "#,
            )
            .bind(review.base.id)
            .bind(review.base.created_at)
            .bind(review.base.updated_at)
            .bind(review.place_id)
            .bind(review.user_id)
            .bind(review.text.as_str())
            .execute(&mut *conn)
            .await?;
        }
        Entity::Amenity(amenity) => {
            sqlx::query(
                r#"
                INSERT INTO amenities (id, created_at, updated_at, name)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO UPDATE SET
                    updated_at = EXCLUDED.updated_at,
                    name = EXCLUDED.name
                "#,
            )
            .bind(amenity.base.id)
            .bind(amenity.base.created_at)
            .bind(amenity.base.updated_at)
            .bind(amenity.name.as_str())
            .execute(&mut *conn)
            .await?;
        }
    }
    Ok(())
}

/// Makes the link table match `place.amenity_ids` exactly.
async fn replace_amenity_links(conn: &mut PgConnection, place: &Place) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM place_amenity WHERE place_id = $1")
        .bind(place.base.id)
        .execute(&mut *conn)
        .await?;

    for amenity_id in &place.amenity_ids {
        sqlx::query(
            r#"
            INSERT INTO place_amenity (place_id, amenity_id)
            VALUES ($1, $2)
            ON CONFLICT (place_id, amenity_id) DO NOTHING
            "#,
        )
        .bind(place.base.id)
        .bind(*amenity_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn delete_row(conn: &mut PgConnection, entity: &Entity) -> Result<u64, sqlx::Error> {
    let sql = format!("DELETE FROM {} WHERE id = $1", entity.kind().table());
    let result = sqlx::query(&sql)
        .bind(entity.id())
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

async fn commit(pool: &PgPool, pending: &PendingChanges) -> Result<(), sqlx::Error> {
    let timer = QueryTimer::new("commit");
    let mut tx = pool.begin().await?;

    for entity in pending.ordered_upserts() {
        upsert(&mut tx, entity).await?;
    }
    for entity in pending.ordered_deletes() {
        let removed = delete_row(&mut tx, entity).await?;
        if removed == 0 {
            debug!(key = %entity.key(), "Delete of unknown row ignored");
        }
    }

    tx.commit().await?;
    timer.record();
    Ok(())
}

#[async_trait]
impl Storage for DbStorage {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Db
    }

    async fn all(&self, kind: Option<EntityKind>) -> StorageResult<HashMap<String, Entity>> {
        let pool = self.pool().await?;
        let kinds: Vec<EntityKind> = match kind {
            Some(kind) => vec![kind],
            None => EntityKind::ALL.to_vec(),
        };

        let mut objects = HashMap::new();
        for kind in kinds {
            for entity in fetch_entities(&pool, kind, None).await? {
                objects.insert(entity.key(), entity);
            }
        }
        Ok(objects)
    }

    async fn get(&self, kind: EntityKind, id: &str) -> StorageResult<Option<Entity>> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        let pool = self.pool().await?;
        Ok(fetch_entities(&pool, kind, Some(id)).await?.into_iter().next())
    }

    async fn new(&self, entity: Entity) -> StorageResult<()> {
        let mut guard = self.session.write().await;
        let session = guard.as_mut().ok_or(StorageError::NotLoaded)?;
        debug!(key = %entity.key(), "Staging upsert");
        session.pending.stage_upsert(entity);
        Ok(())
    }

    async fn save(&self) -> StorageResult<()> {
        let mut guard = self.session.write().await;
        let session = guard.as_mut().ok_or(StorageError::NotLoaded)?;
        if session.pending.is_empty() {
            return Ok(());
        }

        // Staged work is consumed whether or not the commit succeeds.
        let pending = std::mem::take(&mut session.pending);
        let changes = pending.len();

        match commit(&session.pool, &pending).await {
            Ok(()) => {
                record_commit(changes, true);
                info!(changes = changes, "Committed storage session");
                Ok(())
            }
            Err(e) => {
                record_commit(changes, false);
                error!(error = %e, changes = changes, "Commit failed, session rolled back");
                Err(e.into())
            }
        }
    }

    async fn delete(&self, entity: Option<&Entity>) -> StorageResult<()> {
        let Some(entity) = entity else {
            return Ok(());
        };
        let mut guard = self.session.write().await;
        let session = guard.as_mut().ok_or(StorageError::NotLoaded)?;
        debug!(key = %entity.key(), "Staging delete");
        session.pending.stage_delete(entity);
        Ok(())
    }

    async fn count(&self, kind: Option<EntityKind>) -> StorageResult<usize> {
        let pool = self.pool().await?;
        match kind {
            Some(kind) => Ok(count_rows(&pool, kind).await?),
            None => {
                let mut total = 0;
                for kind in EntityKind::ALL {
                    total += count_rows(&pool, kind).await?;
                }
                Ok(total)
            }
        }
    }

    async fn reload(&self) -> StorageResult<()> {
        let mut guard = self.session.write().await;

        let pool = match guard.take() {
            Some(session) => {
                if !session.pending.is_empty() {
                    warn!(discarded = session.pending.len(), "Reload discarded staged changes");
                }
                session.pool
            }
            None => {
                info!(
                    host = %self.config.host,
                    database = %self.config.name,
                    "Connecting to database"
                );
                create_pool(&self.config).await?
            }
        };

        if self.reset_on_reload {
            warn!("Test environment: dropping all tables");
            sqlx::raw_sql(DROP_SCHEMA).execute(&pool).await?;
        }
        sqlx::raw_sql(CREATE_SCHEMA).execute(&pool).await?;
        record_pool_metrics(&pool);

        *guard = Some(Session {
            pool,
            pending: PendingChanges::default(),
        });
        info!("Database storage loaded");
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        let session = self.session.write().await.take();
        if let Some(session) = session {
            if !session.pending.is_empty() {
                warn!(discarded = session.pending.len(), "Close discarded staged changes");
            }
            session.pool.close().await;
            info!("Database storage closed");
        }
        Ok(())
    }
}
