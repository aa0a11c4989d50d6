// Storage for blood pressure readings: an in-memory store and a PostgreSQL store behind one trait

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tokio::sync::RwLock;
use tracing::debug;

use crate::api::blood_pressure::model::{BloodPressure, UserRef, DEFAULT_USERS};
use crate::api::blood_pressure::search::SearchQuery;
use crate::database::DatabaseService;
use crate::utils::pagination::{Page, PageRequest};

#[async_trait]
pub trait BloodPressureRepository: Send + Sync + std::fmt::Debug {
    /// Stores a new reading under a freshly assigned id; an id on `entity` is ignored
    async fn insert(&self, entity: BloodPressure) -> Result<BloodPressure>;

    /// Replaces reading `id` in a single step; `None` when no such reading is stored
    async fn update(&self, id: i64, entity: BloodPressure) -> Result<Option<BloodPressure>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<BloodPressure>>;

    /// Known account with this id, login included
    async fn find_user(&self, id: i64) -> Result<Option<UserRef>>;

    /// Readings ordered by id
    async fn find_all(&self, page: PageRequest) -> Result<Page<BloodPressure>>;

    /// Deleting an unknown id is not an error
    async fn delete_by_id(&self, id: i64) -> Result<()>;

    /// Readings matching `query`, ordered by id
    async fn search(&self, query: &SearchQuery, page: PageRequest) -> Result<Page<BloodPressure>>;
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

#[derive(Debug, Default)]
struct MemoryStore {
    next_id: i64,
    readings: BTreeMap<i64, BloodPressure>,
    users: HashMap<i64, String>,
}

impl MemoryStore {
    fn with_login(&self, mut entity: BloodPressure) -> BloodPressure {
        if let Some(user) = entity.user.as_mut() {
            user.login = self.users.get(&user.id).cloned();
        }
        entity
    }
}

/// Process-local store; ids start at 1 and are never reused
#[derive(Debug)]
pub struct InMemoryBloodPressureRepository {
    store: RwLock<MemoryStore>,
}

impl Default for InMemoryBloodPressureRepository {
    fn default() -> Self {
        Self::with_users(DEFAULT_USERS.iter().map(|&(id, login)| (id, login.to_string())))
    }
}

impl InMemoryBloodPressureRepository {
    /// Empty store knowing the default accounts
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store knowing exactly the given `(id, login)` accounts
    pub fn with_users(users: impl IntoIterator<Item = (i64, String)>) -> Self {
        Self {
            store: RwLock::new(MemoryStore {
                users: users.into_iter().collect(),
                ..MemoryStore::default()
            }),
        }
    }

    fn paginate(matching: Vec<BloodPressure>, page: PageRequest) -> Page<BloodPressure> {
        let total: u64 = matching.len() as u64;
        let content: Vec<BloodPressure> = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.size).unwrap_or(usize::MAX))
            .collect();
        Page::new(content, page, total)
    }
}

#[async_trait]
impl BloodPressureRepository for InMemoryBloodPressureRepository {
    async fn insert(&self, entity: BloodPressure) -> Result<BloodPressure> {
        let mut store = self.store.write().await;
        store.next_id += 1;
        let id: i64 = store.next_id;

        let saved: BloodPressure = store.with_login(BloodPressure { id: Some(id), ..entity });
        store.readings.insert(id, saved.clone());
        debug!(id, "Stored blood pressure reading in memory");
        Ok(saved)
    }

    async fn update(&self, id: i64, entity: BloodPressure) -> Result<Option<BloodPressure>> {
        // Check and write under one guard so a concurrent delete is never undone
        let mut store = self.store.write().await;
        if !store.readings.contains_key(&id) {
            return Ok(None);
        }

        let saved: BloodPressure = store.with_login(BloodPressure { id: Some(id), ..entity });
        store.readings.insert(id, saved.clone());
        debug!(id, "Replaced blood pressure reading in memory");
        Ok(Some(saved))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<BloodPressure>> {
        Ok(self.store.read().await.readings.get(&id).cloned())
    }

    async fn find_user(&self, id: i64) -> Result<Option<UserRef>> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).map(|login| UserRef { id, login: Some(login.clone()) }))
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page<BloodPressure>> {
        let store = self.store.read().await;
        let all: Vec<BloodPressure> = store.readings.values().cloned().collect();
        Ok(Self::paginate(all, page))
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.store.write().await.readings.remove(&id);
        Ok(())
    }

    async fn search(&self, query: &SearchQuery, page: PageRequest) -> Result<Page<BloodPressure>> {
        let store = self.store.read().await;
        let matching: Vec<BloodPressure> = store
            .readings
            .values()
            .filter(|entity| query.matches(entity))
            .cloned()
            .collect();
        Ok(Self::paginate(matching, page))
    }
}

// =============================================================================
// POSTGRES STORE
// =============================================================================

const SELECT_READINGS: &str = r#"
    SELECT bp.id, bp.timestamp, bp.systolic, bp.diastolic, bp.user_id, u.login AS user_login
    FROM blood_pressure bp
    LEFT JOIN jhi_user u ON u.id = bp.user_id
"#;

const INSERT_READING: &str = r#"
    WITH saved AS (
        INSERT INTO blood_pressure (timestamp, systolic, diastolic, user_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, timestamp, systolic, diastolic, user_id
    )
    SELECT saved.id, saved.timestamp, saved.systolic, saved.diastolic, saved.user_id,
           u.login AS user_login
    FROM saved
    LEFT JOIN jhi_user u ON u.id = saved.user_id
"#;

const UPDATE_READING: &str = r#"
    WITH saved AS (
        UPDATE blood_pressure
        SET timestamp = $1, systolic = $2, diastolic = $3, user_id = $4
        WHERE id = $5
        RETURNING id, timestamp, systolic, diastolic, user_id
    )
    SELECT saved.id, saved.timestamp, saved.systolic, saved.diastolic, saved.user_id,
           u.login AS user_login
    FROM saved
    LEFT JOIN jhi_user u ON u.id = saved.user_id
"#;

const COUNT_READINGS: &str = r#"
    SELECT COUNT(*)
    FROM blood_pressure bp
    LEFT JOIN jhi_user u ON u.id = bp.user_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct BloodPressureRow {
    id: i64,
    timestamp: DateTime<Utc>,
    systolic: i32,
    diastolic: i32,
    user_id: Option<i64>,
    user_login: Option<String>,
}

impl From<BloodPressureRow> for BloodPressure {
    fn from(row: BloodPressureRow) -> Self {
        BloodPressure {
            id: Some(row.id),
            timestamp: row.timestamp,
            systolic: row.systolic,
            diastolic: row.diastolic,
            user: row.user_id.map(|id| UserRef { id, login: row.user_login }),
        }
    }
}

/// Readings stored in the `blood_pressure` table, owners joined from `jhi_user`
#[derive(Debug, Clone)]
pub struct PgBloodPressureRepository {
    database: DatabaseService,
}

impl PgBloodPressureRepository {
    pub fn new(database: DatabaseService) -> Self {
        Self { database }
    }

    fn pool(&self) -> Result<&PgPool> {
        self.database.get_pool()
    }

    async fn fetch_page(&self, query: &SearchQuery, page: PageRequest) -> Result<Page<BloodPressure>> {
        let pool: &PgPool = self.pool()?;
        let limit: i64 = i64::try_from(page.size).context("Page size out of range")?;
        // Pages beyond any stored row are empty rather than errors
        let offset: i64 = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        let mut count: QueryBuilder<Postgres> = QueryBuilder::new(COUNT_READINGS);
        push_search_filter(&mut count, query);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(pool)
            .await
            .context("Failed to count blood pressure readings")?;

        let mut select: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_READINGS);
        push_search_filter(&mut select, query);
        select.push(" ORDER BY bp.id LIMIT ").push_bind(limit);
        select.push(" OFFSET ").push_bind(offset);

        let rows: Vec<BloodPressureRow> = select
            .build_query_as::<BloodPressureRow>()
            .fetch_all(pool)
            .await
            .context("Failed to load blood pressure readings")?;

        Ok(Page::new(
            rows.into_iter().map(BloodPressure::from).collect(),
            page,
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}

/// Appends the WHERE clause for `query`, mirroring `SearchQuery::matches`
fn push_search_filter(builder: &mut QueryBuilder<'_, Postgres>, query: &SearchQuery) {
    for (index, term) in query.terms().iter().enumerate() {
        builder.push(if index == 0 { " WHERE (" } else { " AND (" });
        builder.push("u.login ILIKE ").push_bind(format!("%{}%", escape_like(term)));

        if let Ok(number) = term.parse::<i64>() {
            builder.push(" OR bp.id = ").push_bind(number);
            if let Ok(value) = i32::try_from(number) {
                builder.push(" OR bp.systolic = ").push_bind(value);
                builder.push(" OR bp.diastolic = ").push_bind(value);
            }
        }
        builder.push(")");
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl BloodPressureRepository for PgBloodPressureRepository {
    async fn insert(&self, entity: BloodPressure) -> Result<BloodPressure> {
        let row: BloodPressureRow = sqlx::query_as(INSERT_READING)
            .bind(entity.timestamp)
            .bind(entity.systolic)
            .bind(entity.diastolic)
            .bind(entity.user.as_ref().map(|user| user.id))
            .fetch_one(self.pool()?)
            .await
            .context("Failed to insert blood pressure reading")?;
        Ok(row.into())
    }

    async fn update(&self, id: i64, entity: BloodPressure) -> Result<Option<BloodPressure>> {
        let row: Option<BloodPressureRow> = sqlx::query_as(UPDATE_READING)
            .bind(entity.timestamp)
            .bind(entity.systolic)
            .bind(entity.diastolic)
            .bind(entity.user.as_ref().map(|user| user.id))
            .bind(id)
            .fetch_optional(self.pool()?)
            .await
            .context("Failed to update blood pressure reading")?;
        Ok(row.map(BloodPressure::from))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<BloodPressure>> {
        let sql: String = format!("{SELECT_READINGS} WHERE bp.id = $1");
        let row: Option<BloodPressureRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool()?)
            .await
            .context("Failed to load blood pressure reading")?;
        Ok(row.map(BloodPressure::from))
    }

    async fn find_user(&self, id: i64) -> Result<Option<UserRef>> {
        let row: Option<(i64, String)> = sqlx::query_as("SELECT id, login FROM jhi_user WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool()?)
            .await
            .context("Failed to load user")?;
        Ok(row.map(|(id, login)| UserRef { id, login: Some(login) }))
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page<BloodPressure>> {
        self.fetch_page(&SearchQuery::default(), page).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM blood_pressure WHERE id = $1")
            .bind(id)
            .execute(self.pool()?)
            .await
            .context("Failed to delete blood pressure reading")?;
        Ok(())
    }

    async fn search(&self, query: &SearchQuery, page: PageRequest) -> Result<Page<BloodPressure>> {
        self.fetch_page(query, page).await
    }
}
