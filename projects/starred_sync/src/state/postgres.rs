use async_trait::async_trait;
use chrono::Utc;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use interfaces_github_starred::index::FeedEntry;
use tracing::{debug, info};

use super::{decode_entries, StateStore, StateStoreError, STATE_KEY};
use crate::db::{
    kv_slot::{
        models::NewKvSlot,
        queries::{ensure_kv_slots_table, get_kv_slot, upsert_kv_slot},
    },
    PgPool,
};

/// Keeps the slot as a row of the `kv_slots` table.
///
/// Diesel is synchronous, so every query runs on the blocking pool.
#[derive(Clone)]
pub struct PgStateStore {
    pool: PgPool,
}

impl PgStateStore {
    pub fn new(pool: PgPool) -> Self {
        PgStateStore { pool }
    }

    /// Builds a pool for `database_url` and creates the table if needed.
    pub async fn connect(database_url: &str) -> Result<Self, StateStoreError> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = tokio::task::spawn_blocking(move || Pool::builder().build(manager))
            .await?
            .map_err(|source| StateStoreError::BuildPool { source })?;

        let store = PgStateStore::new(pool);
        store.ensure_table().await?;

        info!("connected postgres state store");
        Ok(store)
    }

    async fn ensure_table(&self) -> Result<(), StateStoreError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<(), StateStoreError> {
            let mut conn = pool
                .get()
                .map_err(|source| StateStoreError::GetConnectionFromPool { source })?;
            ensure_kv_slots_table(&mut conn)?;
            Ok(())
        })
        .await?
    }
}

#[async_trait]
impl StateStore for PgStateStore {
    async fn load(&self) -> Result<Option<Vec<FeedEntry>>, StateStoreError> {
        let pool = self.pool.clone();
        let slot = tokio::task::spawn_blocking(move || -> Result<_, StateStoreError> {
            let mut conn = pool
                .get()
                .map_err(|source| StateStoreError::GetConnectionFromPool { source })?;
            Ok(get_kv_slot(&mut conn, STATE_KEY)?)
        })
        .await??;

        Ok(slot.and_then(|slot| decode_entries(&slot.value)))
    }

    async fn save(&self, entries: &[FeedEntry]) -> Result<(), StateStoreError> {
        let raw = serde_json::to_string(entries)?;
        let count = entries.len();
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || -> Result<(), StateStoreError> {
            let mut conn = pool
                .get()
                .map_err(|source| StateStoreError::GetConnectionFromPool { source })?;
            let new = NewKvSlot {
                key: STATE_KEY,
                value: &raw,
                updated_at: Utc::now().naive_utc(),
            };
            upsert_kv_slot(&mut conn, &new)?;
            Ok(())
        })
        .await??;

        debug!(count, key = STATE_KEY, "saved state row");
        Ok(())
    }
}
