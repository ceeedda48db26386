use diesel::prelude::*;
use thiserror::Error;
use crate::db::{kv_slot::models::*, schema::kv_slots::dsl::*};

const CREATE_KV_SLOTS: &str =
    include_str!("../../../migrations/2024-06-01-000000_create_kv_slots/up.sql");

#[derive(Debug, Error)]
pub enum EnsureKvSlotsTableError {
    #[error("EnsureKvSlotsTable: {source}")]
    EnsureKvSlotsTable {
        #[from]
        source: diesel::result::Error,
    },
}

/// Runs the table migration. Safe to call on every start.
pub fn ensure_kv_slots_table(conn: &mut PgConnection) -> Result<(), EnsureKvSlotsTableError> {
    diesel::sql_query(CREATE_KV_SLOTS)
        .execute(conn)
        .map(|_| ())
        .map_err(|source| EnsureKvSlotsTableError::EnsureKvSlotsTable { source })
}

#[derive(Debug, Error)]
pub enum GetKvSlotError {
    #[error("GetKvSlot: {source}")]
    GetKvSlot {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn get_kv_slot(
    conn: &mut PgConnection,
    key_val: &str,
) -> Result<Option<KvSlot>, GetKvSlotError> {
    kv_slots
        .filter(key.eq(key_val))
        .first::<KvSlot>(conn)
        .optional()
        .map_err(|source| GetKvSlotError::GetKvSlot { source })
}

#[derive(Debug, Error)]
pub enum UpsertKvSlotError {
    #[error("UpsertKvSlot: {source}")]
    UpsertKvSlot {
        #[from]
        source: diesel::result::Error,
    },
}

/// Inserts the slot, or overwrites value and timestamp if the key exists.
pub fn upsert_kv_slot(
    conn: &mut PgConnection,
    new: &NewKvSlot,
) -> Result<KvSlot, UpsertKvSlotError> {
    diesel::insert_into(kv_slots)
        .values(new)
        .on_conflict(key)
        .do_update()
        .set((value.eq(new.value), updated_at.eq(new.updated_at)))
        .get_result(conn)
        .map_err(|source| UpsertKvSlotError::UpsertKvSlot { source })
}
