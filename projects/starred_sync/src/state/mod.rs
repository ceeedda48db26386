//! Last-seen starred entries, kept in a single named slot.
//!
//! `load` returns `None` when nothing was stored yet, or when the stored
//! value no longer decodes as a list of entries. `save` always replaces the
//! whole slot.

pub mod file;
pub mod postgres;

use async_trait::async_trait;
use interfaces_github_starred::index::FeedEntry;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::warn;

pub use file::FileStateStore;
pub use postgres::PgStateStore;

/// Name of the slot holding the last fetched entry list.
pub const STATE_KEY: &str = "GITHUB_STARRED";

#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self) -> Result<Option<Vec<FeedEntry>>, StateStoreError>;

    async fn save(&self, entries: &[FeedEntry]) -> Result<(), StateStoreError>;
}

#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("BuildPool: {source}")]
    BuildPool {
        source: r2d2::Error,
    },

    #[error("GetConnectionFromPool: {source}")]
    GetConnectionFromPool {
        source: r2d2::Error,
    },

    #[error(transparent)]
    EnsureKvSlotsTable {
        #[from]
        source: crate::db::kv_slot::queries::EnsureKvSlotsTableError,
    },

    #[error(transparent)]
    GetKvSlot {
        #[from]
        source: crate::db::kv_slot::queries::GetKvSlotError,
    },

    #[error(transparent)]
    UpsertKvSlot {
        #[from]
        source: crate::db::kv_slot::queries::UpsertKvSlotError,
    },

    #[error("BlockingTask: {source}")]
    BlockingTask {
        #[from]
        source: tokio::task::JoinError,
    },

    #[error("ReadStateFile: {source}")]
    ReadStateFile {
        source: std::io::Error,
    },

    #[error("WriteStateFile: {source}")]
    WriteStateFile {
        source: std::io::Error,
    },

    #[error("SerializeEntries: {source}")]
    SerializeEntries {
        #[from]
        source: serde_json::Error,
    },
}

/// Decodes a stored slot value. Undecodable values are treated as absent.
pub(crate) fn decode_entries(raw: &str) -> Option<Vec<FeedEntry>> {
    match serde_json::from_str(raw) {
        Ok(entries) => Some(entries),
        Err(err) => {
            warn!(error = %err, key = STATE_KEY, "stored state is not a valid entry list, treating as absent");
            None
        }
    }
}

/// In-process store, lost on restart. Used for dry runs and tests.
#[derive(Default)]
pub struct MemoryStateStore {
    slot: Mutex<Option<Vec<FeedEntry>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<FeedEntry>) -> Self {
        MemoryStateStore {
            slot: Mutex::new(Some(entries)),
        }
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self) -> Result<Option<Vec<FeedEntry>>, StateStoreError> {
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, entries: &[FeedEntry]) -> Result<(), StateStoreError> {
        *self.slot.lock().await = Some(entries.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, description: Option<&str>) -> FeedEntry {
        FeedEntry::new(
            format!("owner/{name}"),
            format!("https://github.com/owner/{name}"),
            description.map(str::to_string),
            "2024-01-01T00:00:00Z",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_memory_store_starts_absent() {
        let store = MemoryStateStore::new();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_round_trip_and_overwrite() {
        let store = MemoryStateStore::new();
        let first = vec![entry("a", Some("A")), entry("b", None)];
        store.save(&first).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(first));

        let second = vec![entry("c", None)];
        store.save(&second).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(second));
    }

    #[test]
    fn test_decode_entries_accepts_stored_shape() {
        let raw = r#"[{"full_name":"o/a","html_url":"https://github.com/o/a","description":null,"created_at":"t"}]"#;
        let entries = decode_entries(raw).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].html_url(), "https://github.com/o/a");
    }

    #[test]
    fn test_decode_entries_treats_garbage_as_absent() {
        assert_eq!(decode_entries("{\"not\":\"a list\"}"), None);
        assert_eq!(decode_entries("[{\"full_name\":1}]"), None);
        assert_eq!(decode_entries(""), None);
    }
}
