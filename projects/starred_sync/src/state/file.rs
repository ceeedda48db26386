use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use interfaces_github_starred::index::FeedEntry;
use tracing::debug;

use super::{decode_entries, StateStore, StateStoreError};

/// Keeps the slot as a JSON array in one file.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStateStore { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self) -> Result<Option<Vec<FeedEntry>>, StateStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(decode_entries(&raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StateStoreError::ReadStateFile { source }),
        }
    }

    async fn save(&self, entries: &[FeedEntry]) -> Result<(), StateStoreError> {
        let raw = serde_json::to_vec_pretty(entries)?;

        // write then rename, so a crash never leaves a half-written slot
        let temp = self.temp_path();
        tokio::fs::write(&temp, raw)
            .await
            .map_err(|source| StateStoreError::WriteStateFile { source })?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|source| StateStoreError::WriteStateFile { source })?;

        debug!(path = %self.path.display(), count = entries.len(), "saved state file");
        Ok(())
    }
}
