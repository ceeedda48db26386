use std::sync::Arc;

use interfaces_github_starred::index::{fetch_starred_entries, FetchStarredEntriesError};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
    publisher::{publish_entries, SaveUrlClient},
    state::{StateStore, StateStoreError},
    utils::diff::new_entries,
};

/// Everything one tick needs. Shared by the scheduler and the HTTP trigger.
pub struct SyncContext {
    pub http: reqwest::Client,
    pub feed_url: Url,
    pub github_token: Option<String>,
    pub store: Arc<dyn StateStore>,
    pub publisher: Arc<dyn SaveUrlClient>,
    pub timezone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub fetched: usize,
    pub new: usize,
}

#[derive(Debug, Error)]
pub enum RunTickError {
    #[error("FetchStarredEntries: {source}")]
    FetchStarredEntries {
        #[from]
        source: FetchStarredEntriesError,
    },

    #[error("LoadState: {source}")]
    LoadState {
        source: StateStoreError,
    },

    #[error("SaveState: {source}")]
    SaveState {
        source: StateStoreError,
    },
}

/// Runs one fetch, diff, publish, save cycle.
///
/// A failed fetch returns before the state is touched. Once the fetch
/// succeeds the full fetched list is always saved, whether or not anything
/// was new and regardless of how the (unawaited) publishes turn out.
pub async fn run_tick(ctx: &SyncContext) -> Result<TickReport, RunTickError> {
    let fetched = fetch_starred_entries(&ctx.http, &ctx.feed_url, ctx.github_token.as_deref()).await?;

    let previous = ctx
        .store
        .load()
        .await
        .map_err(|source| RunTickError::LoadState { source })?;

    let new = new_entries(&fetched, previous.as_deref());

    if new.is_empty() {
        info!(fetched = fetched.len(), "No new starred entries");
    } else {
        info!(new = new.len(), fetched = fetched.len(), "New starred entries");
        for entry in &new {
            info!(
                full_name = entry.full_name(),
                url = entry.html_url(),
                created_at = entry.created_at(),
                "new starred entry"
            );
        }

        let dispatched = publish_entries(Arc::clone(&ctx.publisher), &new, &ctx.timezone);
        info!(dispatched, "dispatched saves to omnivore");
    }

    ctx.store
        .save(&fetched)
        .await
        .map_err(|source| RunTickError::SaveState { source })?;
    info!(count = fetched.len(), "saved starred state");

    Ok(TickReport {
        fetched: fetched.len(),
        new: new.len(),
    })
}
