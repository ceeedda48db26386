//! Forwards new starred entries to the read-it-later service.
//!
//! Publishing is fire-and-forget: one spawned task per entry, nothing is
//! awaited and failures only show up in the logs. A tick therefore finishes
//! (and saves state) before the saves have completed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use interfaces_github_starred::index::FeedEntry;
use interfaces_omnivore_save_url::index::{
    Label, OmnivoreClient, SaveUrlError, SaveUrlInput, SavedItem,
};
use tracing::{debug, error};

use crate::utils::tagging::guess_tags;

/// Label put on every forwarded entry.
pub const SOURCE_LABEL: &str = "github-starred";

#[async_trait]
pub trait SaveUrlClient: Send + Sync + 'static {
    async fn save_url(&self, input: &SaveUrlInput) -> Result<SavedItem, SaveUrlError>;
}

#[async_trait]
impl SaveUrlClient for OmnivoreClient {
    async fn save_url(&self, input: &SaveUrlInput) -> Result<SavedItem, SaveUrlError> {
        OmnivoreClient::save_url(self, input).await
    }
}

/// Builds the save request for one entry: source label first, then guessed tags.
pub fn save_input_for(entry: &FeedEntry, timezone: &str, saved_at: &str) -> SaveUrlInput {
    let mut labels = vec![Label::named(SOURCE_LABEL)];
    labels.extend(guess_tags(entry));

    SaveUrlInput {
        url: entry.html_url().to_string(),
        timezone: timezone.to_string(),
        published_at: entry.created_at().to_string(),
        saved_at: saved_at.to_string(),
        labels,
    }
}

/// Spawns one save per entry and returns how many were dispatched.
///
/// Must be called from within a tokio runtime.
pub fn publish_entries(
    client: Arc<dyn SaveUrlClient>,
    entries: &[FeedEntry],
    timezone: &str,
) -> usize {
    let saved_at = Utc::now().to_rfc3339();

    for entry in entries {
        let input = save_input_for(entry, timezone, &saved_at);
        let client = Arc::clone(&client);

        tokio::spawn(async move {
            match client.save_url(&input).await {
                Ok(saved) => {
                    debug!(url = %input.url, saved = %saved.url, "saved starred entry");
                }
                Err(err) => {
                    error!(url = %input.url, error = %err, "failed to save starred entry");
                }
            }
        });
    }

    entries.len()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use tokio::sync::mpsc;

    /// Records every request on a channel. Fails requests when `fail` is set.
    pub struct RecordingClient {
        tx: mpsc::UnboundedSender<SaveUrlInput>,
        fail: bool,
    }

    impl RecordingClient {
        pub fn new(fail: bool) -> (Arc<Self>, mpsc::UnboundedReceiver<SaveUrlInput>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (Arc::new(RecordingClient { tx, fail }), rx)
        }
    }

    #[async_trait]
    impl SaveUrlClient for RecordingClient {
        async fn save_url(&self, input: &SaveUrlInput) -> Result<SavedItem, SaveUrlError> {
            let _ = self.tx.send(input.clone());
            if self.fail {
                return Err(SaveUrlError::DataFieldMissing);
            }
            Ok(SavedItem {
                url: input.url.clone(),
                client_request_id: "test".to_string(),
            })
        }
    }

    /// Collects `n` requests, failing the test if they do not arrive in time.
    pub async fn collect(rx: &mut mpsc::UnboundedReceiver<SaveUrlInput>, n: usize) -> Vec<SaveUrlInput> {
        let mut received = Vec::with_capacity(n);
        for _ in 0..n {
            let input = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
                .await
                .expect("timed out waiting for save request")
                .expect("channel closed");
            received.push(input);
        }
        received
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{collect, RecordingClient};
    use super::*;

    fn entry(url: &str, description: Option<&str>) -> FeedEntry {
        FeedEntry::new("o/r", url, description.map(str::to_string), "2020-03-04T05:06:07Z").unwrap()
    }

    fn names(labels: &[Label]) -> Vec<&str> {
        labels.iter().map(|l| l.name.as_str()).collect()
    }

    #[test]
    fn test_save_input_carries_entry_fields() {
        let input = save_input_for(
            &entry("https://github.com/ziglang/zig", Some("General-purpose language")),
            "BST",
            "2024-06-01T00:00:00+00:00",
        );

        assert_eq!(input.url, "https://github.com/ziglang/zig");
        assert_eq!(input.timezone, "BST");
        assert_eq!(input.published_at, "2020-03-04T05:06:07Z");
        assert_eq!(input.saved_at, "2024-06-01T00:00:00+00:00");
        assert_eq!(names(&input.labels), vec!["github-starred", "zig"]);
    }

    #[test]
    fn test_untagged_entry_still_gets_source_label() {
        let input = save_input_for(&entry("https://github.com/o/plain", None), "BST", "now");
        assert_eq!(input.labels, vec![Label::named(SOURCE_LABEL)]);
    }

    #[tokio::test]
    async fn test_one_request_per_entry() {
        let (client, mut rx) = RecordingClient::new(false);
        let entries = vec![
            entry("https://github.com/o/a", None),
            entry("https://github.com/o/b", Some("svelte kit")),
        ];

        let dispatched = publish_entries(client, &entries, "BST");
        assert_eq!(dispatched, 2);

        let mut received = collect(&mut rx, 2).await;
        received.sort_by(|a, b| a.url.cmp(&b.url));
        assert_eq!(received[0].url, "https://github.com/o/a");
        assert_eq!(received[1].url, "https://github.com/o/b");
        assert_eq!(names(&received[1].labels), vec!["github-starred", "svelte"]);
        assert_eq!(received[0].saved_at, received[1].saved_at);
    }

    #[tokio::test]
    async fn test_failures_are_not_surfaced() {
        let (client, mut rx) = RecordingClient::new(true);
        let entries = vec![entry("https://github.com/o/a", None)];

        assert_eq!(publish_entries(client, &entries, "BST"), 1);
        assert_eq!(collect(&mut rx, 1).await.len(), 1);
    }

    #[tokio::test]
    async fn test_nothing_to_publish() {
        let (client, mut rx) = RecordingClient::new(false);

        assert_eq!(publish_entries(client, &[], "BST"), 0);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
    }
}
