use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// One starred repository, as returned by the `/users/{name}/starred` feed.
///
/// Every value of this type has been through [`RawFeedEntry`] validation, so
/// `html_url` is always a canonical, parseable URL. Deserializing a
/// `FeedEntry` (from the feed or from stored state) runs the same check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFeedEntry")]
pub struct FeedEntry {
    full_name: String,
    html_url: String,
    description: Option<String>,
    created_at: String,
}

/// Shape of a feed object before URL validation. Extra fields are ignored.
#[derive(Debug, Deserialize)]
pub struct RawFeedEntry {
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Error)]
pub enum InvalidFeedEntry {
    #[error("InvalidHtmlUrl: {url}: {source}")]
    InvalidHtmlUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl TryFrom<RawFeedEntry> for FeedEntry {
    type Error = InvalidFeedEntry;

    fn try_from(raw: RawFeedEntry) -> Result<Self, Self::Error> {
        let html_url = Url::parse(&raw.html_url)
            .map_err(|source| InvalidFeedEntry::InvalidHtmlUrl {
                url: raw.html_url.clone(),
                source,
            })?
            .to_string();

        Ok(FeedEntry {
            full_name: raw.full_name,
            html_url,
            description: raw.description,
            created_at: raw.created_at,
        })
    }
}

impl FeedEntry {
    pub fn new(
        full_name: impl Into<String>,
        html_url: impl Into<String>,
        description: Option<String>,
        created_at: impl Into<String>,
    ) -> Result<Self, InvalidFeedEntry> {
        RawFeedEntry {
            full_name: full_name.into(),
            html_url: html_url.into(),
            description,
            created_at: created_at.into(),
        }
        .try_into()
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn html_url(&self) -> &str {
        &self.html_url
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }
}

/// Builds the default feed URL for a GitHub user.
pub fn starred_feed_url(username: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("https://api.github.com/users/{username}/starred"))
}

/// Fetches the starred feed and validates every entry.
///
/// Entries come back in feed order (newest star first on GitHub). A single
/// malformed entry fails the whole fetch.
pub async fn fetch_starred_entries(
    client: &Client,
    api_url: &Url,
    token: Option<&str>,
) -> Result<Vec<FeedEntry>, FetchStarredEntriesError> {
    let mut request = client
        .get(api_url.clone())
        .header(header::ACCEPT, "application/vnd.github+json")
        .header(header::USER_AGENT, "rust-client");

    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = request
        .send()
        .await
        .map_err(|source| FetchStarredEntriesError::RequestSend { source })?;

    let status = response.status();

    let body = response
        .text()
        .await
        .map_err(|source| FetchStarredEntriesError::ResponseRead { source })?;

    if !status.is_success() {
        return Err(FetchStarredEntriesError::UnexpectedStatus { status, body });
    }

    let entries: Vec<FeedEntry> = serde_json::from_str(&body)
        .map_err(|source| FetchStarredEntriesError::DecodeEntries { source })?;

    debug!(count = entries.len(), url = %api_url, "fetched starred entries");

    Ok(entries)
}

#[derive(Debug, Error)]
pub enum FetchStarredEntriesError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },

    #[error("UnexpectedStatus: {status}: {body}")]
    UnexpectedStatus {
        status: StatusCode,
        body: String,
    },

    #[error("DecodeEntries: {source}")]
    DecodeEntries {
        source: serde_json::Error,
    },
}
