use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;
use uuid::Uuid;

pub const DEFAULT_BASE_URL: &str = "https://api-prod.omnivore.app/api/graphql";

const SAVE_URL_MUTATION: &str = r#"
    mutation SaveUrl($input: SaveUrlInput!) {
        saveUrl(input: $input) {
            __typename
            ... on SaveSuccess {
                url
                clientRequestId
            }
            ... on SaveError {
                errorCodes
                message
            }
        }
    }
"#;

/// Label attached to a saved item. Omnivore creates unknown labels on the fly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
}

impl Label {
    pub fn named(name: impl Into<String>) -> Self {
        Label {
            name: name.into(),
            color: None,
            description: None,
        }
    }
}

/// Caller-side fields of a `saveUrl` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveUrlInput {
    pub url: String,
    pub timezone: String,
    pub published_at: String,
    pub saved_at: String,
    pub labels: Vec<Label>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveUrlVariablesInput<'a> {
    url: &'a str,
    source: &'static str,
    client_request_id: Uuid,
    timezone: &'a str,
    published_at: &'a str,
    saved_at: &'a str,
    labels: &'a [Label],
}

#[derive(Deserialize)]
struct GraphQLResponse {
    data: Option<SaveUrlData>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

#[derive(Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveUrlData {
    save_url: SaveUrlResult,
}

#[derive(Deserialize)]
#[serde(tag = "__typename")]
enum SaveUrlResult {
    #[serde(rename_all = "camelCase")]
    SaveSuccess {
        url: String,
        client_request_id: String,
    },
    #[serde(rename_all = "camelCase")]
    SaveError {
        #[serde(default)]
        error_codes: Vec<String>,
        message: Option<String>,
    },
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedItem {
    pub url: String,
    pub client_request_id: String,
}

#[derive(Clone)]
pub struct OmnivoreClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl OmnivoreClient {
    pub fn new(http: Client, base_url: Url, api_key: impl Into<String>) -> Self {
        OmnivoreClient {
            http,
            base_url,
            api_key: api_key.into(),
        }
    }

    pub async fn save_url(&self, input: &SaveUrlInput) -> Result<SavedItem, SaveUrlError> {
        let payload = serde_json::json!({
            "query": SAVE_URL_MUTATION,
            "variables": {
                "input": SaveUrlVariablesInput {
                    url: &input.url,
                    source: "api",
                    client_request_id: Uuid::new_v4(),
                    timezone: &input.timezone,
                    published_at: &input.published_at,
                    saved_at: &input.saved_at,
                    labels: &input.labels,
                },
            }
        });

        let response = self
            .http
            .post(self.base_url.clone())
            .header(header::AUTHORIZATION, &self.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, "rust-client")
            .json(&payload)
            .send()
            .await
            .map_err(|source| SaveUrlError::RequestSend { source })?;

        let status = response.status();

        let body = response
            .text()
            .await
            .map_err(|source| SaveUrlError::ResponseRead { source })?;

        if !status.is_success() {
            return Err(SaveUrlError::UnexpectedStatus { status, body });
        }

        let parsed: GraphQLResponse = serde_json::from_str(&body)
            .map_err(|source| SaveUrlError::DeserializeResponseBody { source })?;

        if !parsed.errors.is_empty() {
            let messages = parsed
                .errors
                .into_iter()
                .map(|err| err.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(SaveUrlError::GraphQL { messages });
        }

        match parsed.data.map(|data| data.save_url) {
            Some(SaveUrlResult::SaveSuccess {
                url,
                client_request_id,
            }) => {
                debug!(%url, "saved to omnivore");
                Ok(SavedItem {
                    url,
                    client_request_id,
                })
            }
            Some(SaveUrlResult::SaveError {
                error_codes,
                message,
            }) => Err(SaveUrlError::Rejected {
                error_codes,
                message: message.unwrap_or_default(),
            }),
            None => Err(SaveUrlError::DataFieldMissing),
        }
    }
}

#[derive(Debug, Error)]
pub enum SaveUrlError {
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

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        source: serde_json::Error,
    },

    #[error("GraphQL: {messages}")]
    GraphQL {
        messages: String,
    },

    #[error("Rejected: {error_codes:?} {message}")]
    Rejected {
        error_codes: Vec<String>,
        message: String,
    },

    #[error("Missing data field in GraphQL response")]
    DataFieldMissing,
}
