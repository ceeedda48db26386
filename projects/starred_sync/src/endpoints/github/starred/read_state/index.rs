use std::sync::Arc;

use axum::{
	extract::{Extension, Json},
	http::StatusCode,
	response::IntoResponse,
};
use thiserror::Error;

use crate::{
	state::{StateStoreError, STATE_KEY},
	sync::SyncContext,
};

#[derive(Debug, Error)]
pub enum HandlerError {
	#[error("LoadState: {source}")]
	LoadState {
		#[from]
		source: StateStoreError,
	},
	#[error("StateNotFound: {key}")]
	StateNotFound {
		key: &'static str,
	},
}

impl IntoResponse for HandlerError {
	fn into_response(self) -> axum::response::Response {
		match self {
			HandlerError::LoadState{ source } => (StatusCode::INTERNAL_SERVER_ERROR, source.to_string()).into_response(),
			HandlerError::StateNotFound{ key } => (StatusCode::NOT_FOUND, format!("No stored state under {key}")).into_response(),
		}
	}
}

/// Axum handler: GET /github/starred/state
pub async fn handler(
	Extension(ctx): Extension<Arc<SyncContext>>,
) -> impl IntoResponse {
	let entries = match ctx.store.load().await {
		Ok(Some(entries)) => entries,
		Ok(None) => return HandlerError::StateNotFound { key: STATE_KEY }.into_response(),
		Err(source) => return HandlerError::LoadState { source }.into_response(),
	};

	(StatusCode::OK, Json(entries)).into_response()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::endpoints::router;
	use crate::publisher::testing::RecordingClient;
	use crate::state::{MemoryStateStore, StateStore};
	use axum::{body::Body, http::Request};
	use interfaces_github_starred::index::FeedEntry;
	use serde_json::Value;
	use tower::ServiceExt;
	use url::Url;

	fn app(store: Arc<dyn StateStore>) -> axum::Router {
		let (client, _rx) = RecordingClient::new(false);
		router(Arc::new(SyncContext {
			http: reqwest::Client::new(),
			feed_url: Url::parse("http://127.0.0.1:9/unused").unwrap(),
			github_token: None,
			store,
			publisher: client,
			timezone: "BST".to_string(),
		}))
	}

	fn state_request() -> Request<Body> {
		Request::builder()
			.uri("/github/starred/state")
			.body(Body::empty())
			.unwrap()
	}

	#[tokio::test]
	async fn test_absent_state_is_not_found() {
		let response = app(Arc::new(MemoryStateStore::new()))
			.oneshot(state_request())
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn test_stored_entries_are_returned() {
		let entry = FeedEntry::new("o/a", "https://github.com/o/a", Some("A".into()), "t").unwrap();
		let store = Arc::new(MemoryStateStore::with_entries(vec![entry]));

		let response = app(store).oneshot(state_request()).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);

		let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
		let entries: Value = serde_json::from_slice(&body).unwrap();
		assert_eq!(entries[0]["html_url"], "https://github.com/o/a");
		assert_eq!(entries[0]["description"], "A");
	}
}
