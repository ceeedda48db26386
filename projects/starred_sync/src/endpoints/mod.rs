pub mod github;

use std::sync::Arc;

use axum::{
	routing::{get, post},
	Extension, Router,
};

use crate::sync::SyncContext;

/// Manual trigger and state inspection routes.
pub fn router(ctx: Arc<SyncContext>) -> Router {
	Router::new()
		.route("/github/starred/sync", post(github::starred::sync::index::handler))
		.route("/github/starred/state", get(github::starred::read_state::index::handler))
		.layer(Extension(ctx))
}
