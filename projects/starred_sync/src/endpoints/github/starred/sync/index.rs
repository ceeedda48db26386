use std::sync::Arc;

use axum::{
	extract::{Extension, Json},
	http::StatusCode,
	response::IntoResponse,
};
use thiserror::Error;
use tracing::error;

use crate::sync::{run_tick, RunTickError, SyncContext, TickReport};

#[derive(Debug, Error)]
pub enum HandlerError {
	#[error("RunTick: {source}")]
	RunTick {
		#[from]
		source: RunTickError,
	},
}

impl IntoResponse for HandlerError {
	fn into_response(self) -> axum::response::Response {
		let status = match &self {
			HandlerError::RunTick { source: RunTickError::FetchStarredEntries { .. } } => StatusCode::BAD_GATEWAY,
			HandlerError::RunTick { .. } => StatusCode::INTERNAL_SERVER_ERROR,
		};
		(status, self.to_string()).into_response()
	}
}

/// Axum handler: POST /github/starred/sync
///
/// Runs one tick right away, outside the schedule.
pub async fn handler(
	Extension(ctx): Extension<Arc<SyncContext>>,
) -> Result<Json<TickReport>, HandlerError> {
	let report = run_tick(&ctx).await.map_err(|source| {
		error!(error = %source, "manual tick failed");
		HandlerError::RunTick { source }
	})?;

	Ok(Json(report))
}
