use std::{sync::Arc, time::Duration};

use axum::serve;
use interfaces_omnivore_save_url::index::OmnivoreClient;
use projects_starred_sync::{
	config::{Config, ConfigError, StateBackend},
	endpoints::router,
	scheduler::spawn_scheduler,
	state::{FileStateStore, PgStateStore, StateStore, StateStoreError},
	sync::SyncContext,
};
use thiserror::Error;
use tracing::info;
use utils_trace::{tracing_init, TraceFormat};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum MainError {
	#[error("TracingInit: {source}")]
	TracingInit {
		#[source]
		source: utils_trace::TracingInitError,
	},
	#[error("Config: {source}")]
	Config {
		#[source]
		source: ConfigError,
	},
	#[error("HttpClientBuild: {source}")]
	HttpClientBuild {
		#[source]
		source: reqwest::Error,
	},
	#[error("StateStore: {source}")]
	StateStore {
		#[source]
		source: StateStoreError,
	},
	#[error("TcpListenerBind: {source}")]
	TcpListenerBind {
		#[source]
		source: std::io::Error,
	},
	#[error("Serve: {source}")]
	Serve {
		#[source]
		source: std::io::Error,
	}
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
	// a missing .env file is fine, the real environment still applies
	let _ = dotenvy::dotenv();

	let format = TraceFormat::from_name(&std::env::var("LOG_FORMAT").unwrap_or_default());
	tracing_init("info", format)
		.map_err(|source| MainError::TracingInit { source })?;

	let config = Config::from_env()
		.map_err(|source| MainError::Config { source })?;

	let store: Arc<dyn StateStore> = match &config.state_backend {
		StateBackend::Postgres { database_url } => Arc::new(
			PgStateStore::connect(database_url)
				.await
				.map_err(|source| MainError::StateStore { source })?,
		),
		StateBackend::File { path } => {
			info!(path = %path.display(), "using state file");
			Arc::new(FileStateStore::new(path.clone()))
		}
	};

	let http = reqwest::Client::builder()
		.timeout(HTTP_TIMEOUT)
		.build()
		.map_err(|source| MainError::HttpClientBuild { source })?;

	let omnivore = OmnivoreClient::new(
		http.clone(),
		config.omnivore_base_url.clone(),
		config.omnivore_api_key.clone(),
	);

	let ctx = Arc::new(SyncContext {
		http,
		feed_url: config.feed_url.clone(),
		github_token: config.github_token.clone(),
		store,
		publisher: Arc::new(omnivore),
		timezone: config.timezone.clone(),
	});

	info!(feed = %config.feed_url, omnivore = %config.omnivore_base_url, "starred sync configured");

	let scheduler = spawn_scheduler(ctx.clone(), config.poll_interval);

	let listener = tokio::net::TcpListener::bind(config.bind_addr)
		.await
		.map_err(|source| MainError::TcpListenerBind { source })?;

	info!("Server running on addr: {}", config.bind_addr);

	let served = serve(listener, router(ctx)).await;
	scheduler.abort();

	served.map_err(|source| MainError::Serve { source })
}
