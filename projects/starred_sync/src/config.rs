use std::{net::SocketAddr, path::PathBuf, time::Duration};

use interfaces_github_starred::index::starred_feed_url;
use interfaces_omnivore_save_url::index::DEFAULT_BASE_URL;
use thiserror::Error;
use url::Url;

pub const DEFAULT_TIMEZONE: &str = "BST";
pub const DEFAULT_STATE_FILE: &str = "github_starred.json";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 600;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Where the last-seen entry list is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateBackend {
    Postgres { database_url: String },
    File { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub feed_url: Url,
    pub github_token: Option<String>,
    pub omnivore_base_url: Url,
    pub omnivore_api_key: String,
    pub timezone: String,
    pub state_backend: StateBackend,
    pub poll_interval: Duration,
    pub bind_addr: SocketAddr,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MissingVar: {name}")]
    MissingVar {
        name: &'static str,
    },

    #[error("InvalidUrl: {name}={value}: {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("InvalidPollInterval: {value}: {source}")]
    InvalidPollInterval {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("InvalidStateFile: {value} does not name a file")]
    InvalidStateFile {
        value: String,
    },

    #[error("InvalidBindAddr: {value}: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let feed_url = match var("API_URL") {
            Some(value) => parse_url("API_URL", value)?,
            None => {
                let username = var("GITHUB_USERNAME")
                    .ok_or(ConfigError::MissingVar { name: "GITHUB_USERNAME" })?;
                starred_feed_url(&username).map_err(|source| ConfigError::InvalidUrl {
                    name: "GITHUB_USERNAME",
                    value: username.clone(),
                    source,
                })?
            }
        };

        let omnivore_base_url = parse_url(
            "OMNIVORE_BASE_URL",
            var("OMNIVORE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        )?;

        let omnivore_api_key = var("OMNIVORE_API_KEY")
            .ok_or(ConfigError::MissingVar { name: "OMNIVORE_API_KEY" })?;

        let state_backend = match var("DATABASE_URL") {
            Some(database_url) => StateBackend::Postgres { database_url },
            None => {
                let value = var("STATE_FILE").unwrap_or_else(|| DEFAULT_STATE_FILE.to_string());
                let path = PathBuf::from(&value);
                // the store writes `<name>.tmp` next to the file
                if path.file_name().is_none() {
                    return Err(ConfigError::InvalidStateFile { value });
                }
                StateBackend::File { path }
            }
        };

        let poll_interval = match var("POLL_INTERVAL_SECS") {
            Some(value) => {
                let secs: u64 = value
                    .trim()
                    .parse()
                    .map_err(|source| ConfigError::InvalidPollInterval { value: value.clone(), source })?;
                if secs == 0 {
                    return Err(ConfigError::ZeroPollInterval);
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        };

        let bind_value = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_value
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr { value: bind_value.clone(), source })?;

        Ok(Config {
            feed_url,
            github_token: var("GITHUB_TOKEN"),
            omnivore_base_url,
            omnivore_api_key,
            timezone: var("OMNIVORE_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            state_backend,
            poll_interval,
            bind_addr,
        })
    }
}

fn parse_url(name: &'static str, value: String) -> Result<Url, ConfigError> {
    Url::parse(&value).map_err(|source| ConfigError::InvalidUrl { name, value, source })
}
