use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceFormat {
    #[default]
    Compact,
    Json,
}

impl TraceFormat {
    /// `"json"` (any case) selects JSON lines, anything else is compact.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("json") {
            TraceFormat::Json
        } else {
            TraceFormat::Compact
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `level` when set.
pub fn tracing_init(level: &str, format: TraceFormat) -> Result<(), TracingInitError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|source| TracingInitError::InvalidFilter { source })?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        TraceFormat::Compact => {
            tracing::subscriber::set_global_default(registry.with(fmt::layer().compact()))
        }
        TraceFormat::Json => {
            tracing::subscriber::set_global_default(registry.with(fmt::layer().json()))
        }
    };

    result.map_err(|source| TracingInitError::SetGlobalDefault { source })
}

#[derive(Debug, Error)]
pub enum TracingInitError {
    #[error("Invalid filter config")]
    InvalidFilter {
        #[from]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Failed to set global default subscriber")]
    SetGlobalDefault {
        #[from]
        source: tracing::subscriber::SetGlobalDefaultError,
    },
}
