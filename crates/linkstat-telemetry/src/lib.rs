//! Tracing setup shared by the linkstat binaries.

use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Output format of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter {filter:?}: {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Builds the filter: `RUST_LOG` if set, `default_level` otherwise.
pub fn env_filter(default_level: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level).map_err(|source| {
            TelemetryError::InvalidFilter {
                filter: default_level.to_string(),
                source,
            }
        }),
    }
}

/// Installs the global tracing subscriber.
///
/// Fails if the level cannot be parsed or a subscriber is already installed.
pub fn init(format: LogFormat, default_level: &str) -> Result<(), TelemetryError> {
    let filter = env_filter(default_level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| TelemetryError::Install(e.to_string()))?;

    debug!(format = ?format, "tracing initialised");
    Ok(())
}
