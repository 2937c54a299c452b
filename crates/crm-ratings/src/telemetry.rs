//! Tracing setup for the rating service.
//!
//! Verbosity resolves in two steps: an explicit `RUST_LOG` wins, otherwise
//! the configured `APP_LOG_LEVEL` becomes the filter. Development keeps
//! human-oriented output with event targets; every other environment emits
//! compact single-line records without ANSI coloring, suited to log
//! collection around the recalculation job.

use std::fmt;

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::{AppEnvironment, TelemetryConfig};

#[derive(Debug)]
pub enum TelemetryError {
    /// The configured level did not parse as a tracing filter directive.
    BadDirective { directive: String, source: ParseError },
    /// A global subscriber was already installed.
    AlreadyInitialized(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::BadDirective { directive, .. } => {
                write!(f, "APP_LOG_LEVEL '{directive}' is not a valid tracing filter")
            }
            TelemetryError::AlreadyInitialized(err) => {
                write!(f, "tracing subscriber installation failed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::BadDirective { source, .. } => Some(source),
            TelemetryError::AlreadyInitialized(err) => Some(&**err),
        }
    }
}

pub fn init(environment: AppEnvironment, config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = resolve_filter(&config.log_level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match environment {
        AppEnvironment::Development => builder.with_target(true).try_init(),
        AppEnvironment::Test | AppEnvironment::Production => builder
            .compact()
            .with_target(false)
            .with_ansi(false)
            .try_init(),
    }
    .map_err(TelemetryError::AlreadyInitialized)
}

fn resolve_filter(configured: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => {
            EnvFilter::try_new(configured).map_err(|source| TelemetryError::BadDirective {
                directive: configured.to_string(),
                source,
            })
        }
    }
}
