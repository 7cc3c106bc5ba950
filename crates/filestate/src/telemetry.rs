//! Stderr logging for a single handler invocation.
//!
//! Stdout belongs to the protocol response, so every log event goes to
//! stderr. Compact lines omit the timestamp and target; JSON records keep an
//! RFC 3339 UTC time for whatever collects the orchestrator's stderr.

use std::io::{self, IsTerminal};

use filestate_config::{HandlerConfig, LogFormat};
use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, time::UtcTime};

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Errors encountered while configuring logging.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// `FILESTATE_LOG_FILTER` held an unparsable directive.
    #[error("invalid log filter '{filter}': {message}")]
    Filter {
        /// Filter expression as configured.
        filter: String,
        /// Parser diagnostic.
        message: String,
    },
    /// Another global subscriber was already installed.
    #[error("failed to install log subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the stderr subscriber once per process.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for an unparsable filter expression
/// and [`TelemetryError::Subscriber`] if another subscriber is installed.
pub fn initialise(config: &HandlerConfig) -> Result<(), TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| {
            let subscriber = build_subscriber(config)?;
            tracing::subscriber::set_global_default(subscriber)
                .map_err(TelemetryError::Subscriber)
        })
        .map(|_| ())
}

pub(crate) fn build_subscriber(
    config: &HandlerConfig,
) -> Result<Box<dyn Subscriber + Send + Sync>, TelemetryError> {
    let filter =
        EnvFilter::try_new(config.log_filter()).map_err(|error| TelemetryError::Filter {
            filter: config.log_filter().to_owned(),
            message: error.to_string(),
        })?;

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal());

    Ok(match config.log_format() {
        LogFormat::Json => Box::new(
            builder
                .with_timer(UtcTime::rfc_3339())
                .json()
                .flatten_event(true)
                .finish(),
        ),
        LogFormat::Compact => Box::new(
            builder
                .without_time()
                .with_target(false)
                .compact()
                .finish(),
        ),
    })
}
