//! Error taxonomy for one handler invocation.

use filestate_config::ConfigError;
use thiserror::Error;

use crate::codec::CodecError;
use crate::store::StoreError;
use crate::telemetry::TelemetryError;

/// Errors that abort an invocation.
///
/// None of these are recovered internally; the binary reports the message
/// on stderr and exits with a failure status without writing to stdout.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The event argument named none of the supported operations.
    #[error("unrecognized event '{event}'")]
    UnrecognizedEvent {
        /// The event name as given.
        event: String,
    },
    /// The request body was not a JSON object.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[source] CodecError),
    /// A stored record could not be decoded.
    #[error("stored record '{identifier}' is malformed: {source}")]
    MalformedRecord {
        /// Identifier of the record.
        identifier: String,
        /// Underlying decode error.
        #[source]
        source: CodecError,
    },
    /// The operation requires an identifier and none was supplied.
    #[error("environment variable '{key}' must carry the resource identifier")]
    MissingIdentifier {
        /// Name of the variable expected to hold the identifier.
        key: String,
    },
    /// The targeted backing file does not exist.
    #[error("resource '{identifier}' does not exist")]
    NotFound {
        /// Identifier that was looked up.
        identifier: String,
    },
    /// The backing file could not be created or opened for writing.
    #[error("resource '{identifier}' is not writable: {source}")]
    NotWritable {
        /// Identifier being written.
        identifier: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Any other storage failure.
    #[error("storage failure on '{identifier}': {source}")]
    Io {
        /// Identifier being accessed.
        identifier: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The creation timestamp could not be formatted.
    #[error("failed to format creation timestamp: {0}")]
    Timestamp(#[source] time::error::Format),
    /// Reading the request body failed.
    #[error("failed to read request body: {0}")]
    ReadInput(#[source] std::io::Error),
    /// Writing the response failed.
    #[error("failed to write response: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// The environment carried invalid parameters.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// Logging could not be initialised.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

impl From<StoreError> for HandlerError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { identifier } => Self::NotFound { identifier },
            StoreError::NotWritable { identifier, source } => {
                Self::NotWritable { identifier, source }
            }
            StoreError::Io { identifier, source } => Self::Io { identifier, source },
        }
    }
}
