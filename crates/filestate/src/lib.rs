//! File-backed CRUD resource handler.
//!
//! An orchestrating caller invokes the handler once per operation as
//! `filestate <event>`, exporting the resource identifier and naming hint as
//! environment variables and piping resource attributes as JSON on stdin.
//! The handler performs exactly one storage operation and writes exactly one
//! line to stdout: a JSON object, or the bare literal `true`/`false` for
//! `exists`. Any failure exits non-zero with nothing on stdout.
//!
//! Each resource is a single file whose path is its identifier. The pieces
//! are kept separate so they can be exercised on their own:
//!
//! - [`dispatch`] routes an [`Event`] to one store operation.
//! - [`store`] defines the [`ResourceStore`] capability and the file-backed
//!   [`FileStore`].
//! - [`codec`] decodes request bodies and stored records and encodes the
//!   [`Response`].

mod cli;
pub mod codec;
pub mod dispatch;
mod errors;
pub mod store;
pub mod telemetry;


use std::ffi::OsString;
use std::io::{Read, Write};
use std::process::ExitCode;

use clap::Parser;
use filestate_config::{EnvSource, HandlerConfig};
use tracing::error;

use crate::cli::Cli;
pub use codec::{Attributes, CodecError, Response};
pub use dispatch::{CREATED_KEY, Clock, Dispatcher, Event, SystemClock};
pub use errors::HandlerError;
#[cfg(any(test, feature = "test-support"))]
pub use store::MemoryStore;
pub use store::{FileStore, ResourceStore, StoreError};
pub use telemetry::TelemetryError;

/// Runs one invocation against the file-backed store configured in `config`.
///
/// # Errors
///
/// Returns [`HandlerError::UnrecognizedEvent`] for an unknown event and any
/// error raised by the dispatched operation.
pub fn handle(
    event: &str,
    config: &HandlerConfig,
    stdin: &mut impl Read,
    stdout: &mut impl Write,
) -> Result<(), HandlerError> {
    let event = Event::parse(event)?;
    let store = FileStore::new(config.state_dir());
    Dispatcher::new(config, &store).dispatch(event, stdin, stdout)
}

/// Runs the handler binary with the given arguments, environment and streams.
///
/// Usage errors and handler failures are reported on `stderr` and yield
/// [`ExitCode::FAILURE`]; `stdout` only ever receives a complete response.
pub fn run<I, R, W, E>(
    args: I,
    env: &impl EnvSource,
    stdin: &mut R,
    stdout: &mut W,
    stderr: &mut E,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(usage) if usage.use_stderr() => {
            write!(stderr, "{usage}").ok();
            return ExitCode::FAILURE;
        }
        Err(info) => {
            write!(stdout, "{info}").ok();
            return ExitCode::SUCCESS;
        }
    };

    let result = HandlerConfig::from_env(env)
        .map_err(HandlerError::from)
        .and_then(|config| {
            telemetry::initialise(&config)?;
            handle(&cli.event, &config, stdin, stdout).inspect_err(|failure| {
                error!(target: "filestate", event = %cli.event, error = %failure, "invocation failed");
            })
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            writeln!(stderr, "{failure}").ok();
            ExitCode::FAILURE
        }
    }
}
