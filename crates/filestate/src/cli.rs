//! Command-line interface definition for the handler binary.

use clap::Parser;

/// File-backed CRUD resource handler.
///
/// Reads resource attributes as JSON on stdin, parameters from the
/// environment, and writes one JSON line (or `true`/`false`) to stdout.
#[derive(Parser, Debug)]
#[command(name = "filestate", version)]
pub(crate) struct Cli {
    /// One of `create`, `read`, `update`, `delete` or `exists`.
    #[arg(value_name = "EVENT")]
    pub(crate) event: String,
}
