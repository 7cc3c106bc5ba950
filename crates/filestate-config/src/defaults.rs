use std::env;
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Environment variable naming the variable that carries the identifier.
pub const ID_KEY_VAR: &str = "id_key";

/// Identifier variable used when the caller does not export `id_key`.
pub const DEFAULT_ID_KEY: &str = "filename";

/// Environment variable carrying the file naming hint for `create`.
pub const SCRIPT_VAR: &str = "script";

/// Environment variable overriding the directory that receives new files.
pub const STATE_DIR_VAR: &str = "FILESTATE_STATE_DIR";

/// Environment variable holding the log filter expression.
pub const LOG_FILTER_VAR: &str = "FILESTATE_LOG_FILTER";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_VAR: &str = "FILESTATE_LOG_FORMAT";

/// `EnvFilter` directive applied when `FILESTATE_LOG_FILTER` is unset.
///
/// Only warnings and errors reach stderr unless the caller asks for more.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Returns [`DEFAULT_LOG_FILTER`].
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format for the binary.
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Directory in which `create` allocates backing files by default.
pub fn default_state_dir() -> PathBuf {
    env::temp_dir()
}
