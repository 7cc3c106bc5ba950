//! Shared configuration for the filestate resource handler.
//!
//! The handler is invoked once per operation by an orchestrating caller that
//! passes its parameters through environment variables. [`HandlerConfig`]
//! captures those parameters in one explicit value, populated at startup from
//! an [`EnvSource`], so the dispatcher never consults ambient process state.
//!
//! The caller exports `id_key=<name>` alongside `<name>=<identifier>`; the
//! value of `id_key` therefore decides both which variable holds the
//! identifier and which response key reports a freshly created one.

mod defaults;
mod env;
mod logging;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use defaults::{
    DEFAULT_ID_KEY, DEFAULT_LOG_FILTER, ID_KEY_VAR, LOG_FILTER_VAR, LOG_FORMAT_VAR, SCRIPT_VAR,
    STATE_DIR_VAR, default_log_filter, default_log_format, default_state_dir,
};
pub use env::{EnvSource, ProcessEnv};
pub use logging::{LogFormat, LogFormatParseError};

/// Parameters for one handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    id_key: String,
    identifier: Option<String>,
    script: String,
    state_dir: PathBuf,
    log_filter: String,
    log_format: LogFormat,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            id_key: DEFAULT_ID_KEY.to_owned(),
            identifier: None,
            script: String::new(),
            state_dir: default_state_dir(),
            log_filter: default_log_filter().to_owned(),
            log_format: default_log_format(),
        }
    }
}

impl HandlerConfig {
    /// Populates the configuration from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BlankIdKey`] when `id_key` is set to whitespace
    /// and [`ConfigError::LogFormat`] when the log format is not recognised.
    pub fn from_env(source: &impl EnvSource) -> Result<Self, ConfigError> {
        let id_key = match source.var(ID_KEY_VAR) {
            Some(value) if value.trim().is_empty() => return Err(ConfigError::BlankIdKey),
            Some(value) => value,
            None => DEFAULT_ID_KEY.to_owned(),
        };

        let identifier = source.var(&id_key).filter(|value| !value.is_empty());
        let script = source.var(SCRIPT_VAR).unwrap_or_default();
        let state_dir = source
            .var(STATE_DIR_VAR)
            .filter(|value| !value.is_empty())
            .map_or_else(default_state_dir, PathBuf::from);
        let log_filter = source
            .var(LOG_FILTER_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default_log_filter().to_owned());
        let log_format = match source.var(LOG_FORMAT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<LogFormat>()
                .map_err(|source| ConfigError::LogFormat { raw, source })?,
            None => default_log_format(),
        };

        Ok(Self {
            id_key,
            identifier,
            script,
            state_dir,
            log_filter,
            log_format,
        })
    }

    /// Replaces the identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into()).filter(|value| !value.is_empty());
        self
    }

    /// Replaces the naming hint.
    #[must_use]
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = script.into();
        self
    }

    /// Replaces the directory that receives newly allocated files.
    #[must_use]
    pub fn with_state_dir(mut self, state_dir: impl Into<PathBuf>) -> Self {
        self.state_dir = state_dir.into();
        self
    }

    /// Name of the identifier variable and of the identifier response key.
    pub fn id_key(&self) -> &str {
        &self.id_key
    }

    /// Identifier supplied by the caller, if any.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Naming hint for `create`; empty when the caller supplied none.
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Directory in which new backing files are allocated.
    pub fn state_dir(&self) -> &Path {
        self.state_dir.as_path()
    }

    /// Log filter expression for the tracing subscriber.
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

/// Errors raised while reading handler parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `id_key` was present but blank.
    #[error("environment variable 'id_key' must not be blank")]
    BlankIdKey,
    /// The log format was not one of the supported values.
    #[error("invalid log format '{raw}' in 'FILESTATE_LOG_FORMAT': {source}")]
    LogFormat {
        /// Raw value supplied by the caller.
        raw: String,
        /// Underlying parse error.
        #[source]
        source: LogFormatParseError,
    },
}
