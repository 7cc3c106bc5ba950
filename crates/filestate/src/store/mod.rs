//! Resource store capability and its implementations.
//!
//! A resource record exists if and only if its backing entry exists in the
//! store. The dispatcher only talks to the [`ResourceStore`] trait, so the
//! file-backed store can be swapped for an in-memory one in tests.

mod file;
#[cfg(any(test, feature = "test-support"))]
mod memory;

use std::path::PathBuf;

use thiserror::Error;

pub use file::FileStore;
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryStore;

/// Narrow storage capability used by the dispatcher.
pub trait ResourceStore {
    /// Allocates a new, uniquely named, empty backing entry and returns its
    /// identifier. `hint` biases the generated name and may be empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotWritable`] if the entry cannot be created.
    fn allocate(&self, hint: &str) -> Result<String, StoreError>;

    /// Replaces the entire content of the entry at `identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotWritable`] if the entry cannot be opened for
    /// writing.
    fn write(&self, identifier: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Returns the full content of the entry at `identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no entry exists.
    fn read_all(&self, identifier: &str) -> Result<Vec<u8>, StoreError>;

    /// Deletes the entry at `identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no entry exists.
    fn remove(&self, identifier: &str) -> Result<(), StoreError>;

    /// Reports whether an entry exists. An empty identifier never exists.
    fn exists(&self, identifier: &str) -> bool;
}

/// Errors raised by resource store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No backing entry exists for the identifier.
    #[error("resource '{identifier}' does not exist")]
    NotFound {
        /// Identifier that was looked up.
        identifier: String,
    },
    /// The backing entry could not be created or opened for writing.
    #[error("resource '{identifier}' is not writable: {source}")]
    NotWritable {
        /// Identifier (or directory) being written.
        identifier: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Any other I/O failure.
    #[error("i/o error on resource '{identifier}': {source}")]
    Io {
        /// Identifier being accessed.
        identifier: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Classifies an I/O error raised while reading or removing an entry.
    pub(crate) fn from_access(identifier: &str, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound {
                identifier: identifier.to_owned(),
            },
            _ => Self::Io {
                identifier: identifier.to_owned(),
                source,
            },
        }
    }

    pub(crate) fn not_writable(identifier: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::NotWritable {
            identifier: identifier.into().display().to_string(),
            source,
        }
    }
}
