//! Filesystem-backed resource store.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::Builder;
use tracing::debug;

use super::{ResourceStore, StoreError};

const DEFAULT_PREFIX: &str = "resource-";
const SUFFIX: &str = ".json";

/// Stores each resource as one file whose path is its identifier.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store that allocates new files inside `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory in which new files are allocated.
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }
}

/// Turns a naming hint into a safe file name prefix.
///
/// Only the final path component is used so a hint such as `./hello.py`
/// cannot direct the file outside the store root.
fn prefix_for(hint: &str) -> String {
    let name = Path::new(hint)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    if name.is_empty() {
        DEFAULT_PREFIX.to_owned()
    } else {
        format!("{name}-")
    }
}

impl ResourceStore for FileStore {
    fn allocate(&self, hint: &str) -> Result<String, StoreError> {
        let file = Builder::new()
            .prefix(&prefix_for(hint))
            .suffix(SUFFIX)
            .tempfile_in(&self.root)
            .map_err(|source| StoreError::not_writable(&self.root, source))?;
        let (handle, path) = file.keep().map_err(|error| {
            StoreError::not_writable(error.file.path().to_path_buf(), error.error)
        })?;
        handle
            .sync_all()
            .map_err(|source| StoreError::not_writable(&path, source))?;
        drop(handle);

        let identifier = path.display().to_string();
        debug!(target: "filestate::store", identifier = %identifier, "allocated backing file");
        Ok(identifier)
    }

    fn write(&self, identifier: &str, bytes: &[u8]) -> Result<(), StoreError> {
        fs::write(identifier, bytes).map_err(|source| StoreError::not_writable(identifier, source))
    }

    fn read_all(&self, identifier: &str) -> Result<Vec<u8>, StoreError> {
        fs::read(identifier).map_err(|source| StoreError::from_access(identifier, source))
    }

    fn remove(&self, identifier: &str) -> Result<(), StoreError> {
        fs::remove_file(identifier).map_err(|source| StoreError::from_access(identifier, source))
    }

    fn exists(&self, identifier: &str) -> bool {
        !identifier.is_empty() && Path::new(identifier).is_file()
    }
}
