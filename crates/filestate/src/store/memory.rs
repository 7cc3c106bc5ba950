//! In-memory resource store used in tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use super::{ResourceStore, StoreError};

/// Keeps records in a map keyed by identifier.
///
/// Identifiers come from a counter that never goes backwards, so an
/// identifier is never handed out twice even after its record is removed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, Vec<u8>>>,
    next: Cell<u64>,
    read_only: bool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects every allocation and write.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// Inserts a record directly, bypassing allocation.
    pub fn insert(&self, identifier: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries
            .borrow_mut()
            .insert(identifier.into(), bytes.into());
    }

    /// Returns a copy of the stored bytes for `identifier`.
    pub fn get(&self, identifier: &str) -> Option<Vec<u8>> {
        self.entries.borrow().get(identifier).cloned()
    }

    /// Reports whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn reject(&self, identifier: &str) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::NotWritable {
                identifier: identifier.to_owned(),
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "memory store is read-only",
                ),
            });
        }
        Ok(())
    }
}

impl ResourceStore for MemoryStore {
    fn allocate(&self, hint: &str) -> Result<String, StoreError> {
        self.reject(hint)?;
        let sequence = self.next.get();
        self.next.set(sequence.saturating_add(1));
        let prefix = if hint.is_empty() { "resource" } else { hint };
        let identifier = format!("memory://{prefix}-{sequence}");
        self.insert(identifier.clone(), Vec::new());
        Ok(identifier)
    }

    fn write(&self, identifier: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.reject(identifier)?;
        self.insert(identifier, bytes);
        Ok(())
    }

    fn read_all(&self, identifier: &str) -> Result<Vec<u8>, StoreError> {
        self.get(identifier).ok_or_else(|| StoreError::NotFound {
            identifier: identifier.to_owned(),
        })
    }

    fn remove(&self, identifier: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .remove(identifier)
            .map(drop)
            .ok_or_else(|| StoreError::NotFound {
                identifier: identifier.to_owned(),
            })
    }

    fn exists(&self, identifier: &str) -> bool {
        !identifier.is_empty() && self.entries.borrow().contains_key(identifier)
    }
}
