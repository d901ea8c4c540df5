//! Object store abstraction used by the CDN sync.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::{ModkitError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Created,
    /// The key was taken by the time the upload landed.
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteObject {
    pub name: String,
    pub size: u64,
}

/// Flat key/value blob storage.
pub trait ObjectStore {
    fn exists(&self, key: &str) -> Result<bool>;

    /// Upload `path` under `key` unless the key is already present.
    fn upload_file(&self, key: &str, path: &Path) -> Result<PutOutcome>;

    /// All objects whose key starts with `prefix`, sorted by key.
    fn list(&self, prefix: &str) -> Result<Vec<RemoteObject>>;
}

/// In-process store, handy for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RefCell<BTreeMap<String, Vec<u8>>>,
    uploads: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.objects.borrow_mut().insert(key.into(), bytes.into());
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.borrow().is_empty()
    }

    /// Number of successful `upload_file` calls that created an object.
    pub fn upload_count(&self) -> usize {
        self.uploads.get()
    }
}

impl ObjectStore for MemoryStore {
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.objects.borrow().contains_key(key))
    }

    fn upload_file(&self, key: &str, path: &Path) -> Result<PutOutcome> {
        if self.objects.borrow().contains_key(key) {
            return Ok(PutOutcome::AlreadyExists);
        }
        let bytes = std::fs::read(path).map_err(ModkitError::fs("read", path))?;
        self.objects.borrow_mut().insert(key.to_string(), bytes);
        self.uploads.set(self.uploads.get() + 1);
        Ok(PutOutcome::Created)
    }

    fn list(&self, prefix: &str) -> Result<Vec<RemoteObject>> {
        Ok(self
            .objects
            .borrow()
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, bytes)| RemoteObject {
                name: name.clone(),
                size: bytes.len() as u64,
            })
            .collect())
    }
}
