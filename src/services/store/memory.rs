use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::SpecStorage;
use crate::error::StoreError;

/// In-memory storage for tests and embedders that persist elsewhere.
#[derive(Debug)]
pub struct MemoryStorage {
    root: PathBuf,
    documents: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("memory"),
            documents: Mutex::new(HashMap::new()),
        }
    }

    fn documents(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecStorage for MemoryStorage {
    fn list_slugs(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.documents().keys().cloned().collect())
    }

    fn read(&self, slug: &str) -> Result<Option<String>, StoreError> {
        Ok(self.documents().get(slug).cloned())
    }

    fn write(&self, slug: &str, contents: &str) -> Result<PathBuf, StoreError> {
        self.documents()
            .insert(slug.to_string(), contents.to_string());
        Ok(self.location(slug))
    }

    fn delete(&self, slug: &str) -> Result<bool, StoreError> {
        Ok(self.documents().remove(slug).is_some())
    }

    fn location(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{slug}.json"))
    }

    fn root(&self) -> &Path {
        &self.root
    }
}
