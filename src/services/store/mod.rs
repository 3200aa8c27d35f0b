//! Persistence of search specifications as named JSON documents.
//!
//! Documents are keyed by a slug derived from the display name and live in a
//! single flat directory (`<config_dir>/ckfind/specs/<slug>.json` by default).
//! The backing storage is a trait so tests and embedders can swap it out.

mod fs;
mod memory;

pub use fs::FsStorage;
pub use memory::MemoryStorage;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::models::{Config, SavedSpecification, Specification};
use crate::utils::text::slugify;

/// Display name used when a specification is saved without one.
pub const UNNAMED: &str = "Unnamed";

/// Raw document storage keyed by slug.
pub trait SpecStorage: Send + Sync {
    /// Slugs of every stored document, in no particular order.
    fn list_slugs(&self) -> Result<Vec<String>, StoreError>;

    /// Contents of the document, `None` when it does not exist.
    fn read(&self, slug: &str) -> Result<Option<String>, StoreError>;

    /// Create or replace a document and return its location.
    fn write(&self, slug: &str, contents: &str) -> Result<PathBuf, StoreError>;

    /// Delete a document, returning whether it existed.
    fn delete(&self, slug: &str) -> Result<bool, StoreError>;

    /// Where the document for `slug` lives (or would live).
    fn location(&self, slug: &str) -> PathBuf;

    /// Root of the storage.
    fn root(&self) -> &Path;
}

/// Trim surrounding whitespace from a user-supplied specification name.
pub fn normalize_spec_name(name: &str) -> String {
    name.trim().to_string()
}

/// Serialize a specification the way it is stored on disk.
pub fn export_json(spec: &Specification) -> Result<String, StoreError> {
    let mut json = serde_json::to_string_pretty(spec)?;
    json.push('\n');
    Ok(json)
}

/// Repository of saved specifications.
pub struct SpecStore<S = FsStorage> {
    storage: S,
}

impl SpecStore<FsStorage> {
    /// Open the filesystem store rooted at `dir`, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Ok(Self::new(FsStorage::new(dir)?))
    }

    /// Open the store configured in `config`.
    pub fn from_config(config: &Config) -> Result<Self, crate::error::AppError> {
        let dir = config.specs_dir()?;
        Ok(Self::open(dir)?)
    }
}

impl<S: SpecStorage> SpecStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage_dir(&self) -> &Path {
        self.storage.root()
    }

    /// Every readable stored specification, sorted by display name.
    ///
    /// Documents that fail to parse are skipped.
    pub fn list(&self) -> Result<Vec<SavedSpecification>, StoreError> {
        let mut saved = Vec::new();

        for slug in self.storage.list_slugs()? {
            let Some(spec) = self.read_spec(&slug) else {
                continue;
            };

            let name = spec.spec_name.trim();
            saved.push(SavedSpecification {
                name: if name.is_empty() {
                    slug.clone()
                } else {
                    name.to_string()
                },
                path: self.storage.location(&slug),
                slug,
            });
        }

        saved.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.slug.cmp(&b.slug)));
        Ok(saved)
    }

    /// Load by slug first, then by exact display name.
    pub fn load(&self, name_or_slug: &str) -> Result<Option<Specification>, StoreError> {
        let Some(slug) = self.resolve(name_or_slug)? else {
            return Ok(None);
        };
        Ok(self.read_spec(&slug))
    }

    /// Save `spec` under `name`, or under its own name when `name` is `None`.
    ///
    /// The stored copy carries the display name, has its text fields
    /// truncated to their limits and always has at least one action.
    pub fn save(
        &self,
        spec: &Specification,
        name: Option<&str>,
    ) -> Result<SavedSpecification, StoreError> {
        let display_name = match name {
            Some(name) => {
                let name = normalize_spec_name(name);
                if name.is_empty() {
                    return Err(StoreError::InvalidName(name));
                }
                name
            }
            None => {
                let name = normalize_spec_name(&spec.spec_name);
                if name.is_empty() {
                    UNNAMED.to_string()
                } else {
                    name
                }
            }
        };

        let mut to_save = spec.clone();
        to_save.spec_name = display_name;
        to_save.enforce_limits();
        to_save.action_options.ensure_print();

        let slug = slugify(&to_save.spec_name);
        let path = self.storage.write(&slug, &export_json(&to_save)?)?;
        debug!(slug = %slug, path = %path.display(), "saved specification");

        Ok(SavedSpecification {
            name: to_save.spec_name,
            slug,
            path,
        })
    }

    /// Remove by slug first, then by exact display name.
    ///
    /// The slug document is deleted even when it no longer parses, since
    /// [`SpecStore::list`] hides such documents.
    pub fn remove(&self, name_or_slug: &str) -> Result<bool, StoreError> {
        let trimmed = normalize_spec_name(name_or_slug);
        if trimmed.is_empty() {
            return Ok(false);
        }

        if self.storage.delete(&slugify(&trimmed))? {
            return Ok(true);
        }

        match self.find_by_name(&trimmed)? {
            Some(slug) => self.storage.delete(&slug),
            None => Ok(false),
        }
    }

    /// Read a specification document from anywhere on disk and save it.
    pub fn import_file(
        &self,
        path: &Path,
        name: Option<&str>,
    ) -> Result<SavedSpecification, StoreError> {
        let contents = std::fs::read_to_string(path)?;
        let spec: Specification = serde_json::from_str(&contents)?;
        self.save(&spec, name)
    }

    /// Find the slug of an existing document for a name or slug.
    fn resolve(&self, name_or_slug: &str) -> Result<Option<String>, StoreError> {
        let trimmed = normalize_spec_name(name_or_slug);
        if trimmed.is_empty() {
            return Ok(None);
        }

        let slug = slugify(&trimmed);
        if self.read_spec(&slug).is_some() {
            return Ok(Some(slug));
        }

        self.find_by_name(&trimmed)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|saved| saved.name == name)
            .map(|saved| saved.slug))
    }

    /// Parse a stored document, logging and skipping unreadable ones.
    fn read_spec(&self, slug: &str) -> Option<Specification> {
        let contents = match self.storage.read(slug) {
            Ok(Some(contents)) => contents,
            Ok(None) => return None,
            Err(e) => {
                warn!(slug, error = %e, "failed to read stored specification");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(spec) => Some(spec),
            Err(e) => {
                warn!(slug, error = %e, "skipping corrupt specification");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TextMatchMode;

    fn memory_store() -> SpecStore<MemoryStorage> {
        SpecStore::new(MemoryStorage::new())
    }

    #[test]
    fn test_save_then_load_by_name_and_slug() {
        let store = memory_store();
        let mut spec = Specification::new("/srv").with_search_text("todo");
        spec.text_options.mode = TextMatchMode::WholeWord;

        let saved = store.save(&spec, Some("My Spec")).unwrap();
        assert_eq!(saved.name, "My Spec");
        assert_eq!(saved.slug, "my-spec");

        let by_name = store.load("My Spec").unwrap().unwrap();
        let by_slug = store.load("my-spec").unwrap().unwrap();
        assert_eq!(by_name, by_slug);
        assert_eq!(by_name.spec_name, "My Spec");
        assert_eq!(by_name.start_location, "/srv");
        assert_eq!(by_name.text_options.mode, TextMatchMode::WholeWord);

        let expected = spec.clone().with_name("My Spec");
        assert_eq!(by_name, expected);
    }

    #[test]
    fn test_load_by_display_name_when_slug_differs() {
        let storage = MemoryStorage::new();
        let spec = Specification::default().with_name("Weird / Name");
        storage
            .write("legacy-key", &export_json(&spec).unwrap())
            .unwrap();
        let store = SpecStore::new(storage);

        let loaded = store.load("Weird / Name").unwrap().unwrap();
        assert_eq!(loaded.spec_name, "Weird / Name");
        assert!(store.load("nothing").unwrap().is_none());
        assert!(store.load("   ").unwrap().is_none());
    }

    #[test]
    fn test_save_uses_spec_name_or_unnamed() {
        let store = memory_store();
        let saved = store
            .save(&Specification::default().with_name("  Logs  "), None)
            .unwrap();
        assert_eq!(saved.name, "Logs");
        assert_eq!(saved.slug, "logs");

        let saved = store.save(&Specification::default(), None).unwrap();
        assert_eq!(saved.name, UNNAMED);
        assert_eq!(saved.slug, "unnamed");
    }

    #[test]
    fn test_save_rejects_blank_name() {
        let store = memory_store();
        let err = store.save(&Specification::default(), Some("   ")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_save_forces_print_and_limits() {
        let store = memory_store();
        let mut spec = Specification::default();
        spec.action_options.print = false;
        spec.search_text = "x".repeat(1000);

        store.save(&spec, Some("quiet")).unwrap();
        let loaded = store.load("quiet").unwrap().unwrap();
        assert!(loaded.action_options.print);
        assert_eq!(loaded.search_text.len(), crate::models::limits::TEXT);
    }

    #[test]
    fn test_list_sorted_and_skips_corrupt() {
        let storage = MemoryStorage::new();
        storage.write("broken", "{ not json").unwrap();
        storage.write("no-name", "{}").unwrap();
        let store = SpecStore::new(storage);
        store.save(&Specification::default(), Some("Zeta")).unwrap();
        store.save(&Specification::default(), Some("Alpha")).unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Alpha", "Zeta", "no-name"]);
    }

    #[test]
    fn test_remove() {
        let store = memory_store();
        store.save(&Specification::default(), Some("Temp Spec")).unwrap();

        assert!(store.remove("Temp Spec").unwrap());
        assert!(!store.remove("temp-spec").unwrap());
        assert!(!store.remove("").unwrap());
        assert!(store.load("temp-spec").unwrap().is_none());
    }

    #[test]
    fn test_remove_by_display_name_when_slug_differs() {
        let storage = MemoryStorage::new();
        let spec = Specification::default().with_name("Weird / Name");
        storage
            .write("legacy-key", &export_json(&spec).unwrap())
            .unwrap();
        let store = SpecStore::new(storage);

        assert!(store.remove("Weird / Name").unwrap());
        assert!(store.list().unwrap().is_empty());
        assert!(!store.remove("Weird / Name").unwrap());
    }

    #[test]
    fn test_remove_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = SpecStore::open(dir.path()).unwrap();
        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();

        assert!(store.list().unwrap().is_empty());
        assert!(store.remove("broken").unwrap());
        assert!(!broken.exists());
    }

    #[test]
    fn test_normalize_spec_name() {
        assert_eq!(normalize_spec_name("  Logs \n"), "Logs");
        assert_eq!(normalize_spec_name(" \t "), "");
    }

    #[test]
    fn test_export_json_format() {
        let json = export_json(&Specification::default().with_name("A")).unwrap();
        assert!(json.ends_with("}\n"));
        assert!(json.contains("\n  \"specName\": \"A\""));
    }

    #[test]
    fn test_filesystem_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("specs");
        let store = SpecStore::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(store.storage_dir(), root.as_path());

        let saved = store
            .save(&Specification::new("/var/log"), Some("Var Logs"))
            .unwrap();
        assert_eq!(saved.path, root.join("var-logs.json"));
        assert!(saved.path.is_file());

        std::fs::write(root.join("corrupt.json"), "[1, 2").unwrap();
        std::fs::write(root.join("notes.txt"), "ignored").unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Var Logs");
        assert_eq!(listed[0].path, saved.path);

        let loaded = store.load("var-logs").unwrap().unwrap();
        assert_eq!(loaded.start_location, "/var/log");
    }

    #[test]
    fn test_import_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("shared.json");
        std::fs::write(
            &source,
            r#"{"specName": "Shared", "searchText": "fixme", "textOptions": {"mode": 7}}"#,
        )
        .unwrap();

        let store = memory_store();
        let saved = store.import_file(&source, None).unwrap();
        assert_eq!(saved.slug, "shared");

        let loaded = store.load("Shared").unwrap().unwrap();
        assert_eq!(loaded.search_text, "fixme");
        assert_eq!(loaded.text_options.mode, TextMatchMode::Contains);

        let renamed = store.import_file(&source, Some("Copy")).unwrap();
        assert_eq!(renamed.slug, "copy");
    }
}
