use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::SpecStorage;
use crate::error::StoreError;

const EXTENSION: &str = "json";

/// One `<slug>.json` file per specification in a flat directory.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Use `root` as the storage directory, creating it if it does not exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }
}

impl SpecStorage for FsStorage {
    fn list_slugs(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let slugs = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(String::from)
            })
            .collect();
        Ok(slugs)
    }

    fn read(&self, slug: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.location(slug)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, slug: &str, contents: &str) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.root)?;
        let path = self.location(slug);
        fs::write(&path, contents)?;
        Ok(path)
    }

    fn delete(&self, slug: &str) -> Result<bool, StoreError> {
        match fs::remove_file(self.location(slug)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn location(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{slug}.{EXTENSION}"))
    }

    fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("a").join("b");
        let storage = FsStorage::new(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(storage.location("x"), root.join("x.json"));
    }

    #[test]
    fn test_read_write_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path()).unwrap();

        assert!(storage.read("missing").unwrap().is_none());
        storage.write("one", "{}\n").unwrap();
        assert_eq!(storage.read("one").unwrap().as_deref(), Some("{}\n"));

        assert!(storage.delete("one").unwrap());
        assert!(!storage.delete("one").unwrap());
    }

    #[test]
    fn test_list_only_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path()).unwrap();
        storage.write("b", "{}").unwrap();
        storage.write("a", "{}").unwrap();
        fs::write(dir.path().join("readme.md"), "x").unwrap();
        fs::create_dir(dir.path().join("dir.json")).unwrap();

        let mut slugs = storage.list_slugs().unwrap();
        slugs.sort();
        assert_eq!(slugs, vec!["a", "b"]);
    }
}
