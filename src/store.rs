//! `store.rs` - Small key-value store for settings that survive restarts.
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Flat TOML table on disk, rewritten on every `set`.
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content =
                std::fs::read_to_string(&path).context("Failed to read state file")?;
            toml::from_str(&content).context("Failed to parse state file")?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create state directory")?;
        }
        let toml_string =
            toml::to_string_pretty(&self.values).context("Failed to serialize state")?;
        std::fs::write(&self.path, toml_string).context("Failed to write state file")?;

        Ok(())
    }
}

/// Non-persistent store, used when the state file cannot be opened.
#[derive(Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("state.toml");

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("theme"), None);
        store.set("theme", "light").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert!(FileStore::open(&path).is_err());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }
}
