//! Key-value storage
//!
//! A minimal durable store keyed by namespace strings. Values are opaque
//! strings (callers store JSON). Two backends are provided:
//! - [`MemoryStore`] for tests and ephemeral sessions
//! - [`FileStore`] writing one `<key>.json` file per key into a directory

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{SettingsError, SettingsResult};

/// Durable string store addressed by key.
pub trait KeyValueStore {
    /// Reads the value stored under `key`, `None` if absent.
    fn get(&self, key: &str) -> SettingsResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> SettingsResult<()>;

    /// Removes `key`. Returns whether a value was present.
    fn remove(&mut self, key: &str) -> SettingsResult<bool>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> SettingsResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> SettingsResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> SettingsResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}

/// Directory-backed store.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> SettingsResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            SettingsError::ConfigDirectory(format!("{}: {}", root.display(), e))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> SettingsResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(SettingsError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> SettingsResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> SettingsResult<()> {
        let path = self.path_for(key)?;
        // Replaced atomically through a sibling temp file.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        tracing::debug!("stored key '{}' at {}", key, path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> SettingsResult<bool> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
