//! Persistence adapter
//!
//! The core only needs an opaque key-value blob store. `MemoryStore` backs
//! tests and headless runs; `FileStore` writes one JSON file per key.

pub mod save;

pub use save::{load_game, save_game, LoadOutcome, SaveGame, SAVE_KEY, SAVE_VERSION};

use ahash::AHashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{ExploreError, Result};

/// Opaque string storage keyed by name
pub trait BlobStore {
    fn save_blob(&mut self, key: &str, value: &str) -> Result<()>;

    /// `Ok(None)` when nothing is stored under `key`
    fn load_blob(&self, key: &str) -> Result<Option<String>>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    blobs: AHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl BlobStore for MemoryStore {
    fn save_blob(&mut self, key: &str, value: &str) -> Result<()> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load_blob(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }
}

/// Stores each blob at `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9._-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl BlobStore for FileStore {
    fn save_blob(&mut self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(ExploreError::Storage("empty blob key".into()));
        }
        fs::create_dir_all(&self.dir)?;

        // Write beside the target, then rename over it
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved blob {:?} to {:?}", key, path);
        Ok(())
    }

    fn load_blob(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
