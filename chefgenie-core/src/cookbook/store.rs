//! Key-value storage backends for the cookbook.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StoreError;

/// Default quota, matching the typical browser local storage budget.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// A small, synchronous, quota-limited string store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value under `key`. Fails with [`StoreError::QuotaExceeded`]
    /// if the store would grow past its limit.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores each key as a file in one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota_bytes: Option<usize>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
        }
    }

    /// Set the total size limit across all keys. `None` disables it.
    pub fn with_quota(mut self, quota_bytes: Option<usize>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    /// Store configured from the environment.
    ///
    /// - `CHEFGENIE_DATA_DIR`: directory (default: "~/.chefgenie")
    /// - `CHEFGENIE_STORAGE_QUOTA_BYTES`: quota in bytes, 0 for unlimited
    pub fn from_env() -> Self {
        let dir = std::env::var("CHEFGENIE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_dir());

        let quota = std::env::var("CHEFGENIE_STORAGE_QUOTA_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|q| if q == 0 { None } else { Some(q) })
            .unwrap_or(Some(DEFAULT_QUOTA_BYTES));

        Self::new(dir).with_quota(quota)
    }

    /// Get the default data directory: ~/.chefgenie
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".chefgenie"))
            .unwrap_or_else(|| PathBuf::from("data/chefgenie"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }

    /// Bytes used by every key other than `key`.
    fn usage_excluding(&self, key: &str) -> Result<usize, StoreError> {
        if !self.dir.exists() {
            return Ok(0);
        }
        let own = self.key_path(key);
        let mut total = 0usize;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path == own || path.extension().map(|ext| ext != "json").unwrap_or(true) {
                continue;
            }
            total += fs::metadata(&path)?.len() as usize;
        }
        Ok(total)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(limit) = self.quota_bytes {
            let needed = self.usage_excluding(key)? + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded { needed, limit });
            }
        }

        fs::create_dir_all(&self.dir)?;

        // Readers never see a partially written value
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory store, mostly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.lock();
        if let Some(limit) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            let needed = others + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded { needed, limit });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
