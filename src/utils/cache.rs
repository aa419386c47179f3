//! Key-value caching with expiry for fetched metadata.
//!
//! Two stores implement [`KeyValueStore`]:
//!
//! - [`MemoryStore`]: process-local, for tests and one-shot runs
//! - [`FileStore`]: one JSON file per key under a cache directory
//!
//! ```text
//! ~/.cache/doi-cite/
//!   metadata/
//!     <md5 of key>.json
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use crate::config::CacheConfig;

/// Result of a cache lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    /// Item was found and is valid
    Hit(T),

    /// Item was not found
    Miss,

    /// Item was found but has expired
    Expired,
}

impl<T> CacheResult<T> {
    /// The cached value, if it is still valid
    pub fn hit(self) -> Option<T> {
        match self {
            CacheResult::Hit(value) => Some(value),
            CacheResult::Miss | CacheResult::Expired => None,
        }
    }
}

/// A string key-value store whose entries expire
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    fn get(&self, key: &str) -> CacheResult<String>;

    fn set(&self, key: &str, value: &str, ttl: Duration);

    fn remove(&self, key: &str);
}

/// Envelope stored with each cached value
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    /// Original key, kept for inspection of cache files
    key: String,

    /// When the item was cached (Unix timestamp)
    cached_at: u64,

    /// When the item expires (Unix timestamp)
    expires_at: u64,

    value: String,
}

impl CacheEntry {
    fn new(key: &str, value: &str, ttl: Duration) -> Self {
        let now = unix_now();
        Self {
            key: key.to_string(),
            cached_at: now,
            expires_at: now.saturating_add(ttl.as_secs()),
            value: value.to_string(),
        }
    }

    fn is_expired(&self) -> bool {
        unix_now() >= self.expires_at
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CacheResult<String> {
        let Ok(entries) = self.entries.lock() else {
            return CacheResult::Miss;
        };
        match entries.get(key) {
            Some(entry) if entry.is_expired() => CacheResult::Expired,
            Some(entry) => CacheResult::Hit(entry.value.clone()),
            None => CacheResult::Miss,
        }
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), CacheEntry::new(key, value, ttl));
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// File-backed store; write failures are logged and otherwise ignored
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::debug!("Cache initialized at: {}", dir.display());
        Ok(Self { dir })
    }

    /// Open the metadata store described by the `[cache]` configuration
    pub fn from_config(config: &CacheConfig) -> std::io::Result<Self> {
        let base = config
            .directory
            .clone()
            .unwrap_or_else(crate::config::default_cache_dir);
        Self::open(base.join("metadata"))
    }

    /// Directory holding the cache files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let digest = md5::compute(key.as_bytes());
        self.dir.join(format!("{:x}.json", digest))
    }

    fn read_entry(&self, path: &Path) -> Option<CacheEntry> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> CacheResult<String> {
        match self.read_entry(&self.path_for(key)) {
            Some(entry) if entry.is_expired() => {
                tracing::debug!("Cache expired for key: {}", key);
                CacheResult::Expired
            }
            Some(entry) => {
                tracing::debug!("Cache HIT for key: {}", key);
                CacheResult::Hit(entry.value)
            }
            None => {
                tracing::debug!("Cache MISS for key: {}", key);
                CacheResult::Miss
            }
        }
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) {
        let entry = CacheEntry::new(key, value, ttl);
        let result = serde_json::to_string(&entry)
            .map_err(std::io::Error::other)
            .and_then(|json| fs::write(self.path_for(key), json));

        if let Err(e) = result {
            tracing::warn!("Failed to write cache entry for {}: {}", key, e);
        }
    }

    fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.path_for(key));
    }
}
