// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem-backed parse cache.
//!
//! This module provides the parse cache that stores one JSON artifact per
//! cache key under a store directory, and a no-op cache for setups without a
//! store.

use crate::domain::{CacheKey, ConfigError, ConfigMap, Result, SourceStamp};
use crate::ports::ParseCache;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Distinguishes concurrent writers' temporary files within one process.
static WRITE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// On-disk shape of one cache artifact.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// Modification stamp of the source file the payload was parsed from
    mtime: i64,
    payload: ConfigMap,
}

/// Parse cache storing artifacts at `<store>/<domain>/<name>.json`.
///
/// Writes go to a temporary file that is renamed into place, so a concurrent
/// reader sees either the old or the new artifact. There is no locking: two
/// processes caching the same source write equivalent content, so whichever
/// write lands last is fine.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::FsMtimeCache;
/// use layercfg::domain::{CacheKey, ConfigMap, SourceStamp};
/// use layercfg::ports::ParseCache;
///
/// let store = tempfile::tempdir().unwrap();
/// let cache = FsMtimeCache::new(store.path());
/// let key = CacheKey::new(None, "engine", "config");
///
/// cache.set(&key, SourceStamp::new(1), &ConfigMap::new());
/// assert!(cache.get(&key, SourceStamp::new(1)).is_some());
/// assert!(cache.get(&key, SourceStamp::new(2)).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct FsMtimeCache {
    store_dir: PathBuf,
}

impl FsMtimeCache {
    /// Creates a cache rooted at `store_dir`. The directory is created on the
    /// first write.
    pub fn new(store_dir: impl Into<PathBuf>) -> Self {
        Self {
            store_dir: store_dir.into(),
        }
    }

    /// Returns the store directory.
    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Returns the artifact location for `key`.
    pub fn artifact_path(&self, key: &CacheKey) -> PathBuf {
        self.store_dir
            .join(key.domain())
            .join(format!("{}.json", key.name()))
    }

    fn read_entry(&self, key: &CacheKey) -> Result<Option<CacheEntry>> {
        let path = self.artifact_path(key);
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::CacheError {
                    message: format!("Failed to read cache artifact {}", path.display()),
                    source: Some(Box::new(e)),
                })
            }
        };
        serde_json::from_slice(&content)
            .map(Some)
            .map_err(|e| ConfigError::CacheError {
                message: format!("Corrupt cache artifact {}", path.display()),
                source: Some(Box::new(e)),
            })
    }

    fn write_entry(&self, key: &CacheKey, entry: &CacheEntry) -> Result<()> {
        let path = self.artifact_path(key);
        let cache_error = |message: String, e: std::io::Error| ConfigError::CacheError {
            message,
            source: Some(Box::new(e)),
        };

        let dir = self.store_dir.join(key.domain());
        fs::create_dir_all(&dir).map_err(|e| {
            cache_error(format!("Failed to create cache directory {}", dir.display()), e)
        })?;

        let json = serde_json::to_vec(entry).map_err(|e| ConfigError::CacheError {
            message: format!("Failed to serialize cache entry {}", key),
            source: Some(Box::new(e)),
        })?;

        let tmp = dir.join(format!(
            ".{}.{}-{}.tmp",
            key.name(),
            std::process::id(),
            WRITE_SEQUENCE.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&tmp, json)
            .map_err(|e| cache_error(format!("Failed to write {}", tmp.display()), e))?;
        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            cache_error(format!("Failed to move cache artifact to {}", path.display()), e)
        })
    }
}

impl ParseCache for FsMtimeCache {
    fn name(&self) -> &str {
        "fs-mtime"
    }

    fn get(&self, key: &CacheKey, stamp: SourceStamp) -> Option<ConfigMap> {
        match self.read_entry(key) {
            Ok(Some(entry)) if entry.mtime == stamp.as_nanos() => {
                tracing::debug!("Config cache hit for {}", key);
                Some(entry.payload)
            }
            Ok(Some(_)) => {
                tracing::debug!("Config cache stale for {}", key);
                None
            }
            Ok(None) => {
                tracing::debug!("Config cache miss for {}", key);
                None
            }
            Err(e) => {
                tracing::warn!("Ignoring config cache entry {}: {}", key, e);
                None
            }
        }
    }

    fn set(&self, key: &CacheKey, stamp: SourceStamp, payload: &ConfigMap) {
        let entry = CacheEntry {
            mtime: stamp.as_nanos(),
            payload: payload.clone(),
        };
        if let Err(e) = self.write_entry(key, &entry) {
            tracing::warn!("Failed to cache parsed config {}: {}", key, e);
        }
    }
}

/// Parse cache that stores nothing; every lookup is a miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

impl ParseCache for NullCache {
    fn name(&self) -> &str {
        "null"
    }

    fn get(&self, _key: &CacheKey, _stamp: SourceStamp) -> Option<ConfigMap> {
        None
    }

    fn set(&self, _key: &CacheKey, _stamp: SourceStamp, _payload: &ConfigMap) {}
}
