// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compiled artifacts: directly loadable serializations of nested data.
//!
//! `CompiledArtifactCache` memoizes values that have no single originating file
//! (a module manifest, for instance). Artifacts are trusted until removed:
//! there is no freshness check, only the explicit [`CompiledArtifactCache::invalidate`].
//!
//! Like the parse cache, the artifact store is best effort. Filesystem failures
//! are logged and reported as "nothing stored"; only misuse and malformed
//! artifacts reach the caller as errors.

use crate::domain::cache_key::normalize_segment;
use crate::domain::{ConfigError, ConfigValue, Format, Result};
use crate::ports::FileFormatter;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Distinguishes temp files of concurrent writers within one process.
static WRITE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Formatter for compiled artifacts (compact JSON).
#[derive(Debug, Clone, Copy, Default)]
pub struct CompiledArrayFormatter;

impl CompiledArrayFormatter {
    /// Creates a new formatter.
    pub fn new() -> Self {
        CompiledArrayFormatter
    }
}

impl FileFormatter for CompiledArrayFormatter {
    fn format(&self, data: &ConfigValue, pretty: bool) -> Result<String> {
        if !matches!(data, ConfigValue::Map(_) | ConfigValue::List(_)) {
            return Err(ConfigError::misuse(
                "Compiled artifact data must be a map or a list",
            ));
        }
        if pretty {
            return Err(ConfigError::misuse(
                "Pretty mode is not implemented for the compiled artifact formatter",
            ));
        }
        serde_json::to_string(data).map_err(|e| ConfigError::ParseError {
            message: "Failed to serialize compiled artifact".to_string(),
            source: Some(Box::new(e)),
        })
    }

    fn parse_file(&self, path: &Path) -> Result<ConfigValue> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            message: format!("Malformed compiled artifact {}", path.display()),
            source: Some(Box::new(e)),
        })
    }
}

/// Write-through, never-invalidated store of compiled artifacts.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::CompiledArtifactCache;
/// use layercfg::domain::ConfigValue;
///
/// let store = tempfile::tempdir().unwrap();
/// let compiler = CompiledArtifactCache::new(store.path());
///
/// assert!(compiler.parse_artifact("app-libraries").unwrap().is_none());
///
/// let libraries = ConfigValue::List(vec![ConfigValue::from("core")]);
/// assert!(compiler.compile("app-libraries", &libraries).unwrap());
/// assert_eq!(compiler.parse_artifact("app-libraries").unwrap(), Some(libraries));
/// ```
#[derive(Debug, Clone)]
pub struct CompiledArtifactCache {
    dir: PathBuf,
    formatter: CompiledArrayFormatter,
}

impl CompiledArtifactCache {
    /// Creates a cache whose artifacts live in `<store_dir>/compiler`.
    pub fn new(store_dir: impl AsRef<Path>) -> Self {
        Self::with_dir(store_dir.as_ref().join(Format::CompiledArray.cache_kind()))
    }

    /// Creates a cache whose artifacts live directly in `dir`.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            formatter: CompiledArrayFormatter::new(),
        }
    }

    /// Returns the artifact directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the artifact location for `name`.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        let name = normalize_segment(name);
        match Format::CompiledArray.extension() {
            Some(ext) => self.dir.join(format!("{}.{}", name, ext)),
            None => self.dir.join(name),
        }
    }

    /// Serializes `data` as the artifact `name`, creating the directory if
    /// needed. Lists and maps are accepted; scalars are refused.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The artifact was written
    /// * `Ok(false)` - The store could not be written; the failure was logged
    /// * `Err(ConfigError::Misuse)` - `data` is not a list or a map
    pub fn compile(&self, name: &str, data: &ConfigValue) -> Result<bool> {
        let contents = self.formatter.format(data, false)?;
        match self.write_atomic(name, &contents) {
            Ok(path) => {
                tracing::debug!("Compiled artifact '{}' to {}", name, path.display());
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Failed to compile artifact '{}': {}", name, e);
                Ok(false)
            }
        }
    }

    fn write_atomic(&self, name: &str, contents: &str) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.artifact_path(name);
        let tmp = self.dir.join(format!(
            ".{}.{}-{}.tmp",
            normalize_segment(name),
            std::process::id(),
            WRITE_SEQUENCE.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&tmp, contents)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(path)
    }

    /// Loads the artifact `name`.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - Nothing has been compiled under that name yet, or the
    ///   artifact could not be read
    /// * `Ok(Some(value))` - The stored value
    /// * `Err(ConfigError::ParseError)` - The artifact exists but is malformed
    pub fn parse_artifact(&self, name: &str) -> Result<Option<ConfigValue>> {
        let path = self.artifact_path(name);
        if !path.is_file() {
            return Ok(None);
        }
        match self.formatter.parse_file(&path) {
            Ok(value) => Ok(Some(value)),
            Err(ConfigError::IoError(e)) => {
                tracing::warn!("Failed to read artifact {}: {}", path.display(), e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Removes the artifact `name`.
    ///
    /// Returns false if there was none, or if it could not be removed (the
    /// failure is logged).
    pub fn invalidate(&self, name: &str) -> bool {
        let path = self.artifact_path(name);
        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!("Failed to remove artifact {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Returns the artifact `name`, computing and compiling it on first use.
    ///
    /// A failure to write the artifact is logged and the computed value is still
    /// returned.
    pub fn get_or_compile<F>(&self, name: &str, compute: F) -> Result<ConfigValue>
    where
        F: FnOnce() -> Result<ConfigValue>,
    {
        if let Some(value) = self.parse_artifact(name)? {
            return Ok(value);
        }
        let value = compute()?;
        self.compile(name, &value)?;
        Ok(value)
    }
}
