// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source locator trait definition.
//!
//! This module defines the `SourceLocator` trait, the port that turns a logical
//! source identifier into a concrete readable file.

use crate::domain::{Format, Result};
use std::path::{Path, PathBuf};

/// A source identifier resolved to a file on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSource {
    /// The logical name that was requested (e.g. `"engine"`)
    pub identifier: String,
    /// The package the source belongs to, `None` for application-level sources
    pub package: Option<String>,
    /// The concrete file location
    pub path: PathBuf,
}

impl ResolvedSource {
    /// Returns the resolved file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A trait for resolving source identifiers to files.
///
/// Resolution is a synchronous, side-effect-free existence check. An identifier
/// that already names a readable file is used verbatim.
///
/// # Examples
///
/// ```rust
/// use layercfg::ports::{ResolvedSource, SourceLocator};
/// use layercfg::domain::{ConfigError, Format, Result};
///
/// struct NothingLocator;
///
/// impl SourceLocator for NothingLocator {
///     fn locate(
///         &self,
///         source: &str,
///         package: Option<&str>,
///         _format: Format,
///     ) -> Result<ResolvedSource> {
///         Err(ConfigError::SourceNotFound {
///             source_name: source.to_string(),
///             package: package.map(str::to_string),
///         })
///     }
/// }
///
/// assert!(!NothingLocator.exists("engine", None, Format::KeyFile));
/// ```
pub trait SourceLocator: Send + Sync {
    /// Resolves `source` (within `package`, if given) for `format`.
    ///
    /// # Returns
    ///
    /// * `Ok(ResolvedSource)` - A readable file was found
    /// * `Err(ConfigError::SourceNotFound)` - No candidate exists or is readable
    fn locate(&self, source: &str, package: Option<&str>, format: Format)
        -> Result<ResolvedSource>;

    /// Returns true if `source` can be resolved.
    fn exists(&self, source: &str, package: Option<&str>, format: Format) -> bool {
        self.locate(source, package, format).is_ok()
    }
}
