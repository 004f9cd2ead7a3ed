// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conventional source locator.
//!
//! This module provides the locator that maps a source identifier onto the
//! application's file layout: the application config directory, or a package's
//! config directory under the vendor root.

use crate::domain::{ConfigError, Format, Result};
use crate::ports::{ResolvedSource, SourceLocator};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Where configuration sources live on disk.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::SourceLayout;
/// use std::path::Path;
///
/// let layout = SourceLayout::new("/srv/app");
/// assert_eq!(layout.config_dir(), Path::new("/srv/app/config"));
/// assert_eq!(layout.vendor_root(), Path::new("/srv/app/vendor"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    app_root: PathBuf,
    config_dir: PathBuf,
    vendor_root: PathBuf,
    package_config_dir: PathBuf,
}

impl SourceLayout {
    /// Creates the default layout rooted at `app_root`:
    /// `<root>/config`, `<root>/vendor` and `config` inside each package.
    pub fn new(app_root: impl Into<PathBuf>) -> Self {
        let app_root = app_root.into();
        Self {
            config_dir: app_root.join("config"),
            vendor_root: app_root.join("vendor"),
            package_config_dir: PathBuf::from("config"),
            app_root,
        }
    }

    /// Overrides the application config directory.
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Overrides the vendor root packages are searched under.
    pub fn with_vendor_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.vendor_root = dir.into();
        self
    }

    /// Overrides the config subdirectory inside each package.
    pub fn with_package_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.package_config_dir = dir.into();
        self
    }

    /// Returns the application root.
    pub fn app_root(&self) -> &Path {
        &self.app_root
    }

    /// Returns the application config directory.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Returns the vendor root.
    pub fn vendor_root(&self) -> &Path {
        &self.vendor_root
    }

    /// Directory conventional sources of `format` are searched in.
    pub fn search_dir(&self, package: Option<&str>, format: Format) -> PathBuf {
        match package {
            Some(package) => {
                let root = self.vendor_root.join(package);
                if format.uses_config_dir() {
                    root.join(&self.package_config_dir)
                } else {
                    root
                }
            }
            None if format.uses_config_dir() => self.config_dir.clone(),
            None => self.app_root.clone(),
        }
    }
}

/// Locator implementing the conventional file layout.
///
/// Precedence:
/// 1. an identifier that is itself a readable file is returned unchanged,
/// 2. otherwise `<identifier>.<ext>` is looked up in the package's config
///    directory when a package is given, else in the application's.
#[derive(Debug, Clone)]
pub struct ConventionalLocator {
    layout: SourceLayout,
}

impl ConventionalLocator {
    /// Creates a locator over `layout`.
    pub fn new(layout: SourceLayout) -> Self {
        Self { layout }
    }

    /// Returns the layout this locator searches.
    pub fn layout(&self) -> &SourceLayout {
        &self.layout
    }
}

fn is_readable(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}

impl SourceLocator for ConventionalLocator {
    fn locate(
        &self,
        source: &str,
        package: Option<&str>,
        format: Format,
    ) -> Result<ResolvedSource> {
        let literal = Path::new(source);
        if is_readable(literal) {
            return Ok(ResolvedSource {
                identifier: source.to_string(),
                package: package.map(str::to_string),
                path: literal.to_path_buf(),
            });
        }

        let relative = source.trim_start_matches(['/', '\\']);
        let file_name = match format.extension() {
            Some(ext) => format!("{}.{}", relative, ext),
            None => relative.to_string(),
        };
        let path = self.layout.search_dir(package, format).join(file_name);

        if !is_readable(&path) {
            tracing::debug!(
                "Config source '{}' (package={:?}) not found at {}",
                source,
                package,
                path.display()
            );
            return Err(ConfigError::SourceNotFound {
                source_name: source.to_string(),
                package: package.map(str::to_string),
            });
        }

        Ok(ResolvedSource {
            identifier: source.to_string(),
            package: package.map(str::to_string),
            path,
        })
    }
}
