// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared collaborators of configuration documents.

use crate::adapters::{
    CompiledArtifactCache, ConventionalLocator, FsMtimeCache, NullCache, SourceLayout,
};
use crate::domain::{ConfigError, Result};
use crate::ports::{ParseCache, SourceLocator};
use directories::ProjectDirs;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The locator and parse cache documents load through, plus the store
/// directory compiled artifacts are kept in.
///
/// Cloning is cheap; every clone shares the same locator and cache.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::SourceLayout;
/// use layercfg::service::ConfigContext;
///
/// let context = ConfigContext::new(SourceLayout::new("/srv/app"), "/var/cache/app");
/// assert_eq!(context.cache().name(), "fs-mtime");
/// assert!(context.compiler().is_some());
/// ```
#[derive(Clone)]
pub struct ConfigContext {
    locator: Arc<dyn SourceLocator>,
    cache: Arc<dyn ParseCache>,
    store_dir: Option<PathBuf>,
}

impl ConfigContext {
    /// Conventional locator over `layout`, filesystem cache in `store_dir`.
    pub fn new(layout: SourceLayout, store_dir: impl Into<PathBuf>) -> Self {
        let store_dir = store_dir.into();
        Self {
            locator: Arc::new(ConventionalLocator::new(layout)),
            cache: Arc::new(FsMtimeCache::new(&store_dir)),
            store_dir: Some(store_dir),
        }
    }

    /// Conventional locator over `layout` with no caching at all.
    pub fn without_cache(layout: SourceLayout) -> Self {
        Self {
            locator: Arc::new(ConventionalLocator::new(layout)),
            cache: Arc::new(NullCache),
            store_dir: None,
        }
    }

    /// Assembles a context from custom adapters.
    pub fn from_parts(
        locator: Arc<dyn SourceLocator>,
        cache: Arc<dyn ParseCache>,
        store_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            locator,
            cache,
            store_dir,
        }
    }

    /// Conventional layout at `app_root`, with the store placed in the
    /// OS-appropriate cache directory for the project.
    ///
    /// # Arguments
    ///
    /// * `app_root` - The application root
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    /// * `app_name` - The application name (e.g., "myapp")
    pub fn from_default_location(
        app_root: impl Into<PathBuf>,
        qualifier: &str,
        app_name: &str,
    ) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
                source_name: app_name.to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;
        Ok(Self::new(
            SourceLayout::new(app_root),
            proj_dirs.cache_dir().join("store"),
        ))
    }

    /// Returns the source locator.
    pub fn locator(&self) -> &dyn SourceLocator {
        self.locator.as_ref()
    }

    /// Returns the parse cache.
    pub fn cache(&self) -> &dyn ParseCache {
        self.cache.as_ref()
    }

    /// Returns the store directory, if this context has one.
    pub fn store_dir(&self) -> Option<&Path> {
        self.store_dir.as_deref()
    }

    /// Returns the compiled artifact cache sharing this context's store.
    pub fn compiler(&self) -> Option<CompiledArtifactCache> {
        self.store_dir.as_ref().map(CompiledArtifactCache::new)
    }
}

impl fmt::Debug for ConfigContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigContext")
            .field("cache", &self.cache.name())
            .field("store_dir", &self.store_dir)
            .finish_non_exhaustive()
    }
}
