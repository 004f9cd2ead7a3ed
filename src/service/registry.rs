// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration registry.
//!
//! The registry builds documents and keeps at most one "main" document per
//! format. It is constructed explicitly and handed to the code that needs it;
//! [`ConfigRegistry::install_global`] exists for bootstrap code that must make
//! one instance reachable process-wide.

use crate::adapters::CompiledArtifactCache;
use crate::domain::{ConfigError, ConfigValue, Format, Result};
use crate::service::{ConfigContext, ConfigDocument};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Deployment environment files, loaded in order by [`ConfigRegistry::build_env`].
pub const ENV_SOURCES: [&str; 2] = [".env", ".env.local"];

static GLOBAL: OnceCell<ConfigRegistry> = OnceCell::new();

/// Builds configuration documents and holds the main document of each format.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::SourceLayout;
/// use layercfg::domain::{ConfigValue, Format};
/// use layercfg::service::{ConfigContext, ConfigRegistry};
///
/// # fn main() -> layercfg::domain::Result<()> {
/// let app = tempfile::tempdir().unwrap();
/// std::fs::create_dir_all(app.path().join("config")).unwrap();
/// std::fs::write(app.path().join("config/engine.ini"), "name=demo\n").unwrap();
///
/// let registry = ConfigRegistry::new(ConfigContext::without_cache(SourceLayout::new(app.path())));
/// registry.build(Format::KeyFile, "engine", false, true)?;
/// assert_eq!(registry.get(Format::KeyFile, "name", ""), ConfigValue::from("demo"));
/// # Ok(())
/// # }
/// ```
pub struct ConfigRegistry {
    context: ConfigContext,
    mains: RwLock<HashMap<Format, ConfigDocument>>,
}

impl ConfigRegistry {
    /// Creates a registry with no main documents.
    pub fn new(context: ConfigContext) -> Self {
        Self {
            context,
            mains: RwLock::new(HashMap::new()),
        }
    }

    /// Makes this registry the process-wide instance.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Misuse` if a registry was already installed.
    pub fn install_global(self) -> Result<&'static ConfigRegistry> {
        GLOBAL
            .set(self)
            .map_err(|_| ConfigError::misuse("A global config registry is already installed"))?;
        GLOBAL
            .get()
            .ok_or_else(|| ConfigError::misuse("Global config registry vanished"))
    }

    /// Returns the process-wide instance, if one was installed.
    pub fn global() -> Option<&'static ConfigRegistry> {
        GLOBAL.get()
    }

    /// Returns the context new documents are created with.
    pub fn context(&self) -> &ConfigContext {
        &self.context
    }

    /// Returns the compiled artifact cache for this registry's store.
    pub fn compiler(&self) -> Option<CompiledArtifactCache> {
        self.context.compiler()
    }

    fn read_mains(&self) -> RwLockReadGuard<'_, HashMap<Format, ConfigDocument>> {
        self.mains.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_mains(&self) -> RwLockWriteGuard<'_, HashMap<Format, ConfigDocument>> {
        self.mains.write().unwrap_or_else(|e| e.into_inner())
    }

    fn buildable(format: Format) -> Result<()> {
        match format {
            Format::KeyFile => Ok(()),
            Format::Env => Err(ConfigError::misuse(
                "Env config cannot be built from a single source; use build_env",
            )),
            Format::CompiledArray => Err(ConfigError::misuse(
                "Compiled artifacts are not documents; use compiler()",
            )),
        }
    }

    /// Loads an application-level `source`.
    ///
    /// Unless `minor` is set, the source is merged into the main document of
    /// `format`, which is created on first use, and a snapshot of the main is
    /// returned. A minor document is independent and never registered.
    ///
    /// # Errors
    ///
    /// Load errors are returned as is; the main document is left unchanged.
    pub fn build(
        &self,
        format: Format,
        source: &str,
        minor: bool,
        cached: bool,
    ) -> Result<ConfigDocument> {
        Self::buildable(format)?;

        if minor {
            let mut doc = ConfigDocument::new(format, self.context.clone())?;
            doc.try_load_from(None, source, cached)?;
            return Ok(doc);
        }

        let mut mains = self.write_mains();
        if !mains.contains_key(&format) {
            let doc = ConfigDocument::new(format, self.context.clone())?;
            mains.insert(format, doc);
        }
        let main = mains
            .get_mut(&format)
            .ok_or_else(|| ConfigError::MainNotBuilt {
                format: format.to_string(),
            })?;
        main.try_load_from(None, source, cached)?;
        tracing::debug!("Merged '{}' into the main {} config", source, format);
        Ok(main.clone())
    }

    /// Builds a minor document from `source` of `package`.
    ///
    /// With `silent` set, a source that does not resolve yields `Ok(None)`
    /// instead of an error; optional per-package configuration uses this.
    pub fn build_from(
        &self,
        format: Format,
        package: Option<&str>,
        source: &str,
        cached: bool,
        silent: bool,
    ) -> Result<Option<ConfigDocument>> {
        Self::buildable(format)?;

        let mut doc = ConfigDocument::new(format, self.context.clone())?;
        if silent && !doc.has_source(source, package) {
            tracing::debug!(
                "Optional config '{}' (package={:?}) is absent",
                source,
                package
            );
            return Ok(None);
        }
        doc.try_load_from(package, source, cached)?;
        Ok(Some(doc))
    }

    /// Loads the deployment environment files that exist into the main env
    /// document, later files overriding earlier ones, and returns a snapshot.
    pub fn build_env(&self) -> Result<ConfigDocument> {
        let mut mains = self.write_mains();
        if !mains.contains_key(&Format::Env) {
            let doc = ConfigDocument::new(Format::Env, self.context.clone())?;
            mains.insert(Format::Env, doc);
        }
        let main = mains
            .get_mut(&Format::Env)
            .ok_or_else(|| ConfigError::MainNotBuilt {
                format: Format::Env.to_string(),
            })?;

        for source in ENV_SOURCES {
            if main.has_source(source, None) {
                main.load_from(None, source, true);
            }
        }
        Ok(main.clone())
    }

    /// Returns true if a main document exists for `format`.
    pub fn is_built(&self, format: Format) -> bool {
        self.read_mains().contains_key(&format)
    }

    /// Returns a snapshot of the main document of `format`.
    pub fn main(&self, format: Format) -> Option<ConfigDocument> {
        self.read_mains().get(&format).cloned()
    }

    /// Reads `path` from the main document of `format`. Falls back to
    /// `default` when the path is absent or no main was built.
    pub fn get(&self, format: Format, path: &str, default: impl Into<ConfigValue>) -> ConfigValue {
        match self.read_mains().get(&format) {
            Some(main) => main.get_one(path, default),
            None => default.into(),
        }
    }

    /// Writes `value` at `path` in the main document of `format`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MainNotBuilt` if no main document exists.
    pub fn set(&self, format: Format, path: &str, value: impl Into<ConfigValue>) -> Result<()> {
        let mut mains = self.write_mains();
        let main = mains.get_mut(&format).ok_or_else(|| ConfigError::MainNotBuilt {
            format: format.to_string(),
        })?;
        main.set(path, value);
        Ok(())
    }
}

impl std::fmt::Debug for ConfigRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let built: Vec<Format> = self.read_mains().keys().copied().collect();
        f.debug_struct("ConfigRegistry")
            .field("context", &self.context)
            .field("mains", &built)
            .finish()
    }
}
