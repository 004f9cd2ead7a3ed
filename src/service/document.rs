// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration documents.
//!
//! A `ConfigDocument` is an ordered mapping populated from one or more sources
//! of a single format. Loading resolves the source through the context's
//! locator, consults the parse cache keyed by the source file's mtime, parses
//! on a miss and merges the result over the current mapping.

use crate::adapters::{parser_for, CommandLineOverrides};
use crate::domain::{
    flatten_paths, path_get, path_lookup, path_set, CacheKey, ConfigError, ConfigMap,
    ConfigValue, Format, Result, SourceStamp,
};
use crate::ports::{ConfigParser, ResolvedSource};
use crate::service::ConfigContext;
use indexmap::IndexMap;
use std::fmt;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Process-wide switch for the parse cache.
static CACHING: AtomicBool = AtomicBool::new(true);

/// Maximum source file size (10 MB)
const MAX_SOURCE_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// An ordered configuration mapping loaded from sources of one format.
///
/// Merging is shallow: every top-level key of a newly loaded source replaces
/// the current value of that key in full, keys it does not mention are kept.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::SourceLayout;
/// use layercfg::domain::{ConfigValue, Format};
/// use layercfg::service::{ConfigContext, ConfigDocument};
///
/// # fn main() -> layercfg::domain::Result<()> {
/// let app = tempfile::tempdir().unwrap();
/// std::fs::create_dir_all(app.path().join("config")).unwrap();
/// std::fs::write(app.path().join("config/engine.ini"), "[db]\nhost=localhost\n").unwrap();
///
/// let context = ConfigContext::without_cache(SourceLayout::new(app.path()));
/// let mut doc = ConfigDocument::new(Format::KeyFile, context)?;
/// assert!(doc.load("engine"));
/// assert_eq!(doc.get_one("db/host", ConfigValue::Null), ConfigValue::from("localhost"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConfigDocument {
    format: Format,
    parser: Arc<dyn ConfigParser>,
    context: ConfigContext,
    mapping: ConfigMap,
}

impl ConfigDocument {
    /// Creates an empty document using the built-in parser for `format`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Misuse` for `Format::CompiledArray`: compiled
    /// artifacts are read through `CompiledArtifactCache`, not as documents.
    pub fn new(format: Format, context: ConfigContext) -> Result<Self> {
        let parser = parser_for(format).ok_or_else(|| {
            ConfigError::misuse("Compiled artifacts are not documents; use CompiledArtifactCache")
        })?;
        Ok(Self::with_parser(format, parser, context))
    }

    /// Creates an empty document with a custom parser.
    pub fn with_parser(
        format: Format,
        parser: Arc<dyn ConfigParser>,
        context: ConfigContext,
    ) -> Self {
        Self {
            format,
            parser,
            context,
            mapping: ConfigMap::new(),
        }
    }

    /// Globally enables or disables the parse cache for every document.
    pub fn set_caching(enabled: bool) {
        CACHING.store(enabled, Ordering::SeqCst);
    }

    /// Returns whether the parse cache is globally enabled.
    pub fn is_caching() -> bool {
        CACHING.load(Ordering::SeqCst)
    }

    /// Returns the document's format.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns the context the document loads through.
    pub fn context(&self) -> &ConfigContext {
        &self.context
    }

    /// Returns true if `source` resolves to a readable file.
    pub fn has_source(&self, source: &str, package: Option<&str>) -> bool {
        self.context.locator().exists(source, package, self.format)
    }

    /// Loads `source` (from `package` when given) and merges it over the
    /// current mapping.
    ///
    /// With `cached` set and caching globally enabled, a parse stored for the
    /// source file's current mtime is reused and a fresh parse is stored.
    /// Otherwise the cache is neither read nor written.
    ///
    /// # Errors
    ///
    /// * `ConfigError::SourceNotFound` - The source does not resolve
    /// * `ConfigError::SourceError` - The file is unreadable or too large
    /// * `ConfigError::ParseError` - The file is malformed
    ///
    /// The mapping is unchanged on error.
    pub fn try_load_from(
        &mut self,
        package: Option<&str>,
        source: &str,
        cached: bool,
    ) -> Result<()> {
        let resolved = self.context.locator().locate(source, package, self.format)?;

        let parsed = if cached && Self::is_caching() {
            self.parse_through_cache(&resolved)?
        } else {
            self.parse_source(&resolved)?
        };

        tracing::debug!(
            "Loaded {} config '{}' (package={:?}) with {} top-level keys",
            self.format,
            source,
            package,
            parsed.len()
        );
        self.add(parsed);
        Ok(())
    }

    /// Like [`ConfigDocument::try_load_from`], but logs failures and reports
    /// them as `false`.
    pub fn load_from(&mut self, package: Option<&str>, source: &str, cached: bool) -> bool {
        match self.try_load_from(package, source, cached) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    "Failed to load {} config '{}' (package={:?}): {}",
                    self.format,
                    source,
                    package,
                    e
                );
                false
            }
        }
    }

    /// Loads an application-level source through the cache.
    pub fn load(&mut self, source: &str) -> bool {
        self.load_from(None, source, true)
    }

    /// Merges `partial` over the mapping, replacing whole top-level values.
    pub fn add(&mut self, partial: ConfigMap) {
        for (key, value) in partial {
            self.mapping.insert(key, value);
        }
    }

    /// Returns the value at slash-delimited `path`, or `default` when any
    /// segment is absent.
    pub fn get_one(&self, path: &str, default: impl Into<ConfigValue>) -> ConfigValue {
        path_get(&self.mapping, path, default.into(), false)
    }

    /// Borrows the value at `path`, if present.
    pub fn lookup(&self, path: &str) -> Option<&ConfigValue> {
        path_lookup(&self.mapping, path, false).value()
    }

    /// Writes `value` at `path`, creating sections as needed.
    pub fn set(&mut self, path: &str, value: impl Into<ConfigValue>) {
        path_set(&mut self.mapping, path, value.into(), true);
    }

    /// Writes every command-line override over the mapping.
    pub fn apply_overrides(&mut self, overrides: &CommandLineOverrides) {
        overrides.apply_to(&mut self.mapping);
    }

    /// Returns the whole mapping.
    pub fn as_map(&self) -> &ConfigMap {
        &self.mapping
    }

    /// Replaces the whole mapping.
    pub fn replace_all(&mut self, mapping: ConfigMap) {
        self.mapping = mapping;
    }

    /// Consumes the document, returning its mapping.
    pub fn into_map(self) -> ConfigMap {
        self.mapping
    }

    /// Enumerates every leaf as a `path -> value` pair.
    pub fn flatten(&self) -> IndexMap<String, ConfigValue> {
        flatten_paths(&self.mapping)
    }

    fn parse_through_cache(&self, resolved: &ResolvedSource) -> Result<ConfigMap> {
        // stamp before reading: an edit racing the read is picked up next time
        let stamp = match SourceStamp::of(resolved.path()) {
            Ok(stamp) => stamp,
            Err(e) => {
                tracing::debug!(
                    "No mtime for {}, bypassing cache: {}",
                    resolved.path().display(),
                    e
                );
                return self.parse_source(resolved);
            }
        };

        let key = CacheKey::new(
            resolved.package.as_deref(),
            &resolved.identifier,
            self.format.cache_kind(),
        );
        let cache = self.context.cache();
        if let Some(payload) = cache.get(&key, stamp) {
            return Ok(payload);
        }

        let parsed = self.parse_source(resolved)?;
        cache.set(&key, stamp, &parsed);
        Ok(parsed)
    }

    fn parse_source(&self, resolved: &ResolvedSource) -> Result<ConfigMap> {
        let path = resolved.path();
        let source_error = |message: String, e: std::io::Error| ConfigError::SourceError {
            source_name: resolved.identifier.clone(),
            message,
            source: Some(Box::new(e)),
        };

        let metadata = fs::metadata(path)
            .map_err(|e| source_error(format!("Failed to stat {}", path.display()), e))?;
        if metadata.len() > MAX_SOURCE_FILE_SIZE {
            return Err(ConfigError::SourceError {
                source_name: resolved.identifier.clone(),
                message: format!(
                    "File size ({} bytes) exceeds maximum allowed size ({} bytes)",
                    metadata.len(),
                    MAX_SOURCE_FILE_SIZE
                ),
                source: None,
            });
        }

        let bytes = fs::read(path)
            .map_err(|e| source_error(format!("Failed to read {}", path.display()), e))?;
        let content = String::from_utf8(bytes).map_err(|e| ConfigError::ParseError {
            message: format!("{}: invalid UTF-8", path.display()),
            source: Some(Box::new(e)),
        })?;

        self.parser.parse(&content).map_err(|e| match e {
            ConfigError::ParseError { message, source } => ConfigError::ParseError {
                message: format!("{}: {}", path.display(), message),
                source,
            },
            other => other,
        })
    }
}

impl fmt::Debug for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigDocument")
            .field("format", &self.format)
            .field("mapping", &self.mapping)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SourceLayout;
    use tempfile::TempDir;

    fn app_with(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn document(app: &TempDir) -> ConfigDocument {
        let context = ConfigContext::without_cache(SourceLayout::new(app.path()));
        ConfigDocument::new(Format::KeyFile, context).unwrap()
    }

    fn map(entries: &[(&str, ConfigValue)]) -> ConfigMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_engine_scenario() {
        let app = app_with(&[("config/engine.ini", "[db]\nhost=localhost\n")]);
        let mut doc = document(&app);

        assert!(doc.load_from(None, "engine", true));
        assert_eq!(
            doc.get_one("db/host", ConfigValue::Null),
            ConfigValue::from("localhost")
        );
        assert_eq!(doc.get_one("db/port", 5432), ConfigValue::Integer(5432));
    }

    #[test]
    fn test_add_replaces_top_level_values() {
        let app = TempDir::new().unwrap();
        let mut doc = document(&app);

        doc.add(map(&[
            ("a", ConfigValue::Integer(1)),
            ("b", ConfigValue::Map(map(&[("x", ConfigValue::Integer(1))]))),
        ]));
        doc.add(map(&[(
            "b",
            ConfigValue::Map(map(&[("y", ConfigValue::Integer(2))])),
        )]));

        let expected = map(&[
            ("a", ConfigValue::Integer(1)),
            ("b", ConfigValue::Map(map(&[("y", ConfigValue::Integer(2))]))),
        ]);
        assert_eq!(doc.as_map(), &expected);
    }

    #[test]
    fn test_missing_source_leaves_mapping() {
        let app = app_with(&[("config/engine.ini", "name=x\n")]);
        let mut doc = document(&app);
        assert!(doc.load("engine"));

        let err = doc.try_load_from(None, "missing", true).unwrap_err();
        assert!(err.is_not_found());
        assert!(!doc.load("missing"));
        assert_eq!(doc.as_map().len(), 1);
    }

    #[test]
    fn test_malformed_source_is_parse_error() {
        let app = app_with(&[("config/broken.ini", "[db\nhost=x\n")]);
        let mut doc = document(&app);

        let err = doc.try_load_from(None, "broken", true).unwrap_err();
        assert!(err.is_parse_failure());
        assert!(err.to_string().contains("broken.ini"));
        assert!(doc.as_map().is_empty());
    }

    #[test]
    fn test_non_utf8_source_is_parse_error() {
        let app = app_with(&[]);
        fs::create_dir_all(app.path().join("config")).unwrap();
        fs::write(app.path().join("config/bin.ini"), b"key=\xff\xfe\n").unwrap();
        let mut doc = document(&app);

        let err = doc.try_load_from(None, "bin", true).unwrap_err();
        assert!(err.is_parse_failure());
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("invalid UTF-8"));
        assert!(!doc.load("bin"));
    }

    #[test]
    fn test_package_source() {
        let app = app_with(&[("vendor/acme/mailer/config/conf.ini", "from=noreply\n")]);
        let mut doc = document(&app);

        assert!(doc.has_source("conf", Some("acme/mailer")));
        assert!(!doc.has_source("conf", None));
        assert!(doc.load_from(Some("acme/mailer"), "conf", false));
        assert_eq!(doc.get_one("from", ""), ConfigValue::from("noreply"));
    }

    #[test]
    fn test_oversized_source_refused() {
        let app = TempDir::new().unwrap();
        let path = app.path().join("config/huge.ini");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let file = fs::File::create(&path).unwrap();
        file.set_len(MAX_SOURCE_FILE_SIZE + 1).unwrap();

        let mut doc = document(&app);
        let err = doc.try_load_from(None, "huge", false).unwrap_err();
        assert!(matches!(err, ConfigError::SourceError { .. }));
    }

    #[test]
    fn test_set_and_lookup() {
        let app = TempDir::new().unwrap();
        let mut doc = document(&app);

        doc.set("mail/host", "smtp");
        assert_eq!(doc.lookup("mail/host"), Some(&ConfigValue::from("smtp")));
        assert_eq!(doc.lookup("mail/port"), None);
        assert_eq!(doc.flatten().len(), 1);
    }

    #[test]
    fn test_apply_overrides() {
        let app = app_with(&[("config/engine.ini", "[db]\nhost=a\nport=1\n")]);
        let mut doc = document(&app);
        assert!(doc.load("engine"));

        doc.apply_overrides(&CommandLineOverrides::from_args(vec!["--db/host=b"]));
        assert_eq!(doc.get_one("db/host", ""), ConfigValue::from("b"));
        assert_eq!(doc.get_one("db/port", ""), ConfigValue::from("1"));
    }

    #[test]
    fn test_compiled_array_is_not_a_document() {
        let app = TempDir::new().unwrap();
        let context = ConfigContext::without_cache(SourceLayout::new(app.path()));
        let err = ConfigDocument::new(Format::CompiledArray, context).unwrap_err();
        assert!(matches!(err, ConfigError::Misuse { .. }));
    }

    #[test]
    fn test_replace_all() {
        let app = TempDir::new().unwrap();
        let mut doc = document(&app);
        doc.set("a", 1);
        doc.replace_all(map(&[("b", ConfigValue::Bool(true))]));
        assert_eq!(doc.clone().into_map().keys().collect::<Vec<_>>(), vec!["b"]);
    }
}
