// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache key and source stamp types for the parse cache.
//!
//! A `CacheKey` names one cache artifact: a domain (which package and which
//! kind of configuration) and a source name. Both halves are normalized so that
//! neither can introduce a path separator into the artifact location.

use std::fmt;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Character substituted for path separators in cache key segments.
const FILLER: char = '-';

/// Domain marker used for application-level sources.
const APP_DOMAIN: &str = "app";

/// Replaces path separators with the filler and trims leading/trailing fillers.
///
/// # Examples
///
/// ```
/// use layercfg::domain::cache_key::normalize_segment;
///
/// assert_eq!(normalize_segment("acme/mailer"), "acme-mailer");
/// assert_eq!(normalize_segment("/etc/app/engine.ini"), "etc-app-engine.ini");
/// ```
pub fn normalize_segment(raw: &str) -> String {
    raw.chars()
        .map(|c| if c == '/' || c == '\\' { FILLER } else { c })
        .collect::<String>()
        .trim_matches(FILLER)
        .to_string()
}

/// Identifies one parse cache artifact.
///
/// # Examples
///
/// ```
/// use layercfg::domain::CacheKey;
///
/// let key = CacheKey::new(Some("acme/mailer"), "conf", "config");
/// assert_eq!(key.domain(), "acme-mailer-config");
/// assert_eq!(key.name(), "conf");
///
/// let key = CacheKey::new(None, "sub/engine", "config");
/// assert_eq!(key.domain(), "app-config");
/// assert_eq!(key.name(), "sub-engine");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    domain: String,
    name: String,
}

impl CacheKey {
    /// Builds the key for a source of the given kind, owned by `package` or by
    /// the application when `package` is `None`.
    pub fn new(package: Option<&str>, source: &str, kind: &str) -> Self {
        let owner = package
            .map(normalize_segment)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| APP_DOMAIN.to_string());
        CacheKey {
            domain: format!("{}-{}", owner, normalize_segment(kind)),
            name: normalize_segment(source),
        }
    }

    /// Returns the normalized cache domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the normalized source name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.domain, self.name)
    }
}

/// A source file's last-modified time, as signed nanoseconds since the epoch.
///
/// Stored inside cache artifacts and compared for equality; the artifact's own
/// filesystem timestamp is never consulted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceStamp(i64);

impl SourceStamp {
    /// Wraps a raw stamp.
    pub fn new(nanos: i64) -> Self {
        SourceStamp(nanos)
    }

    /// Reads the modification time of the file at `path`.
    pub fn of(path: &Path) -> std::io::Result<Self> {
        let modified = std::fs::metadata(path)?.modified()?;
        Ok(Self::from_system_time(modified))
    }

    /// Converts a `SystemTime`, saturating outside the representable range.
    pub fn from_system_time(time: SystemTime) -> Self {
        let nanos = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_nanos()).unwrap_or(i64::MAX),
            Err(before) => i64::try_from(before.duration().as_nanos())
                .map(|n| -n)
                .unwrap_or(i64::MIN),
        };
        SourceStamp(nanos)
    }

    /// Returns the raw nanosecond value.
    pub fn as_nanos(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;

    #[test]
    fn test_normalize_plain_name_unchanged() {
        assert_eq!(normalize_segment("engine"), "engine");
        assert_eq!(normalize_segment(".env.local"), ".env.local");
    }

    #[test]
    fn test_normalize_replaces_both_separators() {
        assert_eq!(normalize_segment("a/b\\c"), "a-b-c");
    }

    #[test]
    fn test_normalize_trims_fillers() {
        assert_eq!(normalize_segment("/vendor/pkg/"), "vendor-pkg");
        assert_eq!(normalize_segment("--x--"), "x");
    }

    #[test]
    fn test_app_domain() {
        let key = CacheKey::new(None, "engine", "config");
        assert_eq!(key.domain(), "app-config");
        assert_eq!(key.to_string(), "app-config/engine");
    }

    #[test]
    fn test_empty_package_falls_back_to_app() {
        let key = CacheKey::new(Some("/"), "engine", "config");
        assert_eq!(key.domain(), "app-config");
    }

    #[test]
    fn test_kinds_are_isolated() {
        let ini = CacheKey::new(None, "x", "config");
        let env = CacheKey::new(None, "x", "env");
        assert_ne!(ini, env);

        let mut set = HashSet::new();
        set.insert(ini.clone());
        assert!(set.contains(&ini));
        assert!(!set.contains(&env));
    }

    #[test]
    fn test_stamp_from_system_time() {
        let after = UNIX_EPOCH + Duration::from_secs(2);
        assert_eq!(
            SourceStamp::from_system_time(after).as_nanos(),
            2_000_000_000
        );
        let before = UNIX_EPOCH - Duration::from_secs(1);
        assert_eq!(
            SourceStamp::from_system_time(before).as_nanos(),
            -1_000_000_000
        );
    }

    #[test]
    fn test_stamp_of_missing_file_is_error() {
        assert!(SourceStamp::of(Path::new("/nonexistent/layercfg/stamp")).is_err());
    }
}
