// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parse cache trait definition.
//!
//! This module defines the `ParseCache` trait: a freshness-checked store of
//! parsed configuration keyed by [`CacheKey`] and validated against the source
//! file's modification time.

use crate::domain::{CacheKey, ConfigMap, SourceStamp};

/// A trait for caching parsed configuration.
///
/// An entry is valid only when the stamp stored with it equals the stamp the
/// caller observed on the source file. Implementations never fail outward:
/// unreadable or corrupt entries are misses and failed writes are dropped,
/// both after logging.
///
/// # Examples
///
/// ```rust
/// use layercfg::ports::ParseCache;
/// use layercfg::domain::{CacheKey, ConfigMap, SourceStamp};
///
/// struct Forgetful;
///
/// impl ParseCache for Forgetful {
///     fn name(&self) -> &str {
///         "forgetful"
///     }
///
///     fn get(&self, _key: &CacheKey, _stamp: SourceStamp) -> Option<ConfigMap> {
///         None
///     }
///
///     fn set(&self, _key: &CacheKey, _stamp: SourceStamp, _payload: &ConfigMap) {}
/// }
///
/// let key = CacheKey::new(None, "engine", "config");
/// assert!(Forgetful.get(&key, SourceStamp::new(1)).is_none());
/// ```
pub trait ParseCache: Send + Sync {
    /// Returns a short name for logging.
    fn name(&self) -> &str;

    /// Returns the cached payload if one exists for `key` with exactly `stamp`.
    fn get(&self, key: &CacheKey, stamp: SourceStamp) -> Option<ConfigMap>;

    /// Stores `payload` for `key`, replacing any previous entry.
    fn set(&self, key: &CacheKey, stamp: SourceStamp, payload: &ConfigMap);
}
