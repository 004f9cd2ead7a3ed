// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash-delimited path addressing into nested configuration mappings.
//!
//! A path such as `db/primary/host` walks one mapping level per segment.
//! Lookups never fail with an error: a missing segment, or a segment that lands
//! on a scalar while more segments remain, is reported as "not found".

use crate::domain::config_value::{ConfigMap, ConfigValue};
use indexmap::IndexMap;

/// Separator between path segments.
pub const SEPARATOR: char = '/';

/// Outcome of a path lookup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathLookup<'a> {
    /// The path resolved to a value, which may itself be `Null` or a mapping.
    Found(&'a ConfigValue),
    /// The path does not exist.
    Missing,
    /// The path does not exist and it had children below the missing point.
    /// Only reported when the lookup was made with `path_required`.
    MissingBranch,
}

impl<'a> PathLookup<'a> {
    /// Returns the found value, if any.
    pub fn value(self) -> Option<&'a ConfigValue> {
        match self {
            PathLookup::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// Splits a path into its first segment and the (possibly empty) remainder.
fn split_first(path: &str) -> (&str, &str) {
    path.split_once(SEPARATOR).unwrap_or((path, ""))
}

/// Looks `path` up in `map`.
///
/// With `path_required`, a miss on a path that continues past the missing point
/// (or that already descended into a nested mapping) is reported as
/// [`PathLookup::MissingBranch`] instead of [`PathLookup::Missing`].
pub fn path_lookup<'a>(map: &'a ConfigMap, path: &str, path_required: bool) -> PathLookup<'a> {
    lookup_at(map, path, path_required, false)
}

fn lookup_at<'a>(
    map: &'a ConfigMap,
    path: &str,
    path_required: bool,
    descended: bool,
) -> PathLookup<'a> {
    let (key, rest) = split_first(path);
    let missing = || {
        if path_required && (descended || !rest.is_empty()) {
            PathLookup::MissingBranch
        } else {
            PathLookup::Missing
        }
    };

    let Some(value) = map.get(key) else {
        return missing();
    };
    if rest.is_empty() {
        return PathLookup::Found(value);
    }
    match value {
        ConfigValue::Map(child) => lookup_at(child, rest, path_required, true),
        _ => missing(),
    }
}

/// Gets the value at `path`, or `default` when it is absent.
///
/// When `path_required` is set and the miss happened below an existing level,
/// `ConfigValue::Null` is returned instead of `default`.
///
/// # Examples
///
/// ```
/// use layercfg::domain::{path_get, ConfigMap, ConfigValue};
///
/// let mut map = ConfigMap::new();
/// map.insert("a".to_string(), ConfigValue::Map(ConfigMap::new()));
///
/// assert_eq!(path_get(&map, "a/b", ConfigValue::from(7i64), false), ConfigValue::from(7i64));
/// assert_eq!(path_get(&map, "a/b", ConfigValue::from(7i64), true), ConfigValue::Null);
/// ```
pub fn path_get(
    map: &ConfigMap,
    path: &str,
    default: ConfigValue,
    path_required: bool,
) -> ConfigValue {
    match path_lookup(map, path, path_required) {
        PathLookup::Found(value) => value.clone(),
        PathLookup::Missing => default,
        PathLookup::MissingBranch => ConfigValue::Null,
    }
}

/// Sets `value` at `path`, creating intermediate mappings on demand.
///
/// Without `overwrite`, an existing non-null value is preserved; a `Null` leaf
/// is always replaced. Returns true if the value was written.
///
/// # Examples
///
/// ```
/// use layercfg::domain::{path_get, path_set, ConfigMap, ConfigValue};
///
/// let mut map = ConfigMap::new();
/// assert!(path_set(&mut map, "db/host", ConfigValue::from("localhost"), true));
/// assert!(!path_set(&mut map, "db/host", ConfigValue::from("other"), false));
/// assert_eq!(
///     path_get(&map, "db/host", ConfigValue::Null, false),
///     ConfigValue::from("localhost")
/// );
/// ```
pub fn path_set(map: &mut ConfigMap, path: &str, value: ConfigValue, overwrite: bool) -> bool {
    let (key, rest) = split_first(path);

    if rest.is_empty() {
        let occupied = map.get(key).is_some_and(|current| !current.is_null());
        if overwrite || !occupied {
            map.insert(key.to_string(), value);
            return true;
        }
        return false;
    }

    let slot = map.entry(key.to_string()).or_insert(ConfigValue::Null);
    match *slot {
        ConfigValue::Map(_) => {}
        ConfigValue::Null => *slot = ConfigValue::Map(ConfigMap::new()),
        _ if overwrite => *slot = ConfigValue::Map(ConfigMap::new()),
        _ => return false,
    }
    match slot.as_map_mut() {
        Some(child) => path_set(child, rest, value, overwrite),
        None => false,
    }
}

/// Enumerates every leaf of `map` with its full path.
///
/// Nested mappings are descended; empty mappings contribute nothing. Lists are
/// treated as leaves.
///
/// # Examples
///
/// ```
/// use layercfg::domain::{flatten_paths, path_set, ConfigMap, ConfigValue};
///
/// let mut map = ConfigMap::new();
/// path_set(&mut map, "path/to/value", ConfigValue::from("value"), true);
///
/// let flat = flatten_paths(&map);
/// assert_eq!(flat.get("path/to/value"), Some(&ConfigValue::from("value")));
/// ```
pub fn flatten_paths(map: &ConfigMap) -> IndexMap<String, ConfigValue> {
    let mut result = IndexMap::new();
    flatten_into(map, "", &mut result);
    result
}

fn flatten_into(map: &ConfigMap, prefix: &str, result: &mut IndexMap<String, ConfigValue>) {
    for (key, value) in map {
        let path = format!("{}{}", prefix, key);
        match value {
            ConfigValue::Map(child) => {
                flatten_into(child, &format!("{}{}", path, SEPARATOR), result)
            }
            leaf => {
                result.entry(path).or_insert_with(|| leaf.clone());
            }
        }
    }
}
