// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line configuration overrides.
//!
//! This module provides an adapter that turns command-line arguments into
//! path/value pairs to be written over a loaded configuration.

use crate::domain::{path_set, ConfigMap, ConfigValue};
use indexmap::IndexMap;

/// Configuration overrides parsed from command-line arguments.
///
/// Supported argument formats:
/// - `--path=value`: long form with equals sign
/// - `--path value`: long form with space-separated value
/// - `-k value`: short form with space-separated value
///
/// Paths use the same slash addressing as documents, so `--db/host=x`
/// overrides the `host` key of the `db` section. When a path is given twice the
/// last value wins.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::CommandLineOverrides;
/// use layercfg::domain::{ConfigMap, ConfigValue};
///
/// let overrides = CommandLineOverrides::from_args(vec!["--db/host=localhost", "--debug", "1"]);
/// let mut map = ConfigMap::new();
/// overrides.apply_to(&mut map);
/// assert_eq!(map["db"].as_map().unwrap()["host"], ConfigValue::from("localhost"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandLineOverrides {
    values: IndexMap<String, String>,
}

impl CommandLineOverrides {
    /// Creates an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses overrides from a list of arguments. Positional arguments are
    /// ignored.
    pub fn from_args<S: AsRef<str>>(args: Vec<S>) -> Self {
        let mut overrides = Self::new();
        overrides.parse_args(args);
        overrides
    }

    /// Parses `path=value` pairs without leading dashes.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = Self::new();
        for pair in pairs {
            if let Some((path, value)) = pair.as_ref().split_once('=') {
                overrides.values.insert(path.to_string(), value.to_string());
            }
        }
        overrides
    }

    fn parse_args<S: AsRef<str>>(&mut self, args: Vec<S>) {
        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_ref();
            let next_value = args
                .get(i + 1)
                .map(|next| next.as_ref())
                .filter(|next| !next.starts_with('-'));

            if let Some(long) = arg.strip_prefix("--") {
                if let Some((path, value)) = long.split_once('=') {
                    self.values.insert(path.to_string(), value.to_string());
                    i += 1;
                } else if let Some(value) = next_value {
                    self.values.insert(long.to_string(), value.to_string());
                    i += 2;
                } else {
                    i += 1;
                }
            } else if let Some(short) = arg.strip_prefix('-').filter(|s| s.chars().count() == 1) {
                if let Some(value) = next_value {
                    self.values.insert(short.to_string(), value.to_string());
                    i += 2;
                } else {
                    i += 1;
                }
            } else {
                i += 1;
            }
        }
    }

    /// Returns the override for `path`, if any.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.values.get(path).map(String::as_str)
    }

    /// Iterates the overrides in the order they were first given.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of overrides.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no overrides.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Writes every override into `map`, creating sections as needed.
    pub fn apply_to(&self, map: &mut ConfigMap) {
        for (path, value) in self.iter() {
            path_set(map, path, ConfigValue::from(value), true);
        }
    }
}
