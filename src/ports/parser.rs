// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser and file formatter trait definitions.
//!
//! `ConfigParser` turns the text of a configuration source into a nested
//! mapping. `FileFormatter` is the two-way variant used for artifacts the crate
//! writes itself.

use crate::domain::{ConfigMap, ConfigValue, Result};
use std::path::Path;

/// A trait for parsing configuration sources.
///
/// Parsers produce a nested [`ConfigMap`]: sections and other structure in the
/// source become nested mappings rather than flattened keys. Malformed content
/// must be reported as [`ConfigError::ParseError`](crate::domain::ConfigError::ParseError)
/// so callers can tell it apart from a missing source.
///
/// # Examples
///
/// ```rust
/// use layercfg::ports::ConfigParser;
/// use layercfg::domain::{ConfigMap, ConfigValue, Result};
///
/// struct OneLineParser;
///
/// impl ConfigParser for OneLineParser {
///     fn parse(&self, content: &str) -> Result<ConfigMap> {
///         let mut map = ConfigMap::new();
///         map.insert("line".to_string(), ConfigValue::from(content.trim()));
///         Ok(map)
///     }
/// }
///
/// let map = OneLineParser.parse("hello\n").unwrap();
/// assert_eq!(map["line"], ConfigValue::from("hello"));
/// ```
pub trait ConfigParser: Send + Sync {
    /// Parses configuration content into a nested mapping.
    ///
    /// # Arguments
    ///
    /// * `content` - The raw content of the configuration source
    ///
    /// # Returns
    ///
    /// * `Ok(ConfigMap)` - The parsed configuration
    /// * `Err(ConfigError::ParseError)` - The content is malformed
    fn parse(&self, content: &str) -> Result<ConfigMap>;
}

/// A two-way formatter for artifacts that are both written and read back.
pub trait FileFormatter: Send + Sync {
    /// Serializes `data` to the artifact text.
    ///
    /// Only compact output is required; implementations may refuse `pretty`
    /// with [`ConfigError::Misuse`](crate::domain::ConfigError::Misuse).
    fn format(&self, data: &ConfigValue, pretty: bool) -> Result<String>;

    /// Reads the artifact at `path` back into a value.
    fn parse_file(&self, path: &Path) -> Result<ConfigValue>;
}
