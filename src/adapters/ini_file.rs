// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-file (INI) parser.
//!
//! This module provides the parser for sectioned `key = value` files, and the
//! line grammar it shares with the environment file parser.

use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result};
use crate::ports::ConfigParser;

/// Variations of the shared `key = value` line grammar.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Dialect {
    /// Convert unquoted `true`/`false`/`null` style literals to typed values
    pub typed_literals: bool,
    /// Accept a leading `export ` before keys
    pub allow_export: bool,
    /// Interpret backslash escapes inside double quotes
    pub escapes: bool,
    /// Character that starts an inline comment after an unquoted value
    pub inline_comment: &'static str,
}

impl Dialect {
    pub(crate) const INI: Dialect = Dialect {
        typed_literals: true,
        allow_export: false,
        escapes: false,
        inline_comment: ";",
    };
}

/// Parses `content` with the shared grammar.
///
/// Sections (`[name]`) become one level of nesting; keys before the first
/// section are top-level. Repeated keys overwrite earlier ones, repeated
/// sections extend the same mapping.
pub(crate) fn parse_lines(content: &str, dialect: Dialect) -> Result<ConfigMap> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut root = ConfigMap::new();
    let mut section: Option<String> = None;

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or_else(|| syntax(line_no, "unterminated section header"))?
                .trim();
            if name.is_empty() {
                return Err(syntax(line_no, "empty section name"));
            }
            let slot = root
                .entry(name.to_string())
                .or_insert_with(|| ConfigValue::Map(ConfigMap::new()));
            if !slot.is_map() {
                *slot = ConfigValue::Map(ConfigMap::new());
            }
            section = Some(name.to_string());
            continue;
        }

        let line = if dialect.allow_export {
            line.strip_prefix("export ").map(str::trim_start).unwrap_or(line)
        } else {
            line
        };
        let (key, raw_value) = line
            .split_once('=')
            .ok_or_else(|| syntax(line_no, "expected '='"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(syntax(line_no, "empty key"));
        }
        let value = parse_value(raw_value.trim(), dialect, line_no)?;

        match &section {
            Some(name) => {
                let slot = root
                    .entry(name.clone())
                    .or_insert_with(|| ConfigValue::Map(ConfigMap::new()));
                if let ConfigValue::Map(map) = slot {
                    insert_entry(map, key, value, line_no)?;
                } else {
                    let mut map = ConfigMap::new();
                    insert_entry(&mut map, key, value, line_no)?;
                    *slot = ConfigValue::Map(map);
                }
            }
            None => insert_entry(&mut root, key, value, line_no)?,
        }
    }

    Ok(root)
}

fn syntax(line_no: usize, message: &str) -> ConfigError {
    ConfigError::parse(format!("line {}: {}", line_no, message))
}

/// Inserts one entry, handling `name[]` (append) and `name[sub]` (nested key).
fn insert_entry(
    target: &mut ConfigMap,
    key: &str,
    value: ConfigValue,
    line_no: usize,
) -> Result<()> {
    let Some(open) = key.find('[') else {
        target.insert(key.to_string(), value);
        return Ok(());
    };
    let inner = key[open + 1..]
        .strip_suffix(']')
        .ok_or_else(|| syntax(line_no, "unterminated '[' in key"))?
        .trim();
    let name = key[..open].trim();
    if name.is_empty() {
        return Err(syntax(line_no, "empty key"));
    }

    let slot = target.entry(name.to_string()).or_insert(ConfigValue::Null);
    if inner.is_empty() {
        match slot {
            ConfigValue::List(items) => items.push(value),
            other => *other = ConfigValue::List(vec![value]),
        }
    } else {
        match slot {
            ConfigValue::Map(map) => {
                map.insert(inner.to_string(), value);
            }
            other => {
                let mut map = ConfigMap::new();
                map.insert(inner.to_string(), value);
                *other = ConfigValue::Map(map);
            }
        }
    }
    Ok(())
}

fn parse_value(raw: &str, dialect: Dialect, line_no: usize) -> Result<ConfigValue> {
    if let Some(rest) = raw.strip_prefix('"') {
        let (text, tail) = read_double_quoted(rest, dialect.escapes)
            .ok_or_else(|| syntax(line_no, "unterminated double quote"))?;
        check_tail(tail, line_no)?;
        return Ok(ConfigValue::String(text));
    }
    if let Some(rest) = raw.strip_prefix('\'') {
        let (text, tail) = rest
            .split_once('\'')
            .ok_or_else(|| syntax(line_no, "unterminated single quote"))?;
        check_tail(tail, line_no)?;
        return Ok(ConfigValue::String(text.to_string()));
    }

    let text = strip_inline_comment(raw, dialect.inline_comment).trim();
    if dialect.typed_literals {
        match text.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" => return Ok(ConfigValue::Bool(true)),
            "false" | "off" | "no" | "none" => return Ok(ConfigValue::Bool(false)),
            "null" => return Ok(ConfigValue::Null),
            _ => {}
        }
    }
    Ok(ConfigValue::String(text.to_string()))
}

/// Reads up to the closing quote, returning the text and what follows it.
fn read_double_quoted(rest: &str, escapes: bool) -> Option<(String, &str)> {
    let mut text = String::new();
    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((text, &rest[i + 1..])),
            '\\' => {
                let (_, next) = chars.next()?;
                match next {
                    '"' => text.push('"'),
                    '\\' => text.push('\\'),
                    'n' if escapes => text.push('\n'),
                    'r' if escapes => text.push('\r'),
                    't' if escapes => text.push('\t'),
                    other => {
                        text.push('\\');
                        text.push(other);
                    }
                }
            }
            other => text.push(other),
        }
    }
    None
}

fn check_tail(tail: &str, line_no: usize) -> Result<()> {
    let tail = tail.trim();
    if tail.is_empty() || tail.starts_with(';') || tail.starts_with('#') {
        Ok(())
    } else {
        Err(syntax(line_no, "unexpected text after quoted value"))
    }
}

fn strip_inline_comment<'a>(raw: &'a str, marker: &str) -> &'a str {
    if raw.starts_with(marker.trim_start()) {
        return "";
    }
    match raw.find(marker) {
        Some(pos) => &raw[..pos],
        None => raw,
    }
}

/// Parser for sectioned `key = value` files.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::IniParser;
/// use layercfg::domain::ConfigValue;
/// use layercfg::ports::ConfigParser;
///
/// let parser = IniParser::new();
/// let map = parser.parse("[db]\nhost=localhost\n").unwrap();
/// assert_eq!(map["db"].as_map().unwrap()["host"], ConfigValue::from("localhost"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct IniParser;

impl IniParser {
    /// Creates a new INI parser.
    pub fn new() -> Self {
        IniParser
    }
}

impl ConfigParser for IniParser {
    fn parse(&self, content: &str) -> Result<ConfigMap> {
        parse_lines(content, Dialect::INI)
    }
}
