// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment file parser.
//!
//! This module provides the parser for deployment environment files such as
//! `.env` and `.env.local`. The grammar is the key-file grammar (sections
//! included) with a few dotenv conventions layered on top.

use crate::adapters::ini_file::{parse_lines, Dialect};
use crate::domain::{ConfigMap, Result};
use crate::ports::ConfigParser;

/// Maximum length for environment keys
const MAX_ENV_KEY_LEN: usize = 512;

const ENV_DIALECT: Dialect = Dialect {
    typed_literals: false,
    allow_export: true,
    escapes: true,
    inline_comment: " #",
};

/// Parser for `KEY=VALUE` environment files.
///
/// Compared to [`IniParser`](crate::adapters::IniParser):
/// - a leading `export ` is ignored,
/// - double-quoted values understand `\n`, `\r`, `\t` escapes,
/// - unquoted values are kept as literal strings (`A=false` stays `"false"`),
/// - `#` starts a comment, inline only when preceded by a space.
///
/// Oversized keys are skipped with a debug log rather than failing the file.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::EnvParser;
/// use layercfg::domain::ConfigValue;
/// use layercfg::ports::ConfigParser;
///
/// let map = EnvParser::new().parse("export APP_ENV=prod\nDEBUG=false\n").unwrap();
/// assert_eq!(map["APP_ENV"], ConfigValue::from("prod"));
/// assert_eq!(map["DEBUG"], ConfigValue::from("false"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvParser;

impl EnvParser {
    /// Creates a new environment file parser.
    pub fn new() -> Self {
        EnvParser
    }
}

impl ConfigParser for EnvParser {
    fn parse(&self, content: &str) -> Result<ConfigMap> {
        let mut map = parse_lines(content, ENV_DIALECT)?;
        map.retain(|key, _| {
            let keep = key.len() <= MAX_ENV_KEY_LEN;
            if !keep {
                tracing::debug!(
                    "Skipping oversized environment key: key_len={} (max {})",
                    key.len(),
                    MAX_ENV_KEY_LEN
                );
            }
            keep
        });
        Ok(map)
    }
}
