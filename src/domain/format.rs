// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source formats.

use std::fmt;

/// The file formats the engine knows how to read.
///
/// A format decides the file extension used when a source identifier is
/// resolved by convention, where the file is searched for, and which cache
/// domain its parsed results are stored under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// Sectioned `key = value` files (`*.ini`) in the config directory.
    KeyFile,
    /// Deployment environment files (`.env`, `.env.local`) at the app root.
    Env,
    /// Compiled artifacts written by the compiled artifact cache.
    CompiledArray,
}

impl Format {
    /// Extension appended to conventional source identifiers, if any.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Format::KeyFile => Some("ini"),
            Format::Env => None,
            Format::CompiledArray => Some("json"),
        }
    }

    /// Whether conventional sources live under the config subdirectory rather
    /// than directly at the application (or package) root.
    pub fn uses_config_dir(&self) -> bool {
        !matches!(self, Format::Env)
    }

    /// Tag appended to the cache domain so formats never share artifacts.
    ///
    /// Compiled artifacts have no domain; their tag names the store
    /// subdirectory instead.
    pub fn cache_kind(&self) -> &'static str {
        match self {
            Format::KeyFile => "config",
            Format::Env => "env",
            Format::CompiledArray => "compiler",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::KeyFile => "ini",
            Format::Env => "env",
            Format::CompiledArray => "compiled-array",
        };
        write!(f, "{}", name)
    }
}
