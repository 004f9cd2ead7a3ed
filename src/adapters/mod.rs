// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing implementations of the ports.
//!
//! This module contains the concrete parsers, the conventional source locator,
//! the filesystem parse cache, the compiled artifact cache and the command-line
//! overrides adapter.

pub mod cli;
pub mod compiled;
pub mod env_file;
pub mod fs_cache;
pub mod ini_file;
pub mod locator;

use crate::domain::Format;
use crate::ports::ConfigParser;
use std::sync::Arc;

pub use cli::CommandLineOverrides;
pub use compiled::{CompiledArrayFormatter, CompiledArtifactCache};
pub use env_file::EnvParser;
pub use fs_cache::{FsMtimeCache, NullCache};
pub use ini_file::IniParser;
pub use locator::{ConventionalLocator, SourceLayout};

/// Returns the built-in parser for `format`.
///
/// Compiled artifacts have none: they are read back whole by
/// [`CompiledArtifactCache`], never parsed into documents.
pub fn parser_for(format: Format) -> Option<Arc<dyn ConfigParser>> {
    match format {
        Format::KeyFile => Some(Arc::new(IniParser::new())),
        Format::Env => Some(Arc::new(EnvParser::new())),
        Format::CompiledArray => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_for_documents_only() {
        let ini = parser_for(Format::KeyFile).unwrap();
        assert!(ini.parse("[db]\nhost=x\n").unwrap().contains_key("db"));
        let env = parser_for(Format::Env).unwrap();
        assert!(env.parse("export A=1\n").unwrap().contains_key("A"));
        assert!(parser_for(Format::CompiledArray).is_none());
    }
}
