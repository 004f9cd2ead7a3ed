// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered file configuration with an mtime-keyed parse cache.
//!
//! `layercfg` loads configuration sources (ini-style key files and deployment
//! `.env` files) by logical name, merges them into ordered documents, and
//! caches each parse in a store directory keyed by the source file's
//! modification time, so an edited file is re-parsed exactly once.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and pure logic (`ConfigValue`, path addressing,
//!   cache keys, errors)
//! - **Ports**: Trait definitions at the seams (`ConfigParser`, `SourceLocator`,
//!   `ParseCache`, `FileFormatter`)
//! - **Adapters**: The ini and env parsers, the conventional locator, the
//!   filesystem cache and the compiled artifact cache
//! - **Service**: Documents and the registry holding the main document per format
//!
//! # Feature Flags
//!
//! - `cli`: Build the `layercfg` command-line tool (default)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use layercfg::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let context = ConfigContext::new(SourceLayout::new("/srv/app"), "/srv/app/var/store");
//! let registry = ConfigRegistry::new(context);
//!
//! registry.build(Format::KeyFile, "engine", false, true)?;
//! registry.build_env()?;
//!
//! let host = registry.get(Format::KeyFile, "db/host", "localhost");
//! let env = registry.get(Format::Env, "APP_ENV", "prod");
//! println!("{} ({})", host, env);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::{CommandLineOverrides, CompiledArtifactCache, SourceLayout};
    pub use crate::domain::{ConfigError, ConfigMap, ConfigValue, Format, Result};
    pub use crate::ports::{ConfigParser, ParseCache, SourceLocator};
    pub use crate::service::{ConfigContext, ConfigDocument, ConfigRegistry};
}
