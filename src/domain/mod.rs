// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and logic.
//!
//! This module contains the value model of configuration documents, the
//! slash-delimited path addressing over it, the keys of the parse cache and the
//! error type. It performs no I/O beyond reading a file's modification time.

pub mod cache_key;
pub mod config_value;
pub mod errors;
pub mod format;
pub mod path;

// Re-export commonly used types
pub use cache_key::{CacheKey, SourceStamp};
pub use config_value::{ConfigMap, ConfigValue};
pub use errors::{ConfigError, Result};
pub use format::Format;
pub use path::{flatten_paths, path_get, path_lookup, path_set, PathLookup};
