// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! between configuration documents and the outside world: how sources are
//! located, how they are parsed, and where parsed results are cached. These
//! traits are implemented by adapters in the adapters layer.

pub mod cache;
pub mod locator;
pub mod parser;

// Re-export commonly used types
pub use cache::ParseCache;
pub use locator::{ResolvedSource, SourceLocator};
pub use parser::{ConfigParser, FileFormatter};
