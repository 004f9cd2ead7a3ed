// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer: documents and the registry that owns the main ones.
//!
//! `ConfigContext` bundles the adapters a document loads through,
//! `ConfigDocument` is one merged mapping, and `ConfigRegistry` builds
//! documents and keeps the main document of each format.

pub mod context;
pub mod document;
pub mod registry;

pub use context::ConfigContext;
pub use document::ConfigDocument;
pub use registry::{ConfigRegistry, ENV_SOURCES};
