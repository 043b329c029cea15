//! plugdoc Catalog
//!
//! Loads the marketplace manifest, validates it against the plugin tree on
//! disk and derives the statistics the documentation is built from.
//!
//! ## Pipeline
//!
//! 1. [`manifest`]: parse `marketplace.json` (or `.toml`) into raw entries
//! 2. [`loader`]: resolve every agent/command/skill reference, read its
//!    frontmatter and collect all validation errors in one pass
//! 3. [`stats`]: recompute counts from the validated [`Catalog`]
//!
//! [`Catalog`]: plugdoc_types::Catalog

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod error;
pub mod frontmatter;
pub mod loader;
pub mod manifest;
pub mod stats;

pub use error::{EditError, LoadError, NameScope, ReferenceKind, ValidationError};
pub use loader::{load, load_manifest, CatalogSource};
pub use manifest::{Marketplace, NewPlugin, PluginUpdate, SourceFormat};
pub use stats::{aggregate, Counts, Statistics};
