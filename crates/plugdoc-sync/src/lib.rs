//! plugdoc Sync - regenerate the reference documents from the catalog
//!
//! Orchestrates `plugdoc-catalog` and `plugdoc-render`: load and validate
//! the catalog, aggregate statistics once, render each selected document
//! and write only the ones whose content changed.

#![deny(unsafe_code, unused_imports, unused_variables)]

pub mod config;
pub mod error;
pub mod sync;

pub use config::{Config, Overrides};
pub use error::SyncError;
pub use sync::{sync, DocumentOutcome, DocumentStatus, SyncOptions, SyncReport};
