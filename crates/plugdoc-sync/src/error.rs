//! Sync errors and process exit codes

use plugdoc_catalog::{EditError, LoadError};
use plugdoc_render::RenderError;
use std::path::PathBuf;
use thiserror::Error;

/// Catalog failed validation
pub const EXIT_VALIDATION: u8 = 1;
/// Bad command line or configuration (clap uses 2 as well)
pub const EXIT_USAGE: u8 = 2;
/// Catalog is malformed or misses a required field
pub const EXIT_SCHEMA: u8 = 3;
/// Reading or writing a file failed
pub const EXIT_IO: u8 = 4;
/// Renderer contract violation; a bug in plugdoc itself
pub const EXIT_INTERNAL: u8 = 70;

/// Sync driver errors
#[derive(Debug, Error)]
pub enum SyncError {
    /// Catalog could not be loaded or failed validation
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Renderer contract violation
    #[error(transparent)]
    Render(#[from] RenderError),

    /// An existing output document could not be read for comparison
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// An output document could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl SyncError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Load(e) => load_exit_code(e),
            Self::Render(e) => render_exit_code(e),
            Self::Read { .. } | Self::Write { .. } => EXIT_IO,
        }
    }
}

/// Process exit code for a rendering error. An unknown document kind comes
/// from user input; a statistics mismatch is a bug.
pub fn render_exit_code(error: &RenderError) -> u8 {
    match error {
        RenderError::UnsupportedDocumentKind(_) => EXIT_USAGE,
        RenderError::StatisticsMismatch => EXIT_INTERNAL,
    }
}

/// Process exit code for a catalog loading error
pub fn load_exit_code(error: &LoadError) -> u8 {
    match error {
        LoadError::Invalid(_) => EXIT_VALIDATION,
        LoadError::Parse { .. } => EXIT_SCHEMA,
        LoadError::Read { .. } => EXIT_IO,
    }
}

/// Process exit code for a catalog editing error
pub fn edit_exit_code(error: &EditError) -> u8 {
    match error {
        EditError::PluginExists { .. } | EditError::PluginNotFound { .. } => EXIT_USAGE,
        EditError::Load(e) => load_exit_code(e),
        EditError::Serialize(_) => EXIT_INTERNAL,
        EditError::Write { .. } => EXIT_IO,
    }
}

/// Find the most specific exit code in an error chain
pub fn exit_code(error: &anyhow::Error) -> u8 {
    for cause in error.chain() {
        if let Some(e) = cause.downcast_ref::<SyncError>() {
            return e.exit_code();
        }
        if let Some(e) = cause.downcast_ref::<LoadError>() {
            return load_exit_code(e);
        }
        if let Some(e) = cause.downcast_ref::<EditError>() {
            return edit_exit_code(e);
        }
        if let Some(e) = cause.downcast_ref::<RenderError>() {
            return render_exit_code(e);
        }
    }
    EXIT_INTERNAL
}
