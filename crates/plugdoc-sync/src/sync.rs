//! Sync driver: load → aggregate → render → write
//!
//! All selected documents are rendered in memory before anything touches the
//! output directory. Changed documents are then staged next to their targets
//! and renamed into place, so a validation or render failure never leaves a
//! half-regenerated document set behind.

use chrono::{DateTime, Utc};
use plugdoc_catalog::{aggregate, CatalogSource, Statistics};
use plugdoc_render::{render, same_content, DocumentKind};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::SyncError;

/// What a sync run should produce
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Documents to regenerate, in output order
    pub documents: Vec<DocumentKind>,
    /// Compute the report without writing
    pub dry_run: bool,
    /// Timestamp written into every document
    pub generated_at: DateTime<Utc>,
}

impl SyncOptions {
    /// Regenerate every document kind
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            documents: DocumentKind::ALL.to_vec(),
            dry_run: false,
            generated_at,
        }
    }

    /// Restrict the run to the given documents
    pub fn with_documents(mut self, documents: impl IntoIterator<Item = DocumentKind>) -> Self {
        self.documents.clear();
        for kind in documents {
            if !self.documents.contains(&kind) {
                self.documents.push(kind);
            }
        }
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Outcome for one output document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Existing file matches apart from its timestamp; left untouched
    Unchanged,
    /// File did not exist
    Created,
    /// File existed with different content
    Updated,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged => write!(f, "unchanged"),
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
        }
    }
}

/// One line of the sync report
#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    /// Document kind
    pub kind: DocumentKind,
    /// Output path
    pub path: PathBuf,
    /// What happened (or would happen, in a dry run)
    pub status: DocumentStatus,
    /// Rendered text, kept only for dry runs
    pub content: Option<String>,
}

/// Result of a sync run
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Per-document outcomes, in the order requested
    pub documents: Vec<DocumentOutcome>,
    /// Statistics the documents were rendered from
    pub stats: Statistics,
    /// Whether files were left untouched on purpose
    pub dry_run: bool,
}

impl SyncReport {
    /// Status of one document, if it was part of the run
    pub fn status(&self, kind: DocumentKind) -> Option<DocumentStatus> {
        self.documents
            .iter()
            .find(|d| d.kind == kind)
            .map(|d| d.status)
    }

    /// Whether any document was created or updated
    pub fn changed(&self) -> bool {
        self.documents
            .iter()
            .any(|d| d.status != DocumentStatus::Unchanged)
    }

    /// Number of documents with the given status
    pub fn count(&self, status: DocumentStatus) -> usize {
        self.documents.iter().filter(|d| d.status == status).count()
    }
}

/// Regenerate the selected documents under `output_dir`
pub fn sync(
    source: &CatalogSource,
    output_dir: &Path,
    options: &SyncOptions,
) -> Result<SyncReport, SyncError> {
    info!("Syncing documentation from {:?} into {:?}", source.path, output_dir);

    let catalog = plugdoc_catalog::load(source)?;
    let stats = aggregate(&catalog);
    info!(
        "Catalog '{}': {} plugins, {} agents, {} commands, {} skills",
        catalog.name,
        stats.totals.plugins,
        stats.totals.agents,
        stats.totals.commands,
        stats.totals.skills
    );

    let mut rendered = Vec::with_capacity(options.documents.len());
    for &kind in &options.documents {
        let text = render(kind, &catalog, &stats, options.generated_at)?;
        let path = output_dir.join(kind.file_name());
        let status = compare(&path, &text)?;
        debug!("{}: {}", kind.file_name(), status);
        rendered.push((kind, path, status, text));
    }

    if options.dry_run {
        info!("Dry run: no files written");
    } else {
        let changed: Vec<_> = rendered
            .iter()
            .filter(|(_, _, status, _)| *status != DocumentStatus::Unchanged)
            .map(|(_, path, _, text)| (path.as_path(), text.as_str()))
            .collect();
        write_all(output_dir, &changed)?;
    }

    let documents = rendered
        .into_iter()
        .map(|(kind, path, status, text)| {
            info!("{} {}", status, path.display());
            DocumentOutcome {
                kind,
                path,
                status,
                content: options.dry_run.then_some(text),
            }
        })
        .collect();

    Ok(SyncReport {
        documents,
        stats,
        dry_run: options.dry_run,
    })
}

/// Compare freshly rendered text with what is on disk
fn compare(path: &Path, text: &str) -> Result<DocumentStatus, SyncError> {
    match fs::read_to_string(path) {
        Ok(existing) if same_content(&existing, text) => Ok(DocumentStatus::Unchanged),
        Ok(_) => Ok(DocumentStatus::Updated),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(DocumentStatus::Created),
        // Not UTF-8: certainly not something we generated
        Err(e) if e.kind() == ErrorKind::InvalidData => Ok(DocumentStatus::Updated),
        Err(source) => Err(SyncError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Stage every document beside its target, then rename them all into place
fn write_all(output_dir: &Path, documents: &[(&Path, &str)]) -> Result<(), SyncError> {
    if documents.is_empty() {
        return Ok(());
    }

    fs::create_dir_all(output_dir).map_err(|source| SyncError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut staged = Vec::with_capacity(documents.len());
    for (path, text) in documents {
        let temp = staging_path(path);
        if let Err(source) = fs::write(&temp, text) {
            discard(&staged);
            discard(&[(temp, path.to_path_buf())]);
            return Err(SyncError::Write {
                path: path.to_path_buf(),
                source,
            });
        }
        staged.push((temp, path.to_path_buf()));
    }

    for (index, (temp, path)) in staged.iter().enumerate() {
        if let Err(source) = fs::rename(temp, path) {
            discard(&staged[index..]);
            return Err(SyncError::Write {
                path: path.clone(),
                source,
            });
        }
    }

    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.plugdoc-tmp", name))
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (temp, _) in staged {
        if let Err(e) = fs::remove_file(temp) {
            if e.kind() != ErrorKind::NotFound {
                warn!("Failed to remove staging file {:?}: {}", temp, e);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_with_documents_deduplicates() {
        let options = SyncOptions::new(Utc::now()).with_documents([
            DocumentKind::UsageGuide,
            DocumentKind::AgentReference,
            DocumentKind::UsageGuide,
        ]);
        assert_eq!(
            options.documents,
            vec![DocumentKind::UsageGuide, DocumentKind::AgentReference]
        );
    }

    #[test]
    fn test_compare_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agents.md");
        let text = "# Agents\n*Last generated: 2026-10-19 00:00:00 UTC*\n";

        assert_eq!(compare(&path, text).unwrap(), DocumentStatus::Created);

        fs::write(&path, "# Agents\n*Last generated: 2025-01-01 00:00:00 UTC*\n").unwrap();
        assert_eq!(compare(&path, text).unwrap(), DocumentStatus::Unchanged);

        fs::write(&path, "# Hand edited\n").unwrap();
        assert_eq!(compare(&path, text).unwrap(), DocumentStatus::Updated);

        fs::write(&path, [0xff_u8, 0xfe, 0x00]).unwrap();
        assert_eq!(compare(&path, text).unwrap(), DocumentStatus::Updated);
    }

    #[test]
    fn test_write_all_leaves_no_staging_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("docs");
        let a = out.join("a.md");
        let b = out.join("b.md");

        write_all(&out, &[(a.as_path(), "a\n"), (b.as_path(), "b\n")]).unwrap();

        assert_eq!(fs::read_to_string(&a).unwrap(), "a\n");
        assert_eq!(fs::read_to_string(&b).unwrap(), "b\n");
        let entries = fs::read_dir(&out).unwrap().count();
        assert_eq!(entries, 2);
    }

    #[test]
    fn test_staging_path_is_hidden_sibling() {
        assert_eq!(
            staging_path(Path::new("docs/agents.md")),
            PathBuf::from("docs/.agents.md.plugdoc-tmp")
        );
    }
}
