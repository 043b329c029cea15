//! plugdoc Render - Markdown reference documents from the catalog
//!
//! Each [`DocumentKind`] is a fixed skeleton filled from the validated
//! catalog and its statistics. Output is a pure function of
//! `(kind, catalog, statistics, generated_at)`: the timestamp appears on
//! exactly one line, so documents rendered from the same catalog differ only
//! there.

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

use chrono::{DateTime, Utc};
use plugdoc_catalog::{aggregate, Statistics};
use plugdoc_types::Catalog;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

mod documents;
mod markdown;

pub use markdown::{GENERATED_MARKER, TIMESTAMP_PREFIX};

/// Rendering contract violations. These indicate a caller bug, not bad
/// catalog data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Selector outside the closed set of document kinds
    #[error("Unsupported document kind '{0}' (expected one of: agents, agent-skills, plugins, usage)")]
    UnsupportedDocumentKind(String),

    /// Statistics were not derived from the catalog being rendered
    #[error("Statistics do not match the catalog being rendered")]
    StatisticsMismatch,
}

/// The fixed set of generated documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKind {
    /// `agents.md`
    AgentReference,
    /// `agent-skills.md`
    SkillReference,
    /// `plugins.md`
    PluginDirectory,
    /// `usage.md`
    UsageGuide,
}

impl DocumentKind {
    /// Every kind, in default output order
    pub const ALL: [DocumentKind; 4] = [
        Self::AgentReference,
        Self::SkillReference,
        Self::PluginDirectory,
        Self::UsageGuide,
    ];

    /// Selector used on the command line and in config
    pub fn selector(self) -> &'static str {
        match self {
            Self::AgentReference => "agents",
            Self::SkillReference => "agent-skills",
            Self::PluginDirectory => "plugins",
            Self::UsageGuide => "usage",
        }
    }

    /// Output file name, relative to the output directory
    pub fn file_name(self) -> &'static str {
        match self {
            Self::AgentReference => "agents.md",
            Self::SkillReference => "agent-skills.md",
            Self::PluginDirectory => "plugins.md",
            Self::UsageGuide => "usage.md",
        }
    }

    /// Top-level heading of the document
    pub fn title(self) -> &'static str {
        match self {
            Self::AgentReference => "Agent Reference",
            Self::SkillReference => "Agent Skills Reference",
            Self::PluginDirectory => "Plugin Directory",
            Self::UsageGuide => "Usage Guide",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

impl FromStr for DocumentKind {
    type Err = RenderError;

    /// Accepts the selector (`agents`) or the file name (`agents.md`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.selector() == wanted || kind.file_name() == wanted)
            .ok_or_else(|| RenderError::UnsupportedDocumentKind(s.to_string()))
    }
}

/// Render one document
pub fn render(
    kind: DocumentKind,
    catalog: &Catalog,
    stats: &Statistics,
    generated_at: DateTime<Utc>,
) -> Result<String, RenderError> {
    if *stats != aggregate(catalog) {
        return Err(RenderError::StatisticsMismatch);
    }

    let mut out = String::new();
    markdown::header(&mut out, kind, catalog);

    match kind {
        DocumentKind::AgentReference => documents::agents::render(&mut out, catalog, stats),
        DocumentKind::SkillReference => documents::skills::render(&mut out, catalog, stats),
        DocumentKind::PluginDirectory => documents::plugins::render(&mut out, catalog, stats),
        DocumentKind::UsageGuide => documents::usage::render(&mut out, catalog, stats),
    }

    markdown::footer(&mut out, generated_at);
    debug!("Rendered {} ({} bytes)", kind.file_name(), out.len());
    Ok(out)
}

/// Render the document named by a string selector
pub fn render_named(
    selector: &str,
    catalog: &Catalog,
    stats: &Statistics,
    generated_at: DateTime<Utc>,
) -> Result<String, RenderError> {
    render(selector.parse()?, catalog, stats, generated_at)
}

/// Whether two renderings are the same document apart from the timestamp
/// line. Only the final line is treated as the timestamp; body text that
/// happens to start with the same prefix is still compared.
pub fn same_content(a: &str, b: &str) -> bool {
    without_timestamp(a) == without_timestamp(b)
}

fn without_timestamp(text: &str) -> &str {
    let trimmed = text.strip_suffix('\n').unwrap_or(text);
    let start = trimmed.rfind('\n').map_or(0, |i| i + 1);
    if trimmed[start..].starts_with(TIMESTAMP_PREFIX) {
        &text[..start]
    } else {
        text
    }
}
