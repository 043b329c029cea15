//! Error types for catalog loading and editing

use plugdoc_types::ComponentKind;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// What a dangling path was supposed to point at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// The plugin's own directory
    PluginDirectory,
    /// An agent definition file
    Agent,
    /// A command definition file
    Command,
    /// A skill directory
    SkillDirectory,
    /// The `SKILL.md` inside an existing skill directory
    SkillDefinition,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PluginDirectory => write!(f, "plugin directory"),
            Self::Agent => write!(f, "agent file"),
            Self::Command => write!(f, "command file"),
            Self::SkillDirectory => write!(f, "skill directory"),
            Self::SkillDefinition => write!(f, "skill definition"),
        }
    }
}

/// Where a name must be unique
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameScope {
    /// Plugin names, across every category
    Catalog,
    /// Component names of one kind within a plugin
    Plugin {
        /// Owning plugin
        plugin: String,
        /// Component kind
        kind: ComponentKind,
    },
}

impl fmt::Display for NameScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog => write!(f, "plugin"),
            Self::Plugin { plugin, kind } => write!(f, "{kind} in plugin '{plugin}'"),
        }
    }
}

/// A single catalog defect. The loader collects all of them in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A referenced path does not exist on disk
    #[error("Plugin '{plugin}': {kind} not found: {}", path.display())]
    DanglingReference {
        /// Owning plugin
        plugin: String,
        /// What the path should be
        kind: ReferenceKind,
        /// Resolved path that was checked
        path: PathBuf,
    },

    /// A name appears more than once in its scope
    #[error("Duplicate {scope} name: {name}")]
    DuplicateName {
        /// Uniqueness scope
        scope: NameScope,
        /// The repeated name
        name: String,
    },

    /// A plugin that bundles only skills (or nothing)
    #[error("Plugin '{plugin}' declares no agents or commands")]
    PluginWithoutAgentOrCommand {
        /// Offending plugin
        plugin: String,
    },

    /// Plugin name is not hyphen-case
    #[error("Plugin name '{name}' must be hyphen-case (lowercase letters, digits and single hyphens)")]
    InvalidName {
        /// Offending name
        name: String,
    },
}

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    /// Catalog file could not be read
    #[error("Failed to read catalog {}: {source}", path.display())]
    Read {
        /// Catalog path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Catalog is malformed or misses a required field
    #[error("Invalid catalog {}: {reason}", path.display())]
    Parse {
        /// Catalog path
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Catalog parsed but violates one or more invariants
    #[error("Catalog failed validation with {} error(s)", .0.len())]
    Invalid(Vec<ValidationError>),
}

impl LoadError {
    /// Validation errors carried by this error, if any
    pub fn violations(&self) -> &[ValidationError] {
        match self {
            Self::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

/// Catalog editing errors
#[derive(Debug, Error)]
pub enum EditError {
    /// `add` with a name already present
    #[error("Plugin '{name}' already exists in marketplace")]
    PluginExists {
        /// Plugin name
        name: String,
    },

    /// `update`/`remove` with an unknown name
    #[error("Plugin '{name}' not found in marketplace")]
    PluginNotFound {
        /// Plugin name
        name: String,
    },

    /// The catalog could not be read back
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The edited catalog could not be serialized
    #[error("Failed to serialize catalog: {0}")]
    Serialize(String),

    /// The edited catalog could not be written
    #[error("Failed to write catalog {}: {source}", path.display())]
    Write {
        /// Catalog path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}
