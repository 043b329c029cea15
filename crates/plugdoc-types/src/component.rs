use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The three kinds of component a plugin can bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Agent,
    Command,
    Skill,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 3] = [Self::Agent, Self::Command, Self::Skill];
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent => write!(f, "agent"),
            Self::Command => write!(f, "command"),
            Self::Skill => write!(f, "skill"),
        }
    }
}

/// A subagent definition file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub description: String,
    /// Free-form model identifier from the frontmatter, e.g. `sonnet`
    pub model: Option<String>,
    /// Path as written in the catalog, relative to the plugin
    pub declared_path: String,
    pub file: PathBuf,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        declared_path: impl Into<String>,
        file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            model: None,
            declared_path: declared_path.into(),
            file: file.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// A slash-command definition file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub declared_path: String,
    pub file: PathBuf,
}

impl Command {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        declared_path: impl Into<String>,
        file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            declared_path: declared_path.into(),
            file: file.into(),
        }
    }
}

/// A skill directory holding `SKILL.md` plus optional `assets/` and
/// `references/` subdirectories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub description: String,
    pub declared_path: String,
    pub dir: PathBuf,
    pub has_assets: bool,
    pub has_references: bool,
}

impl Skill {
    /// Name of the definition file every skill directory must contain
    pub const DEFINITION_FILE: &'static str = "SKILL.md";

    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        declared_path: impl Into<String>,
        dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            declared_path: declared_path.into(),
            dir: dir.into(),
            has_assets: false,
            has_references: false,
        }
    }
}
