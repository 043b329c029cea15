//! On-disk marketplace manifest
//!
//! Mirrors the `marketplace.json` layout the plugin host reads. Unknown keys
//! are kept in `extra` so that editing a manifest never drops fields this
//! tool does not understand.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{EditError, LoadError};

/// Category given to plugins added without one
pub const DEFAULT_CATEGORY: &str = "general";

/// Serialization of a manifest file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `marketplace.json`
    Json,
    /// `marketplace.toml`
    Toml,
}

impl SourceFormat {
    /// `.toml` files are TOML; everything else is read as JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Root of the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marketplace {
    /// Marketplace name
    pub name: String,
    /// Marketplace owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerEntry>,
    /// Marketplace-level metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataEntry>,
    /// Plugin entries in declaration order
    pub plugins: Vec<PluginEntry>,
    /// Keys this tool does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `owner` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerEntry {
    /// Owner display name
    #[serde(default)]
    pub name: String,
    /// Contact address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Owner homepage, usually a GitHub URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// `metadata` block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Marketplace description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Marketplace version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Keys this tool does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Author can be a bare name or an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorEntry {
    /// `"author": "Jane"`
    Name(String),
    /// `"author": { "name": "Jane", "url": "..." }`
    Detailed {
        /// Author name
        #[serde(default)]
        name: String,
        /// Contact address
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        /// Author homepage
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

/// A component reference: a bare relative path, or a path with metadata
/// that overrides the referenced file's frontmatter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentRef {
    /// `"./agents/reviewer.md"`
    Path(String),
    /// `{ "path": "./agents/reviewer.md", "name": "reviewer", ... }`
    Detailed {
        /// Path relative to the plugin directory
        path: String,
        /// Display name override
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// Description override
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// Model override (agents only)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },
}

impl ComponentRef {
    /// Path relative to the plugin directory
    pub fn path(&self) -> &str {
        match self {
            Self::Path(path) | Self::Detailed { path, .. } => path,
        }
    }

    /// Declared name override, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Path(_) => None,
            Self::Detailed { name, .. } => name.as_deref(),
        }
    }

    /// Declared description override, if any
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Path(_) => None,
            Self::Detailed { description, .. } => description.as_deref(),
        }
    }

    /// Declared model override, if any
    pub fn model(&self) -> Option<&str> {
        match self {
            Self::Path(_) => None,
            Self::Detailed { model, .. } => model.as_deref(),
        }
    }
}

/// One entry of `plugins[]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginEntry {
    /// Unique hyphen-case name
    pub name: String,
    /// Plugin directory relative to the repository root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// One-line description
    pub description: String,
    /// Semver version string
    pub version: String,
    /// Grouping label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Plugin author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorEntry>,
    /// SPDX license identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Search keywords
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Homepage URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Repository URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Host strict-mode flag, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    /// Agent files
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<ComponentRef>,
    /// Command files
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<ComponentRef>,
    /// Skill directories
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<ComponentRef>,
    /// Keys this tool does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PluginEntry {
    /// Plugin directory relative to the root: `source`, or `plugins/<name>`
    pub fn source_dir(&self) -> String {
        self.source
            .clone()
            .unwrap_or_else(|| format!("./plugins/{}", self.name))
    }
}

/// Fields for a new plugin entry. Component lists hold bare file or
/// directory names; the conventional `./agents/`, `./commands/` and
/// `./skills/` prefixes are added on insertion.
#[derive(Debug, Clone, Default)]
pub struct NewPlugin {
    /// Plugin name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Version string
    pub version: String,
    /// Grouping label, `general` when unset
    pub category: Option<String>,
    /// Agent file names
    pub agents: Vec<String>,
    /// Command file names
    pub commands: Vec<String>,
    /// Skill directory names
    pub skills: Vec<String>,
    /// Search keywords
    pub keywords: Vec<String>,
    /// License, `MIT` when unset
    pub license: Option<String>,
    /// Host strict-mode flag
    pub strict: bool,
    /// Author name; the owner is used when both author fields are unset
    pub author_name: Option<String>,
    /// Author URL
    pub author_url: Option<String>,
}

/// Changes to apply to an existing plugin entry
#[derive(Debug, Clone, Default)]
pub struct PluginUpdate {
    /// New description
    pub description: Option<String>,
    /// New version
    pub version: Option<String>,
    /// New category
    pub category: Option<String>,
    /// Replacement keyword list
    pub keywords: Option<Vec<String>>,
    /// Agent file to add
    pub add_agent: Option<String>,
    /// Agent file to remove
    pub remove_agent: Option<String>,
    /// Command file to add
    pub add_command: Option<String>,
    /// Command file to remove
    pub remove_command: Option<String>,
    /// Skill directory to add
    pub add_skill: Option<String>,
    /// Skill directory to remove
    pub remove_skill: Option<String>,
}

impl Marketplace {
    /// Parse manifest text
    pub fn parse(text: &str, format: SourceFormat) -> Result<Self, String> {
        match format {
            SourceFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            SourceFormat::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        }
    }

    /// Read and parse a manifest file
    pub fn read(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let manifest =
            Self::parse(&text, SourceFormat::from_path(path)).map_err(|reason| {
                LoadError::Parse {
                    path: path.to_path_buf(),
                    reason,
                }
            })?;

        debug!(
            "Read manifest {:?} ({} plugin entries)",
            path,
            manifest.plugins.len()
        );
        Ok(manifest)
    }

    /// Serialize the manifest. JSON output ends with a trailing newline.
    pub fn to_string_pretty(&self, format: SourceFormat) -> Result<String, EditError> {
        match format {
            SourceFormat::Json => serde_json::to_string_pretty(self)
                .map(|mut text| {
                    text.push('\n');
                    text
                })
                .map_err(|e| EditError::Serialize(e.to_string())),
            SourceFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| EditError::Serialize(e.to_string()))
            }
        }
    }

    /// Write the manifest back to `path`
    pub fn save(&self, path: &Path) -> Result<(), EditError> {
        let text = self.to_string_pretty(SourceFormat::from_path(path))?;
        fs::write(path, text).map_err(|source| EditError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Saved manifest {:?}", path);
        Ok(())
    }

    /// Find a plugin entry by name
    pub fn plugin(&self, name: &str) -> Option<&PluginEntry> {
        self.plugins.iter().find(|p| p.name == name)
    }

    fn plugin_mut(&mut self, name: &str) -> Result<&mut PluginEntry, EditError> {
        self.plugins
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| EditError::PluginNotFound {
                name: name.to_string(),
            })
    }

    /// Append a new plugin entry
    pub fn add_plugin(&mut self, new: NewPlugin) -> Result<(), EditError> {
        if self.plugin(&new.name).is_some() {
            return Err(EditError::PluginExists { name: new.name });
        }

        let author = if new.author_name.is_some() || new.author_url.is_some() {
            Some(AuthorEntry::Detailed {
                name: new.author_name.unwrap_or_default(),
                email: None,
                url: new.author_url,
            })
        } else {
            self.owner.as_ref().map(|owner| AuthorEntry::Detailed {
                name: owner.name.clone(),
                email: None,
                url: owner.url.clone(),
            })
        };

        // Only GitHub owner URLs double as plugin homepage and repository
        let github_url = self
            .owner
            .as_ref()
            .and_then(|o| o.url.clone())
            .filter(|url| url.contains("github.com"));

        let entry = PluginEntry {
            source: Some(format!("./plugins/{}", new.name)),
            name: new.name,
            description: new.description,
            version: new.version,
            category: Some(
                new.category
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            ),
            author,
            license: Some(new.license.unwrap_or_else(|| "MIT".to_string())),
            keywords: new.keywords,
            homepage: github_url.clone(),
            repository: github_url,
            strict: Some(new.strict),
            agents: component_refs("agents", &new.agents),
            commands: component_refs("commands", &new.commands),
            skills: component_refs("skills", &new.skills),
            extra: Map::new(),
        };

        info!("Added plugin '{}' to marketplace", entry.name);
        self.plugins.push(entry);
        Ok(())
    }

    /// Apply `update` to the named plugin
    pub fn update_plugin(&mut self, name: &str, update: PluginUpdate) -> Result<(), EditError> {
        let plugin = self.plugin_mut(name)?;

        if let Some(description) = update.description {
            plugin.description = description;
        }
        if let Some(version) = update.version {
            plugin.version = version;
        }
        if let Some(category) = update.category {
            plugin.category = Some(category);
        }
        if let Some(keywords) = update.keywords {
            plugin.keywords = keywords;
        }

        if let Some(agent) = update.add_agent {
            add_ref(&mut plugin.agents, "agents", &agent);
        }
        if let Some(agent) = update.remove_agent {
            remove_ref(&mut plugin.agents, "agents", &agent);
        }
        if let Some(command) = update.add_command {
            add_ref(&mut plugin.commands, "commands", &command);
        }
        if let Some(command) = update.remove_command {
            remove_ref(&mut plugin.commands, "commands", &command);
        }
        if let Some(skill) = update.add_skill {
            add_ref(&mut plugin.skills, "skills", &skill);
        }
        if let Some(skill) = update.remove_skill {
            remove_ref(&mut plugin.skills, "skills", &skill);
        }

        info!("Updated plugin '{}' in marketplace", name);
        Ok(())
    }

    /// Remove the named plugin
    pub fn remove_plugin(&mut self, name: &str) -> Result<PluginEntry, EditError> {
        let index = self
            .plugins
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| EditError::PluginNotFound {
                name: name.to_string(),
            })?;

        info!("Removed plugin '{}' from marketplace", name);
        Ok(self.plugins.remove(index))
    }
}

fn component_path(dir: &str, file: &str) -> String {
    format!("./{}/{}", dir, file.trim())
}

fn component_refs(dir: &str, files: &[String]) -> Vec<ComponentRef> {
    files
        .iter()
        .filter(|f| !f.trim().is_empty())
        .map(|f| ComponentRef::Path(component_path(dir, f)))
        .collect()
}

fn add_ref(refs: &mut Vec<ComponentRef>, dir: &str, file: &str) {
    let path = component_path(dir, file);
    if !refs.iter().any(|r| same_path(r.path(), &path)) {
        refs.push(ComponentRef::Path(path));
    }
}

fn remove_ref(refs: &mut Vec<ComponentRef>, dir: &str, file: &str) {
    let path = component_path(dir, file);
    refs.retain(|r| !same_path(r.path(), &path));
}

fn same_path(a: &str, b: &str) -> bool {
    PathBuf::from(a.trim_start_matches("./")) == PathBuf::from(b.trim_start_matches("./"))
}
