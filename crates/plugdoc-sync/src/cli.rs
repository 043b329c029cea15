//! Command-line interface

use clap::{Args, Parser, Subcommand};
use plugdoc_render::{DocumentKind, RenderError};
use plugdoc_sync::Overrides;
use std::path::PathBuf;

/// plugdoc - keep plugin reference docs in sync with the marketplace catalog
#[derive(Parser, Debug)]
#[command(name = "plugdoc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Catalog manifest to read (default: .claude-plugin/marketplace.json)
    #[arg(long, value_name = "PATH", global = true, env = "PLUGDOC_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Repository root that plugin paths are relative to
    #[arg(long, value_name = "DIR", global = true)]
    pub root: Option<PathBuf>,

    /// Output directory for generated documents
    #[arg(short, long, value_name = "DIR", global = true)]
    pub output: Option<PathBuf>,

    /// Run in verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_file: self.config.clone(),
            catalog: self.catalog.clone(),
            root: self.root.clone(),
            output: self.output.clone(),
            verbose: self.verbose,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Regenerate the reference documents (default)
    Sync(SyncArgs),

    /// Validate the catalog without writing anything
    Validate,

    /// Print plugin and component counts
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add, update or remove plugin entries in the catalog
    #[command(subcommand)]
    Plugin(PluginCommand),
}

#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Regenerate a single document: agents, agent-skills, plugins or usage
    #[arg(short, long, value_name = "KIND", value_parser = parse_document_kind)]
    pub file: Option<DocumentKind>,

    /// Show the rendered documents without writing files
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_document_kind(s: &str) -> Result<DocumentKind, RenderError> {
    s.parse()
}

#[derive(Subcommand, Debug)]
pub enum PluginCommand {
    /// Add a new plugin
    Add(AddArgs),

    /// Update an existing plugin
    Update(UpdateArgs),

    /// Remove a plugin
    Remove {
        /// Plugin name
        #[arg(long)]
        name: String,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Plugin name
    #[arg(long)]
    pub name: String,

    /// Plugin description
    #[arg(long)]
    pub description: String,

    /// Plugin version
    #[arg(long = "version", id = "plugin_version")]
    pub version: String,

    /// Plugin category (default: general)
    #[arg(long)]
    pub category: Option<String>,

    /// Comma-separated list of agent files
    #[arg(long, value_delimiter = ',')]
    pub agents: Vec<String>,

    /// Comma-separated list of command files
    #[arg(long, value_delimiter = ',')]
    pub commands: Vec<String>,

    /// Comma-separated list of skill directories
    #[arg(long, value_delimiter = ',')]
    pub skills: Vec<String>,

    /// Comma-separated list of keywords
    #[arg(long, value_delimiter = ',')]
    pub keywords: Vec<String>,

    /// License identifier
    #[arg(long, default_value = "MIT")]
    pub license: String,

    /// Enable strict mode
    #[arg(long)]
    pub strict: bool,

    /// Author name
    #[arg(long)]
    pub author_name: Option<String>,

    /// Author URL
    #[arg(long)]
    pub author_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Plugin name
    #[arg(long)]
    pub name: String,

    /// Updated description
    #[arg(long)]
    pub description: Option<String>,

    /// Updated version
    #[arg(long = "version", id = "plugin_version")]
    pub version: Option<String>,

    /// Updated category
    #[arg(long)]
    pub category: Option<String>,

    /// Updated keywords (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub keywords: Option<Vec<String>>,

    /// Agent file to add
    #[arg(long)]
    pub add_agent: Option<String>,

    /// Agent file to remove
    #[arg(long)]
    pub remove_agent: Option<String>,

    /// Command file to add
    #[arg(long)]
    pub add_command: Option<String>,

    /// Command file to remove
    #[arg(long)]
    pub remove_command: Option<String>,

    /// Skill directory to add
    #[arg(long)]
    pub add_skill: Option<String>,

    /// Skill directory to remove
    #[arg(long)]
    pub remove_skill: Option<String>,
}
