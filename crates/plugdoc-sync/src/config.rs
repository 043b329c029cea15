use plugdoc_catalog::CatalogSource;
use plugdoc_render::{DocumentKind, RenderError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Built-in defaults, the lowest configuration layer
const DEFAULT_CONFIG: &str = r#"
[catalog]
path = ".claude-plugin/marketplace.json"
root = "."

[output]
dir = "docs"
documents = ["agents", "agent-skills", "plugins", "usage"]

[logging]
level = "info"  # trace, debug, info, warn, error
json = false
"#;

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Manifest path, relative to `root` unless absolute
    pub path: PathBuf,
    /// Repository root holding `plugins/`
    pub root: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// Output directory, relative to the catalog root unless absolute
    pub dir: PathBuf,
    pub documents: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Values given on the command line, applied last
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub verbose: bool,
}

impl Config {
    /// Get the global config path: ~/.plugdoc/plugdoc.toml
    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".plugdoc").join("plugdoc.toml"))
    }

    /// Load configuration with layered approach:
    /// 1. Built-in defaults
    /// 2. Global config: ~/.plugdoc/plugdoc.toml (optional)
    /// 3. Local override: ./plugdoc.toml, or the file given with --config
    /// 4. Environment variables with PLUGDOC__ prefix
    /// 5. Command-line flags (highest priority)
    pub fn load(overrides: &Overrides) -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ));

        if let Some(global) = Self::global_config_path() {
            builder = builder.add_source(config::File::from(global).required(false));
        }

        builder = match &overrides.config_file {
            Some(path) => builder.add_source(config::File::from(path.as_path()).required(true)),
            None => builder.add_source(config::File::with_name("plugdoc").required(false)),
        };

        builder = builder.add_source(
            config::Environment::with_prefix("PLUGDOC")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("output.documents")
                .try_parsing(true),
        );

        if let Some(catalog) = &overrides.catalog {
            builder = builder.set_override("catalog.path", path_value(catalog))?;
        }
        if let Some(root) = &overrides.root {
            builder = builder.set_override("catalog.root", path_value(root))?;
        }
        if let Some(output) = &overrides.output {
            builder = builder.set_override("output.dir", path_value(output))?;
        }
        if overrides.verbose {
            builder = builder.set_override("logging.level", "debug")?;
        }

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Catalog manifest and root, with the manifest resolved against the root
    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::new(
            resolve(&self.catalog.root, &self.catalog.path),
            self.catalog.root.clone(),
        )
    }

    /// Output directory, resolved against the catalog root
    pub fn output_dir(&self) -> PathBuf {
        resolve(&self.catalog.root, &self.output.dir)
    }

    /// Configured document kinds, rejecting unknown selectors
    pub fn documents(&self) -> Result<Vec<DocumentKind>, RenderError> {
        self.output.documents.iter().map(|s| s.parse()).collect()
    }
}

fn path_value(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn defaults() -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = defaults();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert_eq!(config.documents().unwrap(), DocumentKind::ALL.to_vec());
        assert_eq!(
            config.catalog_source().path,
            PathBuf::from("./.claude-plugin/marketplace.json")
        );
        assert_eq!(config.output_dir(), PathBuf::from("./docs"));
    }

    #[test]
    fn test_paths_resolve_against_root() {
        let mut config = defaults();
        config.catalog.root = PathBuf::from("/repo");
        assert_eq!(
            config.catalog_source().path,
            PathBuf::from("/repo/.claude-plugin/marketplace.json")
        );
        assert_eq!(config.output_dir(), PathBuf::from("/repo/docs"));

        config.output.dir = PathBuf::from("/elsewhere/docs");
        assert_eq!(config.output_dir(), PathBuf::from("/elsewhere/docs"));
    }

    #[test]
    fn test_unknown_document_rejected() {
        let mut config = defaults();
        config.output.documents.push("changelog".into());
        assert_eq!(
            config.documents(),
            Err(RenderError::UnsupportedDocumentKind("changelog".into()))
        );
    }

    #[test]
    fn test_config_file_layer() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("custom.toml");
        std::fs::write(
            &file,
            "[output]\ndir = \"reference\"\ndocuments = [\"agents\"]\n",
        )
        .unwrap();

        let config = Config::load(&Overrides {
            config_file: Some(file),
            root: Some(PathBuf::from("/repo")),
            verbose: true,
            ..Overrides::default()
        })
        .unwrap();

        assert_eq!(config.output_dir(), PathBuf::from("/repo/reference"));
        assert_eq!(config.documents().unwrap(), vec![DocumentKind::AgentReference]);
        assert_eq!(config.logging.level, "debug");
        // Untouched keys keep their defaults
        assert_eq!(config.catalog.path, PathBuf::from(".claude-plugin/marketplace.json"));
    }
}
