//! Catalog loading and validation
//!
//! Turns a parsed manifest into a validated [`Catalog`]. Every violation is
//! collected in a single pass so one run reports everything wrong with the
//! catalog.

use plugdoc_types::{Agent, Author, Catalog, Command, ComponentKind, Owner, Plugin, Skill};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use crate::error::{LoadError, NameScope, ReferenceKind, ValidationError};
use crate::frontmatter::Frontmatter;
use crate::manifest::{AuthorEntry, ComponentRef, Marketplace, PluginEntry};

/// Where to find the catalog and what its relative paths are relative to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
    /// Manifest file
    pub path: PathBuf,
    /// Repository root that plugin `source` paths resolve against
    pub root: PathBuf,
}

impl CatalogSource {
    /// Create a source from a manifest path and repository root
    pub fn new(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            root: root.into(),
        }
    }
}

/// Read, parse and validate the catalog named by `source`
pub fn load(source: &CatalogSource) -> Result<Catalog, LoadError> {
    let manifest = Marketplace::read(&source.path)?;
    load_manifest(&manifest, &source.root)
}

/// Validate an already parsed manifest against the filesystem under `root`
pub fn load_manifest(manifest: &Marketplace, root: &Path) -> Result<Catalog, LoadError> {
    info!(
        "Loading catalog '{}' with {} plugin(s)",
        manifest.name,
        manifest.plugins.len()
    );

    let mut loader = Loader {
        root,
        errors: Vec::new(),
    };
    let catalog = loader.build(manifest);

    if loader.errors.is_empty() {
        info!("Catalog '{}' is valid", catalog.name);
        Ok(catalog)
    } else {
        info!(
            "Catalog '{}' has {} validation error(s)",
            manifest.name,
            loader.errors.len()
        );
        Err(LoadError::Invalid(loader.errors))
    }
}

struct Loader<'a> {
    root: &'a Path,
    errors: Vec<ValidationError>,
}

impl Loader<'_> {
    fn build(&mut self, manifest: &Marketplace) -> Catalog {
        let owner = manifest.owner.as_ref().map(|o| Owner {
            name: o.name.clone(),
            email: o.email.clone(),
            url: o.url.clone(),
        });
        let metadata = manifest.metadata.clone().unwrap_or_default();

        let mut catalog = Catalog::new(manifest.name.clone());
        catalog.description = metadata.description;
        catalog.version = metadata.version;

        let mut seen = HashSet::new();
        for entry in &manifest.plugins {
            if !is_hyphen_case(&entry.name) {
                self.errors.push(ValidationError::InvalidName {
                    name: entry.name.clone(),
                });
            }
            if !seen.insert(entry.name.as_str()) {
                self.errors.push(ValidationError::DuplicateName {
                    scope: NameScope::Catalog,
                    name: entry.name.clone(),
                });
            }

            let plugin = self.resolve_plugin(entry, owner.as_ref());
            catalog.insert(entry.category.as_deref(), plugin);
        }

        catalog.owner = owner;
        catalog
    }

    fn resolve_plugin(&mut self, entry: &PluginEntry, owner: Option<&Owner>) -> Plugin {
        let location = join_relative(self.root, &entry.source_dir());
        let location_exists = location.is_dir();
        if !location_exists {
            self.dangling(&entry.name, ReferenceKind::PluginDirectory, &location);
        }

        let mut plugin = Plugin::new(
            entry.name.clone(),
            entry.description.clone(),
            entry.version.clone(),
            location,
        )
        .with_keywords(entry.keywords.iter().cloned());

        plugin.author = match &entry.author {
            Some(author) => Some(author_from(author)),
            None => owner.map(|o| Author {
                name: o.name.clone(),
                email: o.email.clone(),
                url: o.url.clone(),
            }),
        };
        plugin.license = non_blank(entry.license.as_deref());
        plugin.homepage = non_blank(entry.homepage.as_deref());
        plugin.repository = non_blank(entry.repository.as_deref());

        // Components of a missing plugin directory would all dangle too;
        // one error for the directory is enough.
        let check = location_exists;

        for reference in &entry.agents {
            let agent = self.resolve_agent(&plugin, reference, check);
            plugin.agents.push(agent);
        }
        for reference in &entry.commands {
            let command = self.resolve_command(&plugin, reference, check);
            plugin.commands.push(command);
        }
        for reference in &entry.skills {
            let skill = self.resolve_skill(&plugin, reference, check);
            plugin.skills.push(skill);
        }

        self.check_unique(&plugin.name, ComponentKind::Agent, plugin.agents.iter().map(|a| &a.name));
        self.check_unique(&plugin.name, ComponentKind::Command, plugin.commands.iter().map(|c| &c.name));
        self.check_unique(&plugin.name, ComponentKind::Skill, plugin.skills.iter().map(|s| &s.name));

        if !plugin.has_entry_point() {
            self.errors.push(ValidationError::PluginWithoutAgentOrCommand {
                plugin: plugin.name.clone(),
            });
        }

        debug!(
            "Resolved plugin '{}': {} agents, {} commands, {} skills",
            plugin.name,
            plugin.agents.len(),
            plugin.commands.len(),
            plugin.skills.len()
        );
        plugin
    }

    fn resolve_agent(&mut self, plugin: &Plugin, reference: &ComponentRef, check: bool) -> Agent {
        let file = join_relative(&plugin.location, reference.path());
        let frontmatter = self.component_frontmatter(plugin, ReferenceKind::Agent, &file, check);

        let mut agent = Agent::new(
            component_name(reference, &frontmatter, &file),
            component_description(reference, &frontmatter),
            reference.path(),
            file,
        );
        agent.model = reference
            .model()
            .map(str::to_string)
            .or(frontmatter.model);
        agent
    }

    fn resolve_command(&mut self, plugin: &Plugin, reference: &ComponentRef, check: bool) -> Command {
        let file = join_relative(&plugin.location, reference.path());
        let frontmatter = self.component_frontmatter(plugin, ReferenceKind::Command, &file, check);

        Command::new(
            component_name(reference, &frontmatter, &file),
            component_description(reference, &frontmatter),
            reference.path(),
            file,
        )
    }

    fn resolve_skill(&mut self, plugin: &Plugin, reference: &ComponentRef, check: bool) -> Skill {
        let dir = join_relative(&plugin.location, reference.path());
        let definition = dir.join(Skill::DEFINITION_FILE);

        let frontmatter = if dir.is_dir() {
            self.component_frontmatter(plugin, ReferenceKind::SkillDefinition, &definition, check)
        } else {
            if check {
                self.dangling(&plugin.name, ReferenceKind::SkillDirectory, &dir);
            }
            Frontmatter::default()
        };

        let mut skill = Skill::new(
            component_name(reference, &frontmatter, &dir),
            component_description(reference, &frontmatter),
            reference.path(),
            dir,
        );
        skill.has_assets = skill.dir.join("assets").is_dir();
        skill.has_references = skill.dir.join("references").is_dir();
        skill
    }

    /// Frontmatter of `file`, reporting it as dangling when it is missing
    fn component_frontmatter(
        &mut self,
        plugin: &Plugin,
        kind: ReferenceKind,
        file: &Path,
        check: bool,
    ) -> Frontmatter {
        if file.is_file() {
            Frontmatter::from_file(file)
        } else {
            if check {
                self.dangling(&plugin.name, kind, file);
            }
            Frontmatter::default()
        }
    }

    fn check_unique<'n>(
        &mut self,
        plugin: &str,
        kind: ComponentKind,
        names: impl Iterator<Item = &'n String>,
    ) {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for name in names {
            if !seen.insert(name) && reported.insert(name) {
                self.errors.push(ValidationError::DuplicateName {
                    scope: NameScope::Plugin {
                        plugin: plugin.to_string(),
                        kind,
                    },
                    name: name.clone(),
                });
            }
        }
    }

    fn dangling(&mut self, plugin: &str, kind: ReferenceKind, path: &Path) {
        debug!("Plugin '{}': missing {} {:?}", plugin, kind, path);
        self.errors.push(ValidationError::DanglingReference {
            plugin: plugin.to_string(),
            kind,
            path: path.to_path_buf(),
        });
    }
}

/// Explicit name, then frontmatter name, then file stem
fn component_name(reference: &ComponentRef, frontmatter: &Frontmatter, path: &Path) -> String {
    reference
        .name()
        .and_then(|n| non_blank(Some(n)))
        .or_else(|| frontmatter.name.clone())
        .or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| reference.path().to_string())
}

fn component_description(reference: &ComponentRef, frontmatter: &Frontmatter) -> String {
    reference
        .description()
        .and_then(|d| non_blank(Some(d)))
        .or_else(|| frontmatter.description.clone())
        .unwrap_or_default()
}

fn author_from(entry: &AuthorEntry) -> Author {
    match entry {
        AuthorEntry::Name(name) => Author {
            name: name.clone(),
            email: None,
            url: None,
        },
        AuthorEntry::Detailed { name, email, url } => Author {
            name: name.clone(),
            email: email.clone(),
            url: url.clone(),
        },
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Join a manifest-relative path, dropping `.` segments so that
/// `./agents/x.md` resolves to `<base>/agents/x.md`
fn join_relative(base: &Path, relative: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::CurDir => {}
            other => path.push(other.as_os_str()),
        }
    }
    path
}

/// Lowercase ASCII letters and digits in hyphen-separated, non-empty runs
pub fn is_hyphen_case(name: &str) -> bool {
    !name.is_empty()
        && name.split('-').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;

    /// Write `content` to `root/relative`, creating parent directories
    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn write_catalog(root: &Path, json: &str) -> CatalogSource {
        write(root, ".claude-plugin/marketplace.json", json);
        CatalogSource::new(root.join(".claude-plugin/marketplace.json"), root)
    }

    #[test]
    fn test_load_resolves_frontmatter_and_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            root,
            "plugins/rust-tools/agents/rust-pro.md",
            "---\nname: rust-pro\ndescription: Writes idiomatic Rust\nmodel: opus\n---\nPrompt\n",
        );
        write(root, "plugins/rust-tools/commands/cargo-audit.md", "No frontmatter here\n");
        write(
            root,
            "plugins/rust-tools/skills/unsafe-review/SKILL.md",
            "---\nname: unsafe-review\ndescription: Audits unsafe blocks\n---\n",
        );
        fs::create_dir_all(root.join("plugins/rust-tools/skills/unsafe-review/references")).unwrap();

        let source = write_catalog(
            root,
            r#"{
              "name": "acme",
              "owner": { "name": "Acme" },
              "plugins": [{
                "name": "rust-tools",
                "description": "Rust helpers",
                "version": "1.0.0",
                "category": "Languages",
                "keywords": ["rust", "rust"],
                "agents": ["./agents/rust-pro.md"],
                "commands": [{ "path": "./commands/cargo-audit.md", "description": "Audit deps" }],
                "skills": ["./skills/unsafe-review"]
              }]
            }"#,
        );

        let catalog = load(&source).unwrap();
        let plugin = catalog.plugin("rust-tools").unwrap();

        assert_eq!(catalog.categories[0].heading(), Some("Languages"));
        assert_eq!(plugin.keywords, vec!["rust"]);
        assert_eq!(plugin.author.as_ref().map(|a| a.name.as_str()), Some("Acme"));

        assert_eq!(plugin.agents[0].name, "rust-pro");
        assert_eq!(plugin.agents[0].model.as_deref(), Some("opus"));
        assert_eq!(plugin.agents[0].file, root.join("plugins/rust-tools/agents/rust-pro.md"));

        assert_eq!(plugin.commands[0].name, "cargo-audit");
        assert_eq!(plugin.commands[0].description, "Audit deps");

        assert_eq!(plugin.skills[0].name, "unsafe-review");
        assert_eq!(plugin.skills[0].description, "Audits unsafe blocks");
        assert!(plugin.skills[0].has_references);
        assert!(!plugin.skills[0].has_assets);
    }

    #[test]
    fn test_collects_independent_defects_in_one_pass() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "plugins/alpha/agents/a.md", "");
        write(root, "plugins/beta/commands/b.md", "");

        let source = write_catalog(
            root,
            r#"{
              "name": "acme",
              "plugins": [
                { "name": "alpha", "description": "A", "version": "1.0.0",
                  "agents": ["./agents/a.md"], "skills": ["./skills/missing"] },
                { "name": "beta", "description": "B", "version": "1.0.0",
                  "commands": ["./commands/b.md"] },
                { "name": "alpha", "source": "./plugins/beta", "description": "A again",
                  "version": "1.0.0", "commands": ["./commands/b.md"] }
              ]
            }"#,
        );

        let err = load(&source).unwrap_err();
        let violations = err.violations();
        assert_eq!(violations.len(), 2, "{violations:?}");
        assert!(matches!(
            &violations[0],
            ValidationError::DanglingReference { plugin, kind: ReferenceKind::SkillDirectory, .. }
                if plugin == "alpha"
        ));
        assert!(matches!(
            &violations[1],
            ValidationError::DuplicateName { scope: NameScope::Catalog, name } if name == "alpha"
        ));
    }

    #[test]
    fn test_skill_directory_without_definition() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "plugins/p/agents/a.md", "");
        fs::create_dir_all(root.join("plugins/p/skills/empty")).unwrap();

        let source = write_catalog(
            root,
            r#"{ "name": "m", "plugins": [{ "name": "p", "description": "P", "version": "1.0.0",
                 "agents": ["./agents/a.md"], "skills": ["./skills/empty"] }] }"#,
        );

        let err = load(&source).unwrap_err();
        assert_eq!(
            err.violations(),
            &[ValidationError::DanglingReference {
                plugin: "p".into(),
                kind: ReferenceKind::SkillDefinition,
                path: root.join("plugins/p/skills/empty/SKILL.md"),
            }]
        );
    }

    #[test]
    fn test_skills_alone_are_not_enough() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "plugins/only-skills/skills/s/SKILL.md", "");

        let source = write_catalog(
            root,
            r#"{ "name": "m", "plugins": [{ "name": "only-skills", "description": "S",
                 "version": "1.0.0", "skills": ["./skills/s"] }] }"#,
        );

        let err = load(&source).unwrap_err();
        assert_eq!(
            err.violations(),
            &[ValidationError::PluginWithoutAgentOrCommand {
                plugin: "only-skills".into()
            }]
        );
    }

    #[test]
    fn test_missing_plugin_directory_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        let source = write_catalog(
            root,
            r#"{ "name": "m", "plugins": [{ "name": "ghost", "description": "G", "version": "1.0.0",
                 "agents": ["./agents/a.md", "./agents/b.md"] }] }"#,
        );

        let err = load(&source).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(matches!(
            &err.violations()[0],
            ValidationError::DanglingReference { kind: ReferenceKind::PluginDirectory, .. }
        ));
    }

    #[test]
    fn test_duplicate_component_and_invalid_name() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "plugins/Bad_Name/agents/one.md", "---\nname: helper\n---\n");
        write(root, "plugins/Bad_Name/agents/two.md", "---\nname: helper\n---\n");
        write(root, "plugins/Bad_Name/agents/three.md", "---\nname: helper\n---\n");

        let source = write_catalog(
            root,
            r#"{ "name": "m", "plugins": [{ "name": "Bad_Name", "description": "B", "version": "1.0.0",
                 "agents": ["./agents/one.md", "./agents/two.md", "./agents/three.md"] }] }"#,
        );

        let err = load(&source).unwrap_err();
        assert_eq!(
            err.violations(),
            &[
                ValidationError::InvalidName {
                    name: "Bad_Name".into()
                },
                ValidationError::DuplicateName {
                    scope: NameScope::Plugin {
                        plugin: "Bad_Name".into(),
                        kind: ComponentKind::Agent,
                    },
                    name: "helper".into(),
                },
            ]
        );
    }

    #[test]
    fn test_unreadable_and_malformed_catalogs() {
        let dir = tempfile::tempdir().unwrap();
        let missing = CatalogSource::new(dir.path().join("nope.json"), dir.path());
        assert!(matches!(load(&missing), Err(LoadError::Read { .. })));

        let broken = write_catalog(dir.path(), "{ not json");
        assert!(matches!(load(&broken), Err(LoadError::Parse { .. })));
    }

    #[test]
    fn test_is_hyphen_case() {
        assert!(is_hyphen_case("demo"));
        assert!(is_hyphen_case("rust-tools-2"));
        assert!(!is_hyphen_case(""));
        assert!(!is_hyphen_case("-demo"));
        assert!(!is_hyphen_case("demo--tools"));
        assert!(!is_hyphen_case("Demo"));
        assert!(!is_hyphen_case("demo_tools"));
    }

    #[test]
    fn test_join_relative_drops_cur_dir() {
        assert_eq!(
            join_relative(Path::new("/repo"), "./plugins/demo"),
            PathBuf::from("/repo/plugins/demo")
        );
    }
}
