use crate::{Agent, Command, ComponentKind, Skill};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Plugin author as declared in the catalog (or inherited from the owner)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: Option<String>,
    pub url: Option<String>,
}

/// One installable unit bundling agents, commands and skills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: Option<Author>,
    pub license: Option<String>,
    pub keywords: Vec<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    /// Resolved plugin directory
    pub location: PathBuf,
    pub agents: Vec<Agent>,
    pub commands: Vec<Command>,
    pub skills: Vec<Skill>,
}

impl Plugin {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
        location: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: version.into(),
            author: None,
            license: None,
            keywords: Vec::new(),
            homepage: None,
            repository: None,
            location: location.into(),
            agents: Vec::new(),
            commands: Vec::new(),
            skills: Vec::new(),
        }
    }

    /// Replace the keyword set, dropping blanks and repeats but keeping the
    /// declared order.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.clear();
        for keyword in keywords {
            let keyword = keyword.into();
            let keyword = keyword.trim();
            if !keyword.is_empty() && !self.keywords.iter().any(|k| k == keyword) {
                self.keywords.push(keyword.to_string());
            }
        }
        self
    }

    /// Number of components of the given kind
    pub fn count(&self, kind: ComponentKind) -> usize {
        match kind {
            ComponentKind::Agent => self.agents.len(),
            ComponentKind::Command => self.commands.len(),
            ComponentKind::Skill => self.skills.len(),
        }
    }

    /// A plugin is installable only when it ships an agent or a command
    pub fn has_entry_point(&self) -> bool {
        !self.agents.is_empty() || !self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_deduplicated_in_order() {
        let plugin = Plugin::new("demo", "Demo", "0.1.0", "plugins/demo")
            .with_keywords(["rust", "cli", " rust ", "", "docs"]);
        assert_eq!(plugin.keywords, vec!["rust", "cli", "docs"]);
    }

    #[test]
    fn test_entry_point_requires_agent_or_command() {
        let mut plugin = Plugin::new("demo", "Demo", "0.1.0", "plugins/demo");
        plugin.skills.push(Skill::new("s", "", "./skills/s", "plugins/demo/skills/s"));
        assert!(!plugin.has_entry_point());

        plugin
            .commands
            .push(Command::new("c", "", "./commands/c.md", "plugins/demo/commands/c.md"));
        assert!(plugin.has_entry_point());
        assert_eq!(plugin.count(ComponentKind::Command), 1);
        assert_eq!(plugin.count(ComponentKind::Agent), 0);
    }
}
