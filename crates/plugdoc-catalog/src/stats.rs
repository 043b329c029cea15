//! Statistics derived from a catalog
//!
//! Counts are always recomputed from the enumerated collections, never
//! tracked separately, so they cannot drift from what the documents list.

use plugdoc_types::{Catalog, ComponentKind, Plugin};
use serde::Serialize;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Plugin and component counts for some slice of the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    /// Number of plugins
    pub plugins: usize,
    /// Number of agents
    pub agents: usize,
    /// Number of commands
    pub commands: usize,
    /// Number of skills
    pub skills: usize,
}

impl Counts {
    /// Counts for a single plugin
    pub fn of_plugin(plugin: &Plugin) -> Self {
        Self {
            plugins: 1,
            agents: plugin.agents.len(),
            commands: plugin.commands.len(),
            skills: plugin.skills.len(),
        }
    }

    /// Count for one component kind
    pub fn get(&self, kind: ComponentKind) -> usize {
        match kind {
            ComponentKind::Agent => self.agents,
            ComponentKind::Command => self.commands,
            ComponentKind::Skill => self.skills,
        }
    }
}

impl Add for Counts {
    type Output = Counts;

    fn add(self, other: Counts) -> Counts {
        Counts {
            plugins: self.plugins + other.plugins,
            agents: self.agents + other.agents,
            commands: self.commands + other.commands,
            skills: self.skills + other.skills,
        }
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, other: Counts) {
        *self = *self + other;
    }
}

impl Sum for Counts {
    fn sum<I: Iterator<Item = Counts>>(iter: I) -> Counts {
        iter.fold(Counts::default(), Add::add)
    }
}

/// Counts for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    /// Category name; `None` for uncategorised plugins
    pub name: Option<String>,
    /// Counts within the category
    pub counts: Counts,
}

/// Counts for one plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginStats {
    /// Plugin name
    pub name: String,
    /// Owning category
    pub category: Option<String>,
    /// Component counts (`plugins` is always 1)
    pub counts: Counts,
}

/// Derived statistics, in catalog order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Whole-catalog counts
    pub totals: Counts,
    /// Per-category counts
    pub categories: Vec<CategoryStats>,
    /// Per-plugin counts
    pub plugins: Vec<PluginStats>,
}

impl Statistics {
    /// Counts for the named plugin
    pub fn plugin(&self, name: &str) -> Option<Counts> {
        self.plugins
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.counts)
    }

    /// Counts for the category with the given heading (`None` for the
    /// uncategorised group)
    pub fn category(&self, name: Option<&str>) -> Option<Counts> {
        self.categories
            .iter()
            .find(|c| c.name.as_deref() == name)
            .map(|c| c.counts)
    }
}

/// Compute statistics for `catalog`
pub fn aggregate(catalog: &Catalog) -> Statistics {
    let mut stats = Statistics::default();

    for category in &catalog.categories {
        let mut category_counts = Counts::default();

        for plugin in &category.plugins {
            let counts = Counts::of_plugin(plugin);
            category_counts += counts;
            stats.plugins.push(PluginStats {
                name: plugin.name.clone(),
                category: category.name.clone(),
                counts,
            });
        }

        stats.categories.push(CategoryStats {
            name: category.name.clone(),
            counts: category_counts,
        });
    }

    stats.totals = stats.categories.iter().map(|c| c.counts).sum();
    stats
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use plugdoc_types::{Agent, Command, Skill};

    fn plugin(name: &str, agents: usize, commands: usize, skills: usize) -> Plugin {
        let mut plugin = Plugin::new(name, "", "1.0.0", format!("plugins/{name}"));
        for i in 0..agents {
            plugin.agents.push(Agent::new(format!("a{i}"), "", "", ""));
        }
        for i in 0..commands {
            plugin.commands.push(Command::new(format!("c{i}"), "", "", ""));
        }
        for i in 0..skills {
            plugin.skills.push(Skill::new(format!("s{i}"), "", "", ""));
        }
        plugin
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new("m");
        catalog.insert(Some("Languages"), plugin("rust", 2, 1, 3));
        catalog.insert(None, plugin("misc", 0, 2, 0));
        catalog.insert(Some("Languages"), plugin("go", 1, 0, 1));
        catalog
    }

    #[test]
    fn test_aggregate_totals_match_enumeration() {
        let catalog = catalog();
        let stats = aggregate(&catalog);

        assert_eq!(stats.totals.plugins, catalog.plugins().count());
        for kind in ComponentKind::ALL {
            let enumerated: usize = catalog.plugins().map(|p| p.count(kind)).sum();
            let per_plugin: usize = stats.plugins.iter().map(|p| p.counts.get(kind)).sum();
            let per_category: usize = stats.categories.iter().map(|c| c.counts.get(kind)).sum();
            assert_eq!(stats.totals.get(kind), enumerated);
            assert_eq!(per_plugin, enumerated);
            assert_eq!(per_category, enumerated);
        }
    }

    #[test]
    fn test_category_and_plugin_lookup() {
        let stats = aggregate(&catalog());

        assert_eq!(
            stats.category(Some("Languages")).unwrap(),
            Counts {
                plugins: 2,
                agents: 3,
                commands: 1,
                skills: 4
            }
        );
        assert_eq!(stats.category(None).unwrap().commands, 2);
        assert_eq!(stats.plugin("go").unwrap().skills, 1);
        assert!(stats.plugin("missing").is_none());
    }

    #[test]
    fn test_empty_catalog() {
        let stats = aggregate(&Catalog::new("empty"));
        assert_eq!(stats.totals, Counts::default());
        assert!(stats.categories.is_empty());
    }
}
