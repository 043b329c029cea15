//! plugdoc Types - Core catalog model
//!
//! A validated, in-memory view of the marketplace catalog. Values of these
//! types are produced by `plugdoc-catalog` and consumed by the renderer; the
//! loader guarantees the invariants documented on each type.

use serde::{Deserialize, Serialize};

pub mod component;
pub mod plugin;

pub use component::{Agent, Command, ComponentKind, Skill};
pub use plugin::{Author, Plugin};

/// Marketplace owner, used as the default plugin author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub email: Option<String>,
    pub url: Option<String>,
}

/// The root aggregate: categories in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub name: String,
    pub owner: Option<Owner>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub categories: Vec<Category>,
}

impl Catalog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a plugin to the category named `category`, creating the
    /// category at the end of the list if it has not been seen yet.
    ///
    /// Blank category names are normalised to the uncategorised group, which
    /// has no heading and is therefore kept ahead of every named category.
    pub fn insert(&mut self, category: Option<&str>, plugin: Plugin) {
        let key = normalize_category(category);

        if let Some(existing) = self.categories.iter_mut().find(|c| c.name == key) {
            existing.plugins.push(plugin);
            return;
        }

        let category = Category {
            name: key,
            plugins: vec![plugin],
        };
        if category.name.is_none() {
            self.categories.insert(0, category);
        } else {
            self.categories.push(category);
        }
    }

    /// All plugins in catalog order
    pub fn plugins(&self) -> impl Iterator<Item = &Plugin> {
        self.categories.iter().flat_map(|c| c.plugins.iter())
    }

    /// Find a plugin by name
    pub fn plugin(&self, name: &str) -> Option<&Plugin> {
        self.plugins().find(|p| p.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|c| c.plugins.is_empty())
    }
}

/// A grouping label for output documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// `None` means uncategorised; the heading is omitted when rendering
    pub name: Option<String>,
    pub plugins: Vec<Plugin>,
}

impl Category {
    /// Heading text, if this category renders one
    pub fn heading(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}
