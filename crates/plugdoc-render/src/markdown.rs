//! Shared Markdown building blocks

use chrono::{DateTime, Utc};
use plugdoc_types::{Catalog, Category, Plugin};

use crate::DocumentKind;

/// First characters of every generated document
pub const GENERATED_MARKER: &str = "<!-- plugdoc:generated";

/// Start of the single line carrying the generation timestamp
pub const TIMESTAMP_PREFIX: &str = "*Last generated: ";

pub(crate) const NO_DESCRIPTION: &str = "*No description provided*";
pub(crate) const NO_PLUGINS: &str = "*No plugins defined*";

pub(crate) fn header(out: &mut String, kind: DocumentKind, catalog: &Catalog) {
    out.push_str(&format!(
        "{} document=\"{}\" catalog=\"{}\" -->\n",
        GENERATED_MARKER,
        kind.selector(),
        catalog.name
    ));
    out.push_str("<!-- Do not edit by hand: change the catalog and run `plugdoc sync`. -->\n\n");
    out.push_str(&format!("# {}\n\n", kind.title()));
}

pub(crate) fn footer(out: &mut String, generated_at: DateTime<Utc>) {
    out.push_str("---\n\n");
    out.push_str(&format!(
        "{}{}*\n",
        TIMESTAMP_PREFIX,
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
}

/// `- **Label**: value`
pub(crate) fn stat(out: &mut String, label: &str, value: impl std::fmt::Display) {
    out.push_str(&format!("- **{}**: {}\n", label, value));
}

pub(crate) fn category_heading(out: &mut String, category: &Category) {
    if let Some(name) = category.heading() {
        out.push_str(&format!("## {}\n\n", inline(name)));
    }
}

pub(crate) fn plugin_heading(out: &mut String, plugin: &Plugin) {
    out.push_str(&format!("### {}\n\n", plugin.name));
    out.push_str(&format!("{}\n\n", or_placeholder(&inline(&plugin.description), NO_DESCRIPTION)));
}

/// Iterate categories, emitting the "no plugins" marker for an empty catalog
pub(crate) fn each_category<'a>(
    out: &mut String,
    catalog: &'a Catalog,
    mut f: impl FnMut(&mut String, &'a Category),
) {
    if catalog.is_empty() {
        out.push_str(NO_PLUGINS);
        out.push_str("\n\n");
        return;
    }
    for category in &catalog.categories {
        f(out, category);
    }
}

/// Collapse whitespace so free text stays on one line
pub(crate) fn inline(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Table cell text: single line with pipes escaped
pub(crate) fn cell(text: &str) -> String {
    inline(text).replace('|', "\\|")
}

pub(crate) fn or_placeholder(text: &str, placeholder: &str) -> String {
    if text.trim().is_empty() {
        placeholder.to_string()
    } else {
        text.to_string()
    }
}

pub(crate) fn code(text: &str) -> String {
    format!("`{}`", text.replace('`', "'"))
}

/// Code span inside a table cell; `\|` keeps a pipe from splitting the row
pub(crate) fn code_cell(text: &str) -> String {
    code(&inline(text)).replace('|', "\\|")
}

/// `1 agent`, `0 agents`, `3 agents`
pub(crate) fn count(n: usize, singular: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}s", n, singular)
    }
}
