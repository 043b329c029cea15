//! `usage.md`: how to add the marketplace and install each plugin

use plugdoc_catalog::Statistics;
use plugdoc_types::Catalog;

use crate::markdown::{
    category_heading, cell, code, each_category, or_placeholder, plugin_heading, stat,
    NO_DESCRIPTION,
};

pub(crate) fn render(out: &mut String, catalog: &Catalog, stats: &Statistics) {
    out.push_str("## Adding the Marketplace\n\n");
    out.push_str("```\n");
    out.push_str(&format!("/plugin marketplace add {}\n", marketplace_source(catalog)));
    out.push_str("```\n\n");

    stat(out, "Available Plugins", stats.totals.plugins);
    stat(out, "Slash Commands", stats.totals.commands);
    out.push('\n');

    out.push_str("## Installing Plugins\n\n");
    out.push_str(
        "Install only the plugins you need; each one adds its agents, commands and skills \
         to the assistant.\n\n",
    );

    each_category(out, catalog, |out, category| {
        category_heading(out, category);

        for plugin in &category.plugins {
            plugin_heading(out, plugin);

            out.push_str("```\n");
            out.push_str(&format!("/plugin install {}@{}\n", plugin.name, catalog.name));
            out.push_str("```\n\n");

            if plugin.commands.is_empty() {
                out.push_str("*No commands defined*\n\n");
            } else {
                for command in &plugin.commands {
                    out.push_str(&format!(
                        "- {}: {}\n",
                        code(&format!("/{}", command.name)),
                        or_placeholder(&cell(&command.description), NO_DESCRIPTION)
                    ));
                }
                out.push('\n');
            }

            if !plugin.agents.is_empty() {
                let agents: Vec<_> = plugin.agents.iter().map(|a| code(&a.name)).collect();
                out.push_str(&format!(
                    "Agents available after install: {}\n\n",
                    agents.join(", ")
                ));
            }
        }
    });

    out.push_str("## Keeping Plugins Up to Date\n\n");
    out.push_str("```\n/plugin marketplace update\n```\n\n");
}

/// `owner/repo` for GitHub-hosted marketplaces, otherwise a placeholder
fn marketplace_source(catalog: &Catalog) -> String {
    catalog
        .owner
        .as_ref()
        .and_then(|o| o.url.as_deref())
        .and_then(|url| url.split("github.com/").nth(1))
        .map(|slug| slug.trim_end_matches('/').trim_end_matches(".git").to_string())
        .filter(|slug| slug.contains('/'))
        .unwrap_or_else(|| "<path-or-url-of-this-repository>".to_string())
}
