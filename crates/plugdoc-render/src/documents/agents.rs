//! `agents.md`: every agent, grouped by category and plugin

use plugdoc_catalog::Statistics;
use plugdoc_types::Catalog;

use crate::markdown::{
    category_heading, cell, code_cell, count, each_category, or_placeholder, plugin_heading,
    stat, NO_DESCRIPTION,
};

const NO_AGENTS: &str = "*No agents defined*";
const DEFAULT_MODEL: &str = "inherit";

pub(crate) fn render(out: &mut String, catalog: &Catalog, stats: &Statistics) {
    out.push_str(&format!(
        "Every agent shipped by the `{}` marketplace, grouped by category and plugin.\n\n",
        catalog.name
    ));

    stat(out, "Total Agents", stats.totals.agents);
    stat(out, "Total Plugins", stats.totals.plugins);
    out.push('\n');

    each_category(out, catalog, |out, category| {
        category_heading(out, category);
        if let Some(counts) = stats.category(category.name.as_deref()) {
            if category.name.is_some() {
                out.push_str(&format!(
                    "*{} across {}*\n\n",
                    count(counts.agents, "agent"),
                    count(counts.plugins, "plugin")
                ));
            }
        }

        for plugin in &category.plugins {
            plugin_heading(out, plugin);

            if plugin.agents.is_empty() {
                out.push_str(NO_AGENTS);
                out.push_str("\n\n");
                continue;
            }

            out.push_str("| Agent | Model | Description |\n");
            out.push_str("|-------|-------|-------------|\n");
            for agent in &plugin.agents {
                let model = agent.model.as_deref().unwrap_or(DEFAULT_MODEL);
                out.push_str(&format!(
                    "| {} | {} | {} |\n",
                    code_cell(&agent.name),
                    code_cell(model),
                    or_placeholder(&cell(&agent.description), NO_DESCRIPTION)
                ));
            }
            out.push('\n');
        }
    });
}
