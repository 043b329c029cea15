//! `agent-skills.md`: every skill, with an explicit marker for plugins
//! that ship none

use plugdoc_catalog::Statistics;
use plugdoc_types::{Catalog, Skill};

use crate::markdown::{
    category_heading, cell, code, code_cell, count, each_category, or_placeholder,
    plugin_heading, stat, NO_DESCRIPTION,
};

const NO_SKILLS: &str = "*No skills defined*";

pub(crate) fn render(out: &mut String, catalog: &Catalog, stats: &Statistics) {
    let plugins_with_skills = stats
        .plugins
        .iter()
        .filter(|p| p.counts.skills > 0)
        .count();

    out.push_str(
        "Skills are loaded on demand by the assistant when a task matches their description.\n\n",
    );

    stat(out, "Total Skills", stats.totals.skills);
    stat(out, "Plugins with Skills", plugins_with_skills);
    out.push('\n');

    each_category(out, catalog, |out, category| {
        category_heading(out, category);
        if let Some(counts) = stats.category(category.name.as_deref()) {
            if category.name.is_some() {
                out.push_str(&format!(
                    "*{} across {}*\n\n",
                    count(counts.skills, "skill"),
                    count(counts.plugins, "plugin")
                ));
            }
        }

        for plugin in &category.plugins {
            plugin_heading(out, plugin);

            if plugin.skills.is_empty() {
                out.push_str(NO_SKILLS);
                out.push_str("\n\n");
                continue;
            }

            out.push_str("| Skill | Description | Resources |\n");
            out.push_str("|-------|-------------|-----------|\n");
            for skill in &plugin.skills {
                out.push_str(&format!(
                    "| {} | {} | {} |\n",
                    code_cell(&skill.name),
                    or_placeholder(&cell(&skill.description), NO_DESCRIPTION),
                    resources(skill)
                ));
            }
            out.push('\n');
        }
    });
}

fn resources(skill: &Skill) -> String {
    let mut dirs = Vec::new();
    if skill.has_assets {
        dirs.push(code("assets/"));
    }
    if skill.has_references {
        dirs.push(code("references/"));
    }

    if dirs.is_empty() {
        "*None*".to_string()
    } else {
        dirs.join(", ")
    }
}
