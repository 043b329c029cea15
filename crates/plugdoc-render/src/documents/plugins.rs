//! `plugins.md`: the plugin directory with metadata and component lists

use plugdoc_catalog::Statistics;
use plugdoc_types::{Author, Catalog, Plugin};

use crate::markdown::{category_heading, code, count, each_category, inline, plugin_heading, stat};

pub(crate) fn render(out: &mut String, catalog: &Catalog, stats: &Statistics) {
    if let Some(description) = catalog.description.as_deref().map(inline) {
        if !description.is_empty() {
            out.push_str(&format!("{}\n\n", description));
        }
    }

    stat(out, "Total Plugins", stats.totals.plugins);
    stat(out, "Total Agents", stats.totals.agents);
    stat(out, "Total Commands", stats.totals.commands);
    stat(out, "Total Skills", stats.totals.skills);
    if let Some(version) = &catalog.version {
        stat(out, "Marketplace Version", version);
    }
    out.push('\n');

    each_category(out, catalog, |out, category| {
        category_heading(out, category);
        if let Some(counts) = stats.category(category.name.as_deref()) {
            if category.name.is_some() {
                out.push_str(&format!(
                    "*{}: {}, {}, {}*\n\n",
                    count(counts.plugins, "plugin"),
                    count(counts.agents, "agent"),
                    count(counts.commands, "command"),
                    count(counts.skills, "skill")
                ));
            }
        }

        for plugin in &category.plugins {
            plugin_heading(out, plugin);
            metadata(out, plugin);
            components(out, plugin);
        }
    });
}

fn metadata(out: &mut String, plugin: &Plugin) {
    stat(out, "Version", &plugin.version);
    stat(out, "Author", author(plugin.author.as_ref()));
    stat(
        out,
        "License",
        plugin.license.as_deref().unwrap_or("*Unspecified*"),
    );

    let keywords = if plugin.keywords.is_empty() {
        "*None*".to_string()
    } else {
        plugin
            .keywords
            .iter()
            .map(|k| code(k))
            .collect::<Vec<_>>()
            .join(", ")
    };
    stat(out, "Keywords", keywords);

    if let Some(homepage) = &plugin.homepage {
        stat(out, "Homepage", homepage);
    }
    if let Some(repository) = &plugin.repository {
        stat(out, "Repository", repository);
    }

    stat(
        out,
        "Components",
        format!(
            "{}, {}, {}",
            count(plugin.agents.len(), "agent"),
            count(plugin.commands.len(), "command"),
            count(plugin.skills.len(), "skill")
        ),
    );
    out.push('\n');
}

fn components(out: &mut String, plugin: &Plugin) {
    let agents: Vec<_> = plugin.agents.iter().map(|a| code(&a.name)).collect();
    let commands: Vec<_> = plugin
        .commands
        .iter()
        .map(|c| code(&format!("/{}", c.name)))
        .collect();
    let skills: Vec<_> = plugin.skills.iter().map(|s| code(&s.name)).collect();

    for (label, names, empty) in [
        ("Agents", agents, "*No agents defined*"),
        ("Commands", commands, "*No commands defined*"),
        ("Skills", skills, "*No skills defined*"),
    ] {
        let value = if names.is_empty() {
            empty.to_string()
        } else {
            names.join(", ")
        };
        out.push_str(&format!("**{}**: {}\n\n", label, value));
    }
}

fn author(author: Option<&Author>) -> String {
    match author {
        Some(a) if !a.name.trim().is_empty() => match &a.url {
            Some(url) if !url.trim().is_empty() => format!("[{}]({})", inline(&a.name), url),
            _ => inline(&a.name),
        },
        _ => "*Unknown*".to_string(),
    }
}
