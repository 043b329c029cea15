//! Subcommand handlers

use anyhow::Result;
use chrono::Utc;
use plugdoc_catalog::{aggregate, LoadError, Marketplace, NewPlugin, PluginUpdate, Statistics};
use plugdoc_sync::{sync, Config, DocumentStatus, SyncError, SyncOptions, SyncReport};
use tracing::info;

use crate::cli::{AddArgs, Command, PluginCommand, SyncArgs, UpdateArgs};

pub fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Sync(args) => run_sync(args, config),
        Command::Validate => run_validate(config),
        Command::Stats { json } => run_stats(config, json),
        Command::Plugin(cmd) => run_plugin(cmd, config),
    }
}

fn run_sync(args: SyncArgs, config: &Config) -> Result<()> {
    let documents = match args.file {
        Some(kind) => vec![kind],
        None => config.documents()?,
    };
    let options = SyncOptions::new(Utc::now())
        .with_documents(documents)
        .with_dry_run(args.dry_run);

    match sync(&config.catalog_source(), &config.output_dir(), &options) {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            if let SyncError::Load(load) = &e {
                print_violations(load);
            }
            Err(e.into())
        }
    }
}

fn print_report(report: &SyncReport) {
    for document in &report.documents {
        println!("  {:<9} {}", document.status, document.path.display());
        if let Some(content) = &document.content {
            println!("--- {} ---", document.path.display());
            print!("{}", content);
            println!("--- end ---");
        }
    }

    let created = report.count(DocumentStatus::Created);
    let updated = report.count(DocumentStatus::Updated);
    if !report.changed() {
        println!("✓ Documentation is up to date");
    } else if report.dry_run {
        println!("Dry run: {} would be created, {} updated", created, updated);
    } else {
        println!("✓ {} created, {} updated", created, updated);
    }
}

fn print_violations(error: &LoadError) {
    let violations = error.violations();
    if violations.is_empty() {
        return;
    }
    eprintln!("Catalog has {} problem(s):", violations.len());
    for violation in violations {
        eprintln!("  - {}", violation);
    }
}

fn run_validate(config: &Config) -> Result<()> {
    let source = config.catalog_source();
    match plugdoc_catalog::load(&source) {
        Ok(catalog) => {
            let totals = aggregate(&catalog).totals;
            println!(
                "✓ {} is valid: {} plugins, {} agents, {} commands, {} skills",
                source.path.display(),
                totals.plugins,
                totals.agents,
                totals.commands,
                totals.skills
            );
            Ok(())
        }
        Err(e) => {
            print_violations(&e);
            Err(e.into())
        }
    }
}

fn run_stats(config: &Config, json: bool) -> Result<()> {
    let catalog = plugdoc_catalog::load(&config.catalog_source())?;
    let stats = aggregate(&catalog);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats(&catalog.name, &stats);
    }
    Ok(())
}

fn print_stats(name: &str, stats: &Statistics) {
    println!("{}", name);
    println!(
        "  {} plugins, {} agents, {} commands, {} skills",
        stats.totals.plugins, stats.totals.agents, stats.totals.commands, stats.totals.skills
    );
    for category in &stats.categories {
        println!(
            "  [{}] {} plugins, {} agents, {} commands, {} skills",
            category.name.as_deref().unwrap_or("uncategorized"),
            category.counts.plugins,
            category.counts.agents,
            category.counts.commands,
            category.counts.skills
        );
    }
}

fn run_plugin(command: PluginCommand, config: &Config) -> Result<()> {
    let path = config.catalog_source().path;
    let mut manifest = Marketplace::read(&path)?;

    match command {
        PluginCommand::Add(args) => {
            let name = args.name.clone();
            manifest.add_plugin(new_plugin(args))?;
            println!("✓ Added plugin '{}'", name);
        }
        PluginCommand::Update(args) => {
            let name = args.name.clone();
            manifest.update_plugin(&name, plugin_update(args))?;
            println!("✓ Updated plugin '{}'", name);
        }
        PluginCommand::Remove { name } => {
            manifest.remove_plugin(&name)?;
            println!("✓ Removed plugin '{}'", name);
        }
    }

    manifest.save(&path)?;
    info!("Saved {:?}; run `plugdoc sync` to refresh the documents", path);
    Ok(())
}

fn new_plugin(args: AddArgs) -> NewPlugin {
    NewPlugin {
        name: args.name,
        description: args.description,
        version: args.version,
        category: args.category,
        agents: args.agents,
        commands: args.commands,
        skills: args.skills,
        keywords: args.keywords,
        license: Some(args.license),
        strict: args.strict,
        author_name: args.author_name,
        author_url: args.author_url,
    }
}

fn plugin_update(args: UpdateArgs) -> PluginUpdate {
    PluginUpdate {
        description: args.description,
        version: args.version,
        category: args.category,
        keywords: args.keywords,
        add_agent: args.add_agent,
        remove_agent: args.remove_agent,
        add_command: args.add_command,
        remove_command: args.remove_command,
        add_skill: args.add_skill,
        remove_skill: args.remove_skill,
    }
}
