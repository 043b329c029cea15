//! Sync driver tests against a throwaway repository

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{TimeZone, Utc};
use plugdoc_catalog::{CatalogSource, LoadError, Marketplace, NewPlugin};
use plugdoc_render::DocumentKind;
use plugdoc_sync::{sync, DocumentStatus, SyncError, SyncOptions};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DEMO_CATALOG: &str = r#"{
  "name": "demo-market",
  "owner": { "name": "Demo Org", "url": "https://github.com/demo-org" },
  "plugins": [{
    "name": "demo",
    "source": "./plugins/demo",
    "description": "Demo plugin",
    "version": "0.1.0",
    "category": "Tools",
    "agents": ["./agents/demo-agent.md"]
  }]
}
"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Repository with the single-plugin demo catalog
fn demo_repo() -> (TempDir, CatalogSource) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "plugins/demo/agents/demo-agent.md",
        "---\nname: demo-agent\ndescription: Does demo things\nmodel: sonnet\n---\nYou are a demo.\n",
    );
    write(root, ".claude-plugin/marketplace.json", DEMO_CATALOG);
    let source = CatalogSource::new(root.join(".claude-plugin/marketplace.json"), root);
    (dir, source)
}

fn options(hour: u32) -> SyncOptions {
    SyncOptions::new(Utc.with_ymd_and_hms(2026, 10, 19, hour, 0, 0).unwrap())
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_demo_catalog_end_to_end() {
    let (dir, source) = demo_repo();
    let docs = dir.path().join("docs");

    let report = sync(&source, &docs, &options(1)).unwrap();
    assert_eq!(report.count(DocumentStatus::Created), 4);
    assert_eq!(report.stats.totals.agents, 1);

    let agents = read(&docs.join("agents.md"));
    assert!(agents.contains("**Total Agents**: 1"));
    assert!(agents.contains("\n## Tools\n"));
    assert!(agents.contains("| `demo-agent` | `sonnet` | Does demo things |"));
    assert_eq!(agents.matches("| `demo-agent`").count(), 1);

    let skills = read(&docs.join("agent-skills.md"));
    assert!(skills.contains("**Total Skills**: 0"));
    assert!(skills.contains("### demo\n"));
    assert!(skills.contains("*No skills defined*"));

    let usage = read(&docs.join("usage.md"));
    assert!(usage.contains("/plugin install demo@demo-market"));
}

#[test]
fn test_second_run_is_unchanged() {
    let (dir, source) = demo_repo();
    let docs = dir.path().join("docs");

    sync(&source, &docs, &options(1)).unwrap();
    let before = read(&docs.join("plugins.md"));

    let report = sync(&source, &docs, &options(5)).unwrap();
    assert!(!report.changed());
    assert_eq!(report.count(DocumentStatus::Unchanged), 4);
    // Untouched on disk, old timestamp included
    assert_eq!(read(&docs.join("plugins.md")), before);
}

#[test]
fn test_catalog_change_updates_documents() {
    let (dir, source) = demo_repo();
    let docs = dir.path().join("docs");
    sync(&source, &docs, &options(1)).unwrap();

    write(dir.path(), "plugins/extra/commands/ship.md", "---\ndescription: Ship it\n---\n");
    let mut manifest = Marketplace::read(&source.path).unwrap();
    manifest
        .add_plugin(NewPlugin {
            name: "extra".into(),
            description: "Extra commands".into(),
            version: "1.0.0".into(),
            category: Some("Tools".into()),
            commands: vec!["ship.md".into()],
            ..NewPlugin::default()
        })
        .unwrap();
    manifest.save(&source.path).unwrap();

    let report = sync(&source, &docs, &options(2)).unwrap();
    assert_eq!(report.stats.totals.plugins, 2);
    assert_eq!(report.status(DocumentKind::UsageGuide), Some(DocumentStatus::Updated));
    assert!(read(&docs.join("usage.md")).contains("- `/ship`: Ship it"));
}

#[test]
fn test_validation_failure_writes_nothing() {
    let (dir, source) = demo_repo();
    let docs = dir.path().join("docs");
    write(dir.path(), "docs/agents.md", "hand written\n");
    fs::remove_file(dir.path().join("plugins/demo/agents/demo-agent.md")).unwrap();

    let err = sync(&source, &docs, &options(1)).unwrap_err();
    match &err {
        SyncError::Load(LoadError::Invalid(violations)) => assert_eq!(violations.len(), 1),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), plugdoc_sync::error::EXIT_VALIDATION);

    assert_eq!(read(&docs.join("agents.md")), "hand written\n");
    assert_eq!(fs::read_dir(&docs).unwrap().count(), 1);
}

#[test]
fn test_single_document_selection() {
    let (dir, source) = demo_repo();
    let docs = dir.path().join("docs");

    let report = sync(
        &source,
        &docs,
        &options(1).with_documents([DocumentKind::SkillReference]),
    )
    .unwrap();

    assert_eq!(report.documents.len(), 1);
    assert!(docs.join("agent-skills.md").exists());
    assert!(!docs.join("agents.md").exists());
    assert!(!docs.join("plugins.md").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let (dir, source) = demo_repo();
    let docs = dir.path().join("docs");

    let report = sync(&source, &docs, &options(1).with_dry_run(true)).unwrap();

    assert!(report.dry_run);
    assert_eq!(report.count(DocumentStatus::Created), 4);
    assert!(report.documents.iter().all(|d| d.content.is_some()));
    assert!(!docs.exists());
}

#[test]
fn test_written_counts_match_catalog() {
    let (dir, source) = demo_repo();
    let root = dir.path();
    write(root, "plugins/kit/agents/one.md", "---\nname: one\n---\n");
    write(root, "plugins/kit/agents/two.md", "---\nname: two\n---\n");
    write(root, "plugins/kit/commands/go.md", "");
    write(root, "plugins/kit/skills/lint/SKILL.md", "---\nname: lint\ndescription: Lints\n---\n");
    write(
        root,
        ".claude-plugin/marketplace.json",
        r#"{
          "name": "demo-market",
          "plugins": [
            { "name": "demo", "description": "Demo plugin", "version": "0.1.0",
              "category": "Tools", "agents": ["./agents/demo-agent.md"] },
            { "name": "kit", "description": "Kit", "version": "2.0.0",
              "agents": ["./agents/one.md", "./agents/two.md"],
              "commands": ["./commands/go.md"],
              "skills": ["./skills/lint"] }
          ]
        }"#,
    );
    let docs = root.join("docs");

    let report = sync(&source, &docs, &options(1)).unwrap();
    let totals = report.stats.totals;
    assert_eq!((totals.plugins, totals.agents, totals.commands, totals.skills), (2, 3, 1, 1));

    let agents = read(&docs.join("agents.md"));
    let agent_rows = agents
        .lines()
        .filter(|l| l.starts_with("| `"))
        .count();
    assert_eq!(agent_rows, totals.agents);

    let skills = read(&docs.join("agent-skills.md"));
    let skill_rows = skills
        .lines()
        .filter(|l| l.starts_with("| `"))
        .count();
    assert_eq!(skill_rows, totals.skills);

    let plugins = read(&docs.join("plugins.md"));
    assert_eq!(plugins.lines().filter(|l| l.starts_with("### ")).count(), totals.plugins);
}
