//! YAML frontmatter extraction from agent, command and skill files

use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const FRONTMATTER_PATTERN: &str = r"^\x{FEFF}?---[ \t]*\r?\n([\s\S]*?)\r?\n---[ \t]*(?:\r?\n|$)";

/// Metadata fields the documentation needs. Other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Frontmatter {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// One-line description
    #[serde(default)]
    pub description: Option<String>,
    /// Model identifier (agents)
    #[serde(default)]
    pub model: Option<String>,
}

impl Frontmatter {
    /// Read frontmatter from a file. Missing files, unreadable files and
    /// files without a frontmatter block all yield empty metadata.
    pub fn from_file(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => parse(&content).unwrap_or_else(|| {
                debug!("No frontmatter in {:?}", path);
                Self::default()
            }),
            Err(e) => {
                warn!("Could not read {:?} for frontmatter: {}", path, e);
                Self::default()
            }
        }
    }
}

/// Extract the frontmatter block from `content`
///
/// The block is parsed as YAML first. Prompt descriptions often contain
/// unquoted colons, which is invalid YAML, so on failure each line is split
/// at its first colon instead.
pub fn parse(content: &str) -> Option<Frontmatter> {
    let frontmatter_re = match Regex::new(FRONTMATTER_PATTERN) {
        Ok(re) => re,
        Err(e) => {
            warn!("Failed to compile frontmatter regex: {}", e);
            return None;
        }
    };

    let block = frontmatter_re.captures(content)?.get(1)?.as_str();

    match serde_yaml::from_str::<Frontmatter>(block) {
        Ok(frontmatter) => Some(clean(frontmatter)),
        Err(e) => {
            warn!("Frontmatter is not valid YAML ({}), using key: value fallback", e);
            Some(clean(parse_lines(block)))
        }
    }
}

fn parse_lines(block: &str) -> Frontmatter {
    let mut frontmatter = Frontmatter::default();

    for line in block.lines() {
        // Nested or continuation lines carry no top-level keys
        if line.starts_with(char::is_whitespace) {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'').to_string();

        match key.trim() {
            "name" => frontmatter.name = Some(value),
            "description" => frontmatter.description = Some(value),
            "model" => frontmatter.model = Some(value),
            _ => {}
        }
    }

    frontmatter
}

fn clean(frontmatter: Frontmatter) -> Frontmatter {
    fn non_blank(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|v| !v.is_empty())
    }

    Frontmatter {
        name: non_blank(frontmatter.name),
        description: non_blank(frontmatter.description),
        model: non_blank(frontmatter.model),
    }
}
