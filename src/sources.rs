// src/sources.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PATH: &str = "NEWS_SOURCES_PATH";

/// One configured RSS feed endpoint. `country` and `language` are copied onto
/// every article produced from this source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Source {
    pub name: String,
    pub feed_url: String,
    pub country: String,
    pub language: String,
}

impl Source {
    pub fn new(name: &str, feed_url: &str, country: &str, language: &str) -> Self {
        Self {
            name: name.to_string(),
            feed_url: feed_url.to_string(),
            country: country.to_string(),
            language: language.to_string(),
        }
    }
}

/// Built-in registry used when no config file is present.
pub fn default_sources() -> Vec<Source> {
    vec![
        Source::new("3DPrint.com", "https://3dprint.com/feed/", "usa", "en"),
        Source::new("Hackaday", "https://hackaday.com/blog/feed/", "usa", "en"),
        Source::new("Fabbaloo", "https://www.fabbaloo.com/feed", "usa", "en"),
    ]
}

/// Load the source registry from an explicit path. Supports TOML or JSON.
pub fn load_sources_from(path: &Path) -> Result<Vec<Source>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sources(&content, ext.as_str())
}

/// Load the source registry using env var + fallbacks:
/// 1) $NEWS_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
/// 4) built-in defaults
pub fn load_sources_default() -> Result<Vec<Source>> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        } else {
            return Err(anyhow!("NEWS_SOURCES_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_sources_from(&json_p);
    }
    Ok(default_sources())
}

fn parse_sources(s: &str, hint_ext: &str) -> Result<Vec<Source>> {
    // Try TOML first if hinted or content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains("[[sources]]");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    // Try JSON array
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    // Fallback: also try TOML if not attempted
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported sources format"))
}

fn parse_toml(s: &str) -> Result<Vec<Source>> {
    #[derive(Deserialize)]
    struct TomlRegistry {
        sources: Vec<Source>,
    }
    let v: TomlRegistry = toml::from_str(s)?;
    Ok(clean_list(v.sources))
}

fn parse_json(s: &str) -> Result<Vec<Source>> {
    let v: Vec<Source> = serde_json::from_str(s)?;
    Ok(clean_list(v))
}

fn clean_list(items: Vec<Source>) -> Vec<Source> {
    items
        .into_iter()
        .filter(|s| !s.name.trim().is_empty() && !s.feed_url.trim().is_empty())
        .collect()
}
