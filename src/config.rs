use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_hits_per_page")]
    pub hits_per_page: u32,
    #[serde(default = "default_query")]
    pub default_query: String,
    #[serde(default = "default_heading")]
    pub heading: String,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            hits_per_page: default_hits_per_page(),
            default_query: default_query(),
            heading: default_heading(),
            logging: Logging::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://hn.algolia.com/api/v1".to_string()
}
fn default_hits_per_page() -> u32 {
    100
}
fn default_query() -> String {
    "redux".to_string()
}
fn default_heading() -> String {
    "Tech News".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join("hn_search").join("config.toml"))
}

/// Loads the user config, falling back to defaults when the file is missing
/// or cannot be parsed. Only an unreadable existing file is an error.
pub fn load_config() -> Result<Config> {
    let Some(path) = get_config_path() else {
        return Ok(Config::default());
    };
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    match Config::from_toml_str(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            // Logging isn't up yet at this point
            eprintln!("Warning: {:#}. Using defaults.", e);
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_public_endpoint() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://hn.algolia.com/api/v1");
        assert_eq!(config.hits_per_page, 100);
        assert_eq!(config.default_query, "redux");
        assert_eq!(config.heading, "Tech News");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
default_query = "rust"

[logging]
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.default_query, "rust");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.hits_per_page, 100);
    }

    #[test]
    fn invalid_toml_is_rejected() {
        assert!(Config::from_toml_str("hits_per_page = \"many\"").is_err());
    }
}
