//! CLI configuration
//!
//! Stored as TOML at `$FAMILYGRAPH_CONFIG`, or `familygraph/config.toml`
//! under the platform config directory.

use familygraph_core::{limits, EngineConfig, FamilyId, InferenceMode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_ENV: &str = "FAMILYGRAPH_CONFIG";

/// Get default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("familygraph")
}

/// Location of the config file
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("familygraph")
        .join("config.toml")
}

fn default_http_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_title_max_depth() -> usize {
    limits::BFS_MAX_DEPTH
}

/// Configuration for the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Family used when `--family` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_family: Option<String>,

    #[serde(default)]
    pub inference_mode: InferenceMode,

    #[serde(default = "default_title_max_depth")]
    pub title_max_depth: usize,

    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_family: None,
            inference_mode: InferenceMode::default(),
            title_max_depth: default_title_max_depth(),
            http_addr: default_http_addr(),
            http_token: None,
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist
    pub fn load() -> anyhow::Result<Self> {
        let path = config_file_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path.display(), e))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &[
            "data_dir",
            "default_family",
            "inference_mode",
            "title_max_depth",
            "http_addr",
            "http_token",
        ]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data_dir" => self.data_dir.as_ref().map(|p| p.display().to_string()),
            "default_family" => self.default_family.clone(),
            "inference_mode" => Some(self.inference_mode.to_string()),
            "title_max_depth" => Some(self.title_max_depth.to_string()),
            "http_addr" => Some(self.http_addr.clone()),
            "http_token" => self.http_token.clone(),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            "default_family" => {
                let family: FamilyId = value.parse()?;
                self.default_family = Some(family.to_string());
            }
            "inference_mode" => self.inference_mode = value.parse()?,
            "title_max_depth" => {
                let depth: usize = value.parse()?;
                limits::validate_traversal_depth(depth)?;
                self.title_max_depth = depth;
            }
            "http_addr" => self.http_addr = value.to_string(),
            "http_token" => self.http_token = Some(value.to_string()),
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }

    /// Reset a key to its default
    pub fn unset(&mut self, key: &str) -> anyhow::Result<()> {
        let defaults = Self::default();
        match key {
            "data_dir" => self.data_dir = None,
            "default_family" => self.default_family = None,
            "inference_mode" => self.inference_mode = defaults.inference_mode,
            "title_max_depth" => self.title_max_depth = defaults.title_max_depth,
            "http_addr" => self.http_addr = defaults.http_addr,
            "http_token" => self.http_token = None,
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Engine settings derived from this config
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            inference_mode: self.inference_mode,
            title_max_depth: self.title_max_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.http_addr, "127.0.0.1:8080");
        assert_eq!(config.title_max_depth, 5);
        assert_eq!(config.inference_mode, InferenceMode::Atomic);
        assert!(config.http_token.is_none());
    }

    #[test]
    fn test_set_validates_values() {
        let mut config = Config::default();
        config.set("inference_mode", "best_effort").unwrap();
        assert_eq!(config.get("inference_mode").as_deref(), Some("best_effort"));

        assert!(config.set("title_max_depth", "9").is_err());
        assert!(config.set("title_max_depth", "three").is_err());
        assert!(config.set("default_family", "not-a-ulid").is_err());
        assert!(config.set("colour", "blue").is_err());

        config.set("title_max_depth", "3").unwrap();
        assert_eq!(config.engine_config().title_max_depth, 3);

        config.unset("title_max_depth").unwrap();
        assert_eq!(config.title_max_depth, 5);
        assert!(config.unset("colour").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.set("http_token", "s3cret").unwrap();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("inference_mode = \"atomic\""));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.http_token.as_deref(), Some("s3cret"));
    }
}
