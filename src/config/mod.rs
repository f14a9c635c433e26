//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::identity::MergeGroups;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Where records and map metadata come from.
///
/// A local path wins over a URL when both are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Local record file (JSON array or JSONL)
    #[serde(default)]
    pub records_path: Option<PathBuf>,

    /// Local map metadata file (JSON object)
    #[serde(default)]
    pub metadata_path: Option<PathBuf>,

    #[serde(default)]
    pub records_url: Option<String>,

    #[serde(default)]
    pub metadata_url: Option<String>,
}

/// Profile-page name lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_profile_base_url")]
    pub base_url: String,

    /// CSS selector of the display name on the profile page
    #[serde(default = "default_name_selector")]
    pub name_selector: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_profile_base_url() -> String {
    "https://tagpro.koalabeast.com".to_string()
}

fn default_name_selector() -> String {
    ".profile-name".to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_profile_base_url(),
            name_selector: default_name_selector(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub sources: SourceConfig,

    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub server: ServerConfig,

    /// Manually curated identity groups
    #[serde(default)]
    pub merge_groups: MergeGroups,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            sources: SourceConfig::default(),
            profile: ProfileConfig::default(),
            server: ServerConfig::default(),
            merge_groups: MergeGroups::new(),
        }
    }
}

impl AppConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::parse_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without validating, for callers that apply
    /// overrides first.
    pub fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.profile.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Profile timeout must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.sources.records_path.is_none() && self.sources.records_url.is_none() {
            return Err(ConfigError::ValidationError(
                "Either sources.records_path or sources.records_url must be set".to_string(),
            ));
        }

        for url in [&self.sources.records_url, &self.sources.metadata_url]
            .into_iter()
            .flatten()
        {
            url::Url::parse(url).map_err(|e| {
                ConfigError::ValidationError(format!("Invalid source URL {}: {}", url, e))
            })?;
        }

        for (name, group) in &self.merge_groups {
            if group.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "Merge group '{}' has no user ids or names",
                    name
                )));
            }
        }

        Ok(())
    }
}
