//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.followertally.toml` files.

use crate::connectors::http::{
    FACEBOOK_API_VERSION, FACEBOOK_BASE_URL, INSTAGRAM_BASE_URL, TWITTER_BASE_URL,
};
use crate::models::PublicFigure;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = ".followertally.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Twitter API v2 settings.
    #[serde(default)]
    pub twitter: TwitterConfig,

    /// Facebook Graph API settings.
    #[serde(default)]
    pub facebook: FacebookConfig,

    /// Instagram Graph API settings.
    #[serde(default)]
    pub instagram: InstagramConfig,

    /// Figures to compare. The demo figures are used when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub figures: Vec<PublicFigure>,
}

/// HTTP client settings shared by all connectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    /// Bearer token. The platform is disabled when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,

    #[serde(default = "default_twitter_url")]
    pub base_url: String,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            base_url: default_twitter_url(),
        }
    }
}

fn default_twitter_url() -> String {
    TWITTER_BASE_URL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacebookConfig {
    /// Graph API access token. The platform is disabled when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default = "default_facebook_url")]
    pub base_url: String,

    /// Graph API version path segment, e.g. `v17.0`.
    #[serde(default = "default_facebook_version")]
    pub api_version: String,
}

impl Default for FacebookConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            base_url: default_facebook_url(),
            api_version: default_facebook_version(),
        }
    }
}

fn default_facebook_url() -> String {
    FACEBOOK_BASE_URL.to_string()
}

fn default_facebook_version() -> String {
    FACEBOOK_API_VERSION.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramConfig {
    /// Graph API access token. The platform is disabled when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default = "default_instagram_url")]
    pub base_url: String,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            base_url: default_instagram_url(),
        }
    }
}

fn default_instagram_url() -> String {
    INSTAGRAM_BASE_URL.to_string()
}

/// Treat blank tokens as missing.
fn non_blank(token: Option<&String>) -> Option<&str> {
    token.map(|t| t.trim()).filter(|t| !t.is_empty())
}

impl TwitterConfig {
    pub fn token(&self) -> Option<&str> {
        non_blank(self.bearer_token.as_ref())
    }
}

impl FacebookConfig {
    pub fn token(&self) -> Option<&str> {
        non_blank(self.access_token.as_ref())
    }
}

impl InstagramConfig {
    pub fn token(&self) -> Option<&str> {
        non_blank(self.access_token.as_ref())
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.followertally.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, and only
    /// override when they were given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(timeout) = args.timeout {
            self.http.timeout_seconds = timeout;
        }
        if let Some(ref token) = args.twitter_token {
            self.twitter.bearer_token = Some(token.clone());
        }
        if let Some(ref token) = args.facebook_token {
            self.facebook.access_token = Some(token.clone());
        }
        if let Some(ref token) = args.instagram_token {
            self.instagram.access_token = Some(token.clone());
        }
    }

    /// Reject settings no run can succeed with.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.http.timeout_seconds > 0,
            "http.timeout_seconds must be at least 1"
        );
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
