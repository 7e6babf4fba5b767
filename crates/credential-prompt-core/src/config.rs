//! Configuration types and loading for credential-prompt.
//!
//! Configuration is loaded from `~/.config/credential-prompt/config.toml`.
//!
//! # Error Handling
//!
//! - If the config file doesn't exist, default values are returned.
//! - If the config file exists but is invalid, an error is returned (fail fast).
//!
//! # Example Configuration
//!
//! ```toml
//! [prompt]
//! title = "Settings Repository"
//! uri_display_width = 50
//!
//! [providers.github]
//! sentinel_secret = "x-oauth-basic"
//!
//! [providers.other]
//! sentinel_secret = ""        # no placeholder, leave the secret empty
//!
//! [terminal]
//! max_attempts = 3
//! ```

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use crate::messages::DEFAULT_TITLE;
use crate::types::Provider;

/// Placeholder password some hosts accept when a token is the username.
pub const DEFAULT_SENTINEL_SECRET: &str = "x-oauth-basic";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Prompt text settings.
    pub prompt: PromptConfig,
    /// Per-provider settings.
    pub providers: ProvidersConfig,
    /// Terminal surface settings.
    pub terminal: TerminalConfig,
}

/// Prompt text settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Dialog title (default: "Settings Repository").
    pub title: String,
    /// Maximum number of URI characters shown in the header (default: 50).
    pub uri_display_width: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            uri_display_width: 50,
        }
    }
}

/// Settings for each provider.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProvidersConfig {
    /// github.com
    pub github: ProviderConfig,
    /// bitbucket.org
    pub bitbucket: ProviderConfig,
    /// Everything else.
    pub other: ProviderConfig,
}

/// Settings for a single provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Secret used when the form is confirmed with a username but an empty
    /// secret field. An empty string disables the placeholder.
    pub sentinel_secret: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            sentinel_secret: DEFAULT_SENTINEL_SECRET.to_string(),
        }
    }
}

/// Terminal surface settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// How many empty secrets are tolerated before the prompt is cancelled
    /// (default: 3).
    pub max_attempts: u32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

impl Config {
    /// Returns the default configuration file path.
    ///
    /// Returns `~/.config/credential-prompt/config.toml` using
    /// `dirs::config_dir()`, or `None` if the config directory cannot be
    /// determined.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("credential-prompt").join("config.toml"))
    }

    /// Load configuration from the default path.
    ///
    /// - Returns `Ok(Config::default())` if no config file exists.
    /// - Returns `Err` if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Get the settings for a provider.
    pub fn provider(&self, provider: Provider) -> &ProviderConfig {
        match provider {
            Provider::GitHub => &self.providers.github,
            Provider::Bitbucket => &self.providers.bitbucket,
            Provider::Other => &self.providers.other,
        }
    }

    /// Get the placeholder secret for a provider, if one is configured.
    pub fn sentinel_for(&self, provider: Provider) -> Option<SecretString> {
        let sentinel = &self.provider(provider).sentinel_secret;
        if sentinel.is_empty() {
            None
        } else {
            Some(SecretString::from(sentinel.as_str()))
        }
    }
}
