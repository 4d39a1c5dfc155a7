//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Hosted generation endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1/models/gemini-2.5-flash:generateContent";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Upper limit for `generation.max_attempts`
pub const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// Tripwise configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Generation settings. The API key is never part of this table; unknown
/// fields such as `api_key` are rejected when parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            temperature: 0.7,
            max_output_tokens: 3000,
            max_attempts: 5,
            backoff_base_ms: 1000,
            timeout_secs: 120,
        }
    }
}

impl GenerationConfig {
    /// Delay before the retry that follows the 0-indexed `attempt`
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_millis(self.backoff_base_ms.saturating_mul(factor))
    }

    /// Per-attempt HTTP timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key from the environment, ignoring blank values
    pub fn resolved_api_key(&self) -> Option<String> {
        env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn redacted_api_key(&self) -> Option<String> {
        self.resolved_api_key().map(|key| redact_key(&key))
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(anyhow!("Endpoint must not be empty"));
        }
        Url::parse(&self.endpoint)
            .with_context(|| format!("Invalid endpoint URL: {}", self.endpoint))?;
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(anyhow!("Temperature must be between 0.0 and 2.0"));
        }
        if self.max_output_tokens == 0 {
            return Err(anyhow!("max_output_tokens must be greater than 0"));
        }
        if !(1..=MAX_ATTEMPTS_LIMIT).contains(&self.max_attempts) {
            return Err(anyhow!(
                "max_attempts must be between 1 and {}",
                MAX_ATTEMPTS_LIMIT
            ));
        }
        if self.backoff_base_ms == 0 {
            return Err(anyhow!("backoff_base_ms must be greater than 0"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than 0"));
        }
        Ok(())
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("TRIPWISE_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("tripwise")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or fall back to defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create config directory: {}", dir.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.generation.validate()
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        let generation = &self.generation;
        match key {
            "generation.endpoint" => Ok(generation.endpoint.clone()),
            "generation.temperature" => Ok(generation.temperature.to_string()),
            "generation.max_output_tokens" => Ok(generation.max_output_tokens.to_string()),
            "generation.max_attempts" => Ok(generation.max_attempts.to_string()),
            "generation.backoff_base_ms" => Ok(generation.backoff_base_ms.to_string()),
            "generation.timeout_secs" => Ok(generation.timeout_secs.to_string()),

            // API key (special handling - show redacted)
            "generation.api_key" | "api_key" => match generation.redacted_api_key() {
                Some(redacted) => Ok(redacted),
                None => Ok(format!("(not set - use {} env var)", API_KEY_ENV)),
            },

            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `tripwise config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    ///
    /// The updated config is validated before it is accepted, so a rejected
    /// value leaves `self` unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut updated = self.generation.clone();
        match key {
            "generation.endpoint" => {
                updated.endpoint = value.trim().to_string();
            }
            "generation.temperature" => {
                updated.temperature = value
                    .parse()
                    .with_context(|| format!("Invalid temperature value: {}", value))?;
            }
            "generation.max_output_tokens" => {
                updated.max_output_tokens = value
                    .parse()
                    .with_context(|| format!("Invalid max_output_tokens value: {}", value))?;
            }
            "generation.max_attempts" => {
                updated.max_attempts = value
                    .parse()
                    .with_context(|| format!("Invalid max_attempts value: {}", value))?;
            }
            "generation.backoff_base_ms" => {
                updated.backoff_base_ms = value
                    .parse()
                    .with_context(|| format!("Invalid backoff_base_ms value: {}", value))?;
            }
            "generation.timeout_secs" => {
                updated.timeout_secs = value
                    .parse()
                    .with_context(|| format!("Invalid timeout_secs value: {}", value))?;
            }

            // API key cannot be set via config
            "generation.api_key" | "api_key" => {
                return Err(anyhow!(
                    "API keys cannot be stored in configuration for security. \
                     Set the {} environment variable instead.",
                    API_KEY_ENV
                ));
            }

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `tripwise config list` to see available keys.",
                    key
                ));
            }
        }
        updated.validate()?;
        self.generation = updated;
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = [
            "generation.endpoint",
            "generation.temperature",
            "generation.max_output_tokens",
            "generation.max_attempts",
            "generation.backoff_base_ms",
            "generation.timeout_secs",
            "generation.api_key",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        Self::reset_at(&Self::config_path()?)
    }

    /// Remove the config file at an explicit path, if present
    pub fn reset_at(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

/// Mask a key down to its last four characters
fn redact_key(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        "***".to_string()
    } else {
        let suffix: String = key.chars().skip(count - 4).collect();
        format!("***{}", suffix)
    }
}
