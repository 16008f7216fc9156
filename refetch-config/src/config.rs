//! Construction-time configuration for a fetcher.
//!
//! Every field has a default, so a config can come from the builder, from a
//! YAML file, or from a section of a larger YAML document:
//!
//! ```yaml
//! fetcher:
//!   base_url: https://api.example.com/v1
//!   cache_ttl_ms: 60000
//!   max_retries: 2
//!   base_backoff_ms: 100
//!   max_backoff_ms: 2000
//!   jitter: true
//! ```
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::{fs, path, time::Duration};

pub const DEFAULT_CACHE_TTL_MS: u64 = 60_000;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_BASE_BACKOFF_MS: u64 = 100;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 2_000;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
    #[error("Config section not found: {0}")]
    MissingSection(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
    #[error("Uninitialized config field: {0}")]
    UninitializedField(#[from] derive_builder::UninitializedFieldError),
}

/// Immutable settings shared by every fetch made through one client.
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(
    public,
    setter(into),
    build_fn(validate = "Self::validate", error = "ConfigError")
)]
#[serde(default)]
pub struct FetcherConfig {
    /// Prefix joined with every requested path
    #[builder(default, setter(into, strip_option))]
    pub base_url: Option<String>,
    #[builder(default = "DEFAULT_CACHE_TTL_MS")]
    pub cache_ttl_ms: u64,
    /// Retries after the first attempt; total attempts = max_retries + 1
    #[builder(default = "DEFAULT_MAX_RETRIES")]
    pub max_retries: u32,
    #[builder(default = "DEFAULT_BASE_BACKOFF_MS")]
    pub base_backoff_ms: u64,
    #[builder(default = "DEFAULT_MAX_BACKOFF_MS")]
    pub max_backoff_ms: u64,
    /// Spread each backoff delay by +/-50%
    #[builder(default = "true")]
    pub jitter: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            base_backoff_ms: DEFAULT_BASE_BACKOFF_MS,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
            jitter: true,
        }
    }
}

impl FetcherConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn base_backoff(&self) -> Duration {
        Duration::from_millis(self.base_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    /// Total number of transport attempts a failing fetch will make.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_backoff(self.base_backoff_ms, self.max_backoff_ms)?;
        if let Some(url) = &self.base_url {
            check_base_url(url)?;
        }
        Ok(())
    }

    /// Read configuration from a yaml file holding the fetcher settings
    /// at the top level.
    pub fn load_config(
        config_file_path: impl AsRef<path::Path>,
    ) -> Result<Self, ConfigError> {
        let content: String = fs::read_to_string(config_file_path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Build from an already parsed yaml value, e.g. `&config["fetcher"]`.
    pub fn from_config(config: &serde_yaml::Value) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_value(config.clone())?;
        config.validate()?;
        Ok(config)
    }

    /// Build from a nested section addressed with dot notation,
    /// i.e. "services.todo.fetcher".
    pub fn from_config_section(
        config: &serde_yaml::Value,
        section: &str,
    ) -> Result<Self, ConfigError> {
        let value = lookup(config, section)
            .ok_or_else(|| ConfigError::MissingSection(section.to_string()))?;
        Self::from_config(value)
    }
}

impl FetcherConfigBuilder {
    fn validate(&self) -> Result<(), ConfigError> {
        check_backoff(
            self.base_backoff_ms.unwrap_or(DEFAULT_BASE_BACKOFF_MS),
            self.max_backoff_ms.unwrap_or(DEFAULT_MAX_BACKOFF_MS),
        )?;
        if let Some(Some(url)) = &self.base_url {
            check_base_url(url)?;
        }
        Ok(())
    }
}

fn check_backoff(base_ms: u64, max_ms: u64) -> Result<(), ConfigError> {
    if max_ms < base_ms {
        return Err(ConfigError::Invalid(format!(
            "max_backoff_ms ({max_ms}) is lower than base_backoff_ms ({base_ms})"
        )));
    }
    Ok(())
}

fn check_base_url(url: &str) -> Result<(), ConfigError> {
    if url.trim().is_empty() {
        return Err(ConfigError::Invalid("base_url is empty".to_string()));
    }
    Ok(())
}

/// Extract a value from yaml using dot notation i.e. "app.fetcher"
pub fn lookup<'a>(
    config: &'a serde_yaml::Value,
    key: &str,
) -> Option<&'a serde_yaml::Value> {
    if key.is_empty() {
        return None;
    }
    let keys: Vec<&str> = key.split('.').collect();
    lookup_recursive(config, &keys)
}

fn lookup_recursive<'a>(
    config: &'a serde_yaml::Value,
    keys: &[&str],
) -> Option<&'a serde_yaml::Value> {
    let (key, remaining_keys) = keys.split_first()?;

    match config {
        serde_yaml::Value::Mapping(map) => {
            let value = map.get(serde_yaml::Value::String(key.to_string()))?;
            if remaining_keys.is_empty() {
                Some(value)
            } else {
                lookup_recursive(value, remaining_keys)
            }
        }
        _ => None,
    }
}
