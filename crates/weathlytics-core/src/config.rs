use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable that overrides `weather.api_key`.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_CITY: &str = "London";
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the config file was loaded from
    #[serde(skip)]
    pub config_dir: PathBuf,

    /// Weather gateway and lookup settings
    pub weather: WeatherConfig,

    /// Display preferences
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Current-conditions endpoint
    pub api_url: String,

    /// OpenWeatherMap API key. Usually supplied via `OPENWEATHER_API_KEY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// City fetched once at startup when an API key is present
    pub default_city: String,

    /// Maximum number of recent searches kept
    pub history_limit: usize,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            default_city: DEFAULT_CITY.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl WeatherConfig {
    /// True when a non-blank API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Start in dark mode
    pub dark_mode: bool,
}

impl Config {
    /// Load configuration from the default location, creating it if missing.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let config = Self::load_from(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
        Ok(config)
    }

    /// Load configuration from `path`. A missing file is created with defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        if !path.exists() {
            let config = Self {
                config_dir,
                ..Self::default()
            };
            config.save_to(path)?;
            tracing::info!("Created default config at {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::NotFound(format!("{}: {}", path.display(), e)))?;

        let mut config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.config_dir = config_dir;

        Ok(config)
    }

    /// Load configuration, apply environment overrides and validate.
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Resolve the API key from the process environment.
    ///
    /// This is the only place the environment is consulted; everything
    /// downstream receives the key explicitly.
    pub fn apply_env_overrides(&mut self) {
        self.override_api_key(std::env::var(API_KEY_ENV).ok());
    }

    /// Replace the API key when `value` is non-blank.
    pub fn override_api_key(&mut self, value: Option<String>) {
        if let Some(key) = value.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
            tracing::debug!("Using API key from {}", API_KEY_ENV);
            self.weather.api_key = Some(key);
        }
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.api_url, "weather.api_url", &mut result);

        if self.weather.default_city.trim().is_empty() {
            result.add_error("weather.default_city", "Default city must not be empty");
        }

        if self.weather.history_limit == 0 {
            result.add_error(
                "weather.history_limit",
                "History limit must be greater than 0",
            );
        } else if self.weather.history_limit > 50 {
            result.add_warning(
                "weather.history_limit",
                "History limit is unusually large (>50)",
            );
        }

        // Searches still work without a key; the gateway will reject them.
        if !self.weather.has_api_key() {
            result.add_warning(
                "weather.api_key",
                format!("No API key configured (set {})", API_KEY_ENV),
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Invalid(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))?;

        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Invalid(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("weathlytics");

        Ok(config_dir.join("config.toml"))
    }
}
