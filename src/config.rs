//! Configuration management for the `riskcast` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings. Presence or
//! absence of a provider API key toggles whether that provider is ever
//! attempted; a category with no keys degrades to its free-tier
//! providers and never crashes.

use crate::error::RiskcastError;
use crate::models::RiskThresholds;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `riskcast` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskcastConfig {
    /// External provider credentials and limits
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Weather client configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Risk model configuration
    #[serde(default)]
    pub model: ModelConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// External provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Google Maps key (geocoding and directions)
    pub google_maps_api_key: Option<String>,
    /// OpenCage geocoder key
    pub opencage_api_key: Option<String>,
    /// GraphHopper routing key
    pub graphhopper_api_key: Option<String>,
    /// OpenRouteService routing key
    pub openroute_api_key: Option<String>,
    /// Whether the keyless Nominatim geocoder may be used
    #[serde(default = "default_nominatim_enabled")]
    pub nominatim_enabled: bool,
    /// Per-request network timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u32,
    /// Per-provider request budget per minute
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

/// Weather client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Freshness window for cached snapshots, in minutes
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u32,
    /// Decimal places used when rounding coordinates for the cache key
    #[serde(default = "default_coordinate_precision")]
    pub coordinate_precision: u32,
}

/// Risk model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the serialized model artifact
    #[serde(default = "default_model_path")]
    pub path: String,
    /// Category cut points
    #[serde(default)]
    pub thresholds: RiskThresholds,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_nominatim_enabled() -> bool {
    true
}

fn default_timeout_seconds() -> u32 {
    10
}

fn default_requests_per_minute() -> u32 {
    30
}

fn default_cache_ttl_minutes() -> u32 {
    10
}

fn default_coordinate_precision() -> u32 {
    2
}

fn default_model_path() -> String {
    "models/risk_model.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            google_maps_api_key: None,
            opencage_api_key: None,
            graphhopper_api_key: None,
            openroute_api_key: None,
            nominatim_enabled: default_nominatim_enabled(),
            timeout_seconds: default_timeout_seconds(),
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            cache_ttl_minutes: default_cache_ttl_minutes(),
            coordinate_precision: default_coordinate_precision(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            thresholds: RiskThresholds::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl RiskcastConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with RISKCAST__ prefix,
        // e.g. RISKCAST__PROVIDERS__OPENCAGE_API_KEY
        builder = builder.add_source(
            Environment::with_prefix("RISKCAST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: RiskcastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("riskcast").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.model.thresholds.validate()?;
        Ok(())
    }

    /// Validate API keys and credentials. All keys are optional; a
    /// present-but-empty key is a configuration mistake, not a toggle.
    fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("google_maps_api_key", &self.providers.google_maps_api_key),
            ("opencage_api_key", &self.providers.opencage_api_key),
            ("graphhopper_api_key", &self.providers.graphhopper_api_key),
            ("openroute_api_key", &self.providers.openroute_api_key),
        ];

        for (name, key) in keys {
            if let Some(key) = key {
                if key.trim().is_empty() {
                    return Err(RiskcastError::config(format!(
                        "{name} cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.providers.timeout_seconds == 0 || self.providers.timeout_seconds > 60 {
            return Err(
                RiskcastError::config("Provider timeout must be between 1 and 60 seconds").into(),
            );
        }

        if self.providers.requests_per_minute == 0 {
            return Err(
                RiskcastError::config("Provider request budget must be at least 1 per minute")
                    .into(),
            );
        }

        if self.weather.cache_ttl_minutes == 0 || self.weather.cache_ttl_minutes > 60 {
            return Err(
                RiskcastError::config("Weather cache TTL must be between 1 and 60 minutes").into(),
            );
        }

        if self.weather.coordinate_precision > 6 {
            return Err(RiskcastError::config(
                "Weather coordinate precision cannot exceed 6 decimal places",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(RiskcastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        if self.model.path.trim().is_empty() {
            return Err(RiskcastError::config("Model path cannot be empty").into());
        }

        Ok(())
    }
}
