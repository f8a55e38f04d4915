//! Error types and handling for the `riskcast` application

use thiserror::Error;

/// Main error type for the `riskcast` application
#[derive(Error, Debug)]
pub enum RiskcastError {
    /// No configured means could resolve the requested place
    #[error("Location not found: {query}")]
    NotFound { query: String },

    /// Every routing provider failed or none was configured
    #[error("No route found between ({:.4}, {:.4}) and ({:.4}, {:.4})", start.0, start.1, end.0, end.1)]
    NoRouteFound { start: (f64, f64), end: (f64, f64) },

    /// A single provider call failed; absorbed by the fallback chain
    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    /// Weather data could not be fetched
    #[error("Weather unavailable: {message}")]
    WeatherUnavailable { message: String },

    /// The loaded model disagrees with the in-code feature contract
    #[error("Model schema mismatch: model expects {model} features, contract has {contract}")]
    SchemaMismatch { model: usize, contract: usize },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl RiskcastError {
    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(query: S) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    /// Create a new provider error
    pub fn provider<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a new weather-unavailable error
    pub fn weather<S: Into<String>>(message: S) -> Self {
        Self::WeatherUnavailable {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RiskcastError::NotFound { query } => {
                format!(
                    "Could not find '{query}'. You can enter coordinates directly as 'lat, lon'."
                )
            }
            RiskcastError::NoRouteFound { .. } => {
                "No route could be calculated between these points.".to_string()
            }
            RiskcastError::Provider { .. } | RiskcastError::WeatherUnavailable { .. } => {
                "Unable to reach external services. Please check your internet connection."
                    .to_string()
            }
            RiskcastError::SchemaMismatch { .. } => {
                "The loaded risk model is incompatible with this version. Please retrain or update the model artifact."
                    .to_string()
            }
            RiskcastError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            RiskcastError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            RiskcastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = RiskcastError::config("missing model artifact");
        assert!(matches!(config_err, RiskcastError::Config { .. }));

        let provider_err = RiskcastError::provider("nominatim", "timeout");
        assert!(matches!(provider_err, RiskcastError::Provider { .. }));

        let validation_err = RiskcastError::validation("invalid coordinates");
        assert!(matches!(validation_err, RiskcastError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let not_found = RiskcastError::not_found("Atlantis");
        assert!(not_found.user_message().contains("Atlantis"));

        let config_err = RiskcastError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let schema_err = RiskcastError::SchemaMismatch {
            model: 8,
            contract: 12,
        };
        assert!(schema_err.user_message().contains("incompatible"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let riskcast_err: RiskcastError = io_err.into();
        assert!(matches!(riskcast_err, RiskcastError::Io { .. }));
    }
}
