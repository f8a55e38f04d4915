//! `Riskcast` - Localized emergency risk prediction and response routing
//!
//! This library resolves free-text places to coordinates, fetches current
//! weather conditions, scores localized emergency risk with a trained
//! classifier, and proposes driving routes between resolved locations.

pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod geocode;
pub mod location_service;
pub mod models;
pub mod predictor;
pub mod ratelimit;
pub mod routing;
pub mod weather;

// Re-export core types for public API
pub use cache::TtlCache;
pub use config::RiskcastConfig;
pub use directory::CityDirectory;
pub use error::RiskcastError;
pub use geocode::{GeocodeCandidate, GeocodeProvider, GeocodingResolver};
pub use location_service::LocationService;
pub use models::{
    Confidence, Coordinate, LocationSource, ResolvedLocation, RiskCategory, RiskResult,
    RiskThresholds, RouteResult, WeatherSnapshot,
};
pub use predictor::{RiskModel, RiskPredictor};
pub use ratelimit::RateBudget;
pub use routing::{RouteProvider, RouteResolver};
pub use weather::{WeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, RiskcastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
