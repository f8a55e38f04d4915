//! Weather client.
//!
//! A single provider, no fallback chain: the OpenMeteo current-weather
//! endpoint is keyless, so the weather path keeps working even when no
//! API key of any kind is configured. Snapshots are cached in an owned
//! TTL cache keyed by the rounded coordinate, so repeated predictions
//! for the same place within the freshness window cost one upstream call.

use crate::cache::TtlCache;
use crate::config::WeatherConfig;
use crate::error::RiskcastError;
use crate::models::{Coordinate, WeatherSnapshot};
use chrono::Utc;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info, instrument};

const PROVIDER_NAME: &str = "open-meteo";
const BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Source of current weather observations
pub trait WeatherProvider: Send + Sync {
    /// Stable provider name for logs
    fn name(&self) -> &'static str;

    /// Fetch current conditions at a coordinate
    fn current(&self, coordinate: Coordinate) -> Result<WeatherSnapshot, RiskcastError>;
}

/// OpenMeteo current-weather provider (keyless free tier)
pub struct OpenMeteoProvider {
    client: Client,
}

impl OpenMeteoProvider {
    pub fn new(timeout: Duration) -> Result<Self, RiskcastError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("riskcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RiskcastError::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl WeatherProvider for OpenMeteoProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    fn current(&self, coordinate: Coordinate) -> Result<WeatherSnapshot, RiskcastError> {
        let url = format!(
            "{BASE_URL}?latitude={}&longitude={}&current=temperature_2m,relative_humidity_2m,windspeed_10m,precipitation,surface_pressure,weathercode&wind_speed_unit=ms",
            coordinate.latitude, coordinate.longitude
        );

        debug!(url, "querying open-meteo");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| RiskcastError::weather(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RiskcastError::weather(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let payload: openmeteo::ForecastResponse = response
            .json()
            .map_err(|e| RiskcastError::weather(format!("invalid payload: {e}")))?;

        let current = payload
            .current
            .ok_or_else(|| RiskcastError::weather("no current weather in response"))?;

        Ok(WeatherSnapshot {
            temperature: current.temperature,
            humidity: current.humidity,
            wind_speed: current.wind_speed,
            precipitation: current.precipitation,
            pressure: current.pressure,
            condition_code: current.weather_code,
            observed_at: Utc::now(),
        })
    }
}

/// Caching facade over the weather provider
pub struct WeatherClient {
    provider: Box<dyn WeatherProvider>,
    cache: TtlCache<WeatherSnapshot>,
    ttl: Duration,
    precision: u32,
}

impl WeatherClient {
    /// Build a client with an explicit provider and an owned cache
    #[must_use]
    pub fn new(provider: Box<dyn WeatherProvider>, config: &WeatherConfig) -> Self {
        Self {
            provider,
            cache: TtlCache::new(),
            ttl: Duration::from_secs(u64::from(config.cache_ttl_minutes) * 60),
            precision: config.coordinate_precision,
        }
    }

    /// Build the default OpenMeteo-backed client
    pub fn open_meteo(config: &WeatherConfig, timeout: Duration) -> Result<Self, RiskcastError> {
        Ok(Self::new(Box::new(OpenMeteoProvider::new(timeout)?), config))
    }

    /// Current weather at a coordinate, served from cache within the
    /// freshness window.
    #[instrument(skip(self))]
    pub fn current_weather(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot, RiskcastError> {
        let coordinate =
            Coordinate::new(latitude, longitude).map_err(|e| RiskcastError::weather(e.to_string()))?;
        let key = coordinate.cache_key(self.precision);

        if let Some(snapshot) = self.cache.get(&key) {
            debug!(key, "serving weather from cache");
            return Ok(snapshot);
        }

        let snapshot = self.provider.current(coordinate)?;
        info!(
            provider = self.provider.name(),
            temperature = snapshot.temperature,
            condition = snapshot.condition_description(),
            "fetched current weather"
        );
        self.cache.put(&key, snapshot.clone(), self.ttl);
        Ok(snapshot)
    }
}

/// `OpenMeteo` API response structures
mod openmeteo {
    use serde::Deserialize;

    /// Current weather response from `OpenMeteo`
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub current: Option<CurrentData>,
    }

    /// Current weather block
    #[derive(Debug, Deserialize)]
    pub struct CurrentData {
        #[serde(rename = "temperature_2m")]
        pub temperature: f32,
        #[serde(rename = "relative_humidity_2m")]
        pub humidity: f32,
        #[serde(rename = "windspeed_10m")]
        pub wind_speed: f32,
        pub precipitation: f32,
        #[serde(rename = "surface_pressure")]
        pub pressure: f32,
        #[serde(rename = "weathercode")]
        pub weather_code: u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    impl WeatherProvider for CountingProvider {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn current(&self, _coordinate: Coordinate) -> Result<WeatherSnapshot, RiskcastError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(WeatherSnapshot {
                temperature: 25.0,
                humidity: 60.0,
                wind_speed: 4.0,
                precipitation: 0.0,
                pressure: 1013.0,
                condition_code: 0,
                observed_at: Utc::now(),
            })
        }
    }

    fn counting_client(config: &WeatherConfig) -> (WeatherClient, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CountingProvider {
            calls: Arc::clone(&calls),
        };
        (WeatherClient::new(Box::new(provider), config), calls)
    }

    #[test]
    fn test_cache_hit_within_freshness_window() {
        let (client, calls) = counting_client(&WeatherConfig::default());

        client.current_weather(6.5244, 3.3792).unwrap();
        client.current_weather(6.5244, 3.3792).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nearby_coordinates_share_cache_key() {
        let (client, calls) = counting_client(&WeatherConfig::default());

        // Same coordinate after rounding to 2 decimal places
        client.current_weather(6.5244, 3.3792).unwrap();
        client.current_weather(6.5236, 3.3788).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_distinct_coordinates_fetch_separately() {
        let (client, calls) = counting_client(&WeatherConfig::default());

        client.current_weather(6.5244, 3.3792).unwrap();
        client.current_weather(-1.2864, 36.8172).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_open_meteo_client_builds() {
        let client = WeatherClient::open_meteo(&WeatherConfig::default(), Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_coordinate_is_unavailable() {
        let (client, calls) = counting_client(&WeatherConfig::default());

        let result = client.current_weather(120.0, 3.0);
        assert!(matches!(result, Err(RiskcastError::WeatherUnavailable { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
