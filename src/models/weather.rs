//! Weather snapshot model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current weather conditions at a coordinate.
///
/// Short-lived: fetched per prediction request, fed into one feature
/// vector and discarded (modulo the client's freshness cache).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Temperature in Celsius
    pub temperature: f32,
    /// Relative humidity in percent (0-100)
    pub humidity: f32,
    /// Wind speed in m/s
    pub wind_speed: f32,
    /// Precipitation amount in mm
    pub precipitation: f32,
    /// Atmospheric pressure in hPa
    pub pressure: f32,
    /// Weather condition code (WMO weather interpretation code)
    pub condition_code: u8,
    /// Observation timestamp
    pub observed_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Convert a WMO weather code to a human-readable description
    #[must_use]
    pub fn condition_description(&self) -> &'static str {
        match self.condition_code {
            0 => "Clear sky",
            1 => "Mainly clear",
            2 => "Partly cloudy",
            3 => "Overcast",
            45 => "Fog",
            48 => "Depositing rime fog",
            51 => "Light drizzle",
            53 => "Moderate drizzle",
            55 => "Dense drizzle",
            56 => "Light freezing drizzle",
            57 => "Dense freezing drizzle",
            61 => "Slight rain",
            63 => "Moderate rain",
            65 => "Heavy rain",
            66 => "Light freezing rain",
            67 => "Heavy freezing rain",
            71 => "Slight snow fall",
            73 => "Moderate snow fall",
            75 => "Heavy snow fall",
            77 => "Snow grains",
            80 => "Slight rain showers",
            81 => "Moderate rain showers",
            82 => "Violent rain showers",
            85 => "Slight snow showers",
            86 => "Heavy snow showers",
            95 => "Thunderstorm",
            96 => "Thunderstorm with slight hail",
            99 => "Thunderstorm with heavy hail",
            _ => "Unknown",
        }
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_description() {
        let mut snapshot = WeatherSnapshot {
            temperature: 21.5,
            humidity: 60.0,
            wind_speed: 4.2,
            precipitation: 0.0,
            pressure: 1013.0,
            condition_code: 0,
            observed_at: Utc::now(),
        };
        assert_eq!(snapshot.condition_description(), "Clear sky");

        snapshot.condition_code = 95;
        assert_eq!(snapshot.condition_description(), "Thunderstorm");

        snapshot.condition_code = 42;
        assert_eq!(snapshot.condition_description(), "Unknown");
    }

    #[test]
    fn test_format_temperature() {
        let snapshot = WeatherSnapshot {
            temperature: 21.54,
            humidity: 60.0,
            wind_speed: 4.2,
            precipitation: 0.0,
            pressure: 1013.0,
            condition_code: 0,
            observed_at: Utc::now(),
        };
        assert_eq!(snapshot.format_temperature(), "21.5°C");
    }
}
