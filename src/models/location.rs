//! Location models: coordinates, directory records and resolution results

use crate::error::RiskcastError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated geographic coordinate
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, RiskcastError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(RiskcastError::validation(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(RiskcastError::validation(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Round coordinates for cache key generation
    #[must_use]
    pub fn rounded(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(2));
        let lat = (self.latitude * multiplier).round() / multiplier;
        let lon = (self.longitude * multiplier).round() / multiplier;
        (lat, lon)
    }

    /// Generate the weather cache key for this coordinate
    #[must_use]
    pub fn cache_key(&self, precision: u32) -> String {
        let (lat, lon) = self.rounded(precision);
        format!("weather:{lat}:{lon}")
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A known city in the static directory. Immutable once loaded;
/// uniqueness key is (name lowercased, country).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CityRecord {
    /// City name
    pub name: String,
    /// Country name
    pub country: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Approximate population, when known
    pub population: Option<u64>,
}

impl CityRecord {
    /// Display label in "City, Country" form
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// Where a resolution result came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationSource {
    /// Static city directory
    Directory,
    /// External geocoding provider, by name
    Provider(String),
    /// User-supplied raw coordinates
    Manual,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationSource::Directory => write!(f, "database"),
            LocationSource::Provider(name) => write!(f, "provider:{name}"),
            LocationSource::Manual => write!(f, "manual"),
        }
    }
}

/// How confident the resolver is in the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    /// An exact directory or coordinate match
    Exact,
    /// A fuzzy or provider-ranked match
    Approximate,
}

/// The outcome of a successful place resolution.
///
/// Coordinates are always valid and complete: construction goes through
/// [`Coordinate::new`], so a `ResolvedLocation` can never hold a
/// partially-populated position.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Human-readable label for the place
    pub label: String,
    /// How the place was resolved
    pub source: LocationSource,
    /// Match confidence
    pub confidence: Confidence,
}

impl ResolvedLocation {
    /// Create a resolved location, validating coordinate bounds
    pub fn new(
        latitude: f64,
        longitude: f64,
        label: String,
        source: LocationSource,
        confidence: Confidence,
    ) -> Result<Self, RiskcastError> {
        let coord = Coordinate::new(latitude, longitude)?;
        Ok(Self {
            latitude: coord.latitude,
            longitude: coord.longitude,
            label,
            source,
            confidence,
        })
    }

    /// The position as a [`Coordinate`]
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

impl From<&CityRecord> for ResolvedLocation {
    fn from(record: &CityRecord) -> Self {
        Self {
            latitude: record.latitude,
            longitude: record.longitude,
            label: record.label(),
            source: LocationSource::Directory,
            confidence: Confidence::Exact,
        }
    }
}
