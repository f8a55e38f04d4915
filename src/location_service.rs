//! Place resolution orchestration.
//!
//! Composes the static city directory, the geocoding fallback chain and
//! the manual coordinate contract into one call. Order is cheapest
//! first: directory lookups are free and instantaneous, geocoding costs
//! quota and latency, so the directory is always consulted before any
//! provider is touched.

use crate::directory::CityDirectory;
use crate::error::RiskcastError;
use crate::geocode::GeocodingResolver;
use crate::models::{Confidence, LocationSource, ResolvedLocation};
use tracing::{debug, instrument};

/// Minimum prefix similarity for a directory autocomplete match to be
/// accepted without consulting a geocoder
const SIMILARITY_THRESHOLD: f64 = 0.75;

/// One-stop place resolution used by prediction and routing callers
pub struct LocationService {
    directory: CityDirectory,
    geocoder: GeocodingResolver,
}

impl LocationService {
    /// Create a service over a directory and a geocoding chain
    #[must_use]
    pub fn new(directory: CityDirectory, geocoder: GeocodingResolver) -> Self {
        Self {
            directory,
            geocoder,
        }
    }

    /// The underlying city directory
    #[must_use]
    pub fn directory(&self) -> &CityDirectory {
        &self.directory
    }

    /// Resolve free text to a validated location.
    ///
    /// Tie-break order: raw coordinates, exact directory match,
    /// directory prefix match above the similarity threshold, then the
    /// geocoding chain. On `NotFound` the caller is expected to offer
    /// raw coordinate entry, which re-enters here as the manual branch.
    #[instrument(skip(self))]
    pub fn resolve_place(
        &self,
        text: &str,
        country_filter: Option<&str>,
    ) -> Result<ResolvedLocation, RiskcastError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RiskcastError::not_found(text));
        }

        // Manual coordinate entry, e.g. "6.5244, 3.3792"
        if let Some((lat, lon)) = parse_coordinates(text) {
            let resolved = ResolvedLocation::new(
                lat,
                lon,
                format!("{lat:.4}, {lon:.4}"),
                LocationSource::Manual,
                Confidence::Exact,
            )?;
            debug!("resolved as manual coordinates");
            return Ok(resolved);
        }

        if let Some(record) = self.directory.lookup(text, country_filter) {
            debug!(city = record.name, "resolved from directory");
            return Ok(ResolvedLocation::from(record));
        }

        if let Some(record) = self.best_fuzzy_match(text, country_filter) {
            debug!(city = record.name, "resolved from directory by prefix");
            let mut resolved = ResolvedLocation::from(record);
            resolved.confidence = Confidence::Approximate;
            return Ok(resolved);
        }

        self.geocoder.resolve(text, country_filter)
    }

    /// Best autocomplete candidate whose name the query covers at least
    /// [`SIMILARITY_THRESHOLD`] of. Candidates are taken from the whole
    /// roster so the country filter never loses a lower-population match.
    fn best_fuzzy_match(
        &self,
        text: &str,
        country_filter: Option<&str>,
    ) -> Option<&crate::models::CityRecord> {
        let query_len = text.trim().chars().count() as f64;
        self.directory
            .autocomplete(text, self.directory.len())
            .into_iter()
            .filter(|r| {
                country_filter
                    .is_none_or(|c| r.country.eq_ignore_ascii_case(c.trim()))
            })
            .find(|r| query_len / r.name.chars().count() as f64 >= SIMILARITY_THRESHOLD)
    }
}

/// Parse a raw "lat, lon" pair. Out-of-range or non-numeric input is not
/// a coordinate literal and falls through to name resolution.
fn parse_coordinates(input: &str) -> Option<(f64, f64)> {
    let parts: Vec<&str> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();

    if parts.len() != 2 {
        return None;
    }

    let lat = parts[0].parse::<f64>().ok()?;
    let lon = parts[1].parse::<f64>().ok()?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }

    Some((lat, lon))
}
