//! Static city directory.
//!
//! An in-memory table of known cities, loaded once at startup and never
//! mutated. Lookups are pure and free; the resolution policy consults
//! this directory before spending quota on external geocoders.
//! The bundled roster is data, not logic: `from_records` accepts any
//! replacement list.

use crate::error::RiskcastError;
use crate::models::CityRecord;
use std::collections::HashMap;

/// Bundled roster, embedded at compile time
const BUNDLED_CITIES: &str = include_str!("../data/cities.json");

/// In-memory city table with name/country and prefix lookup
pub struct CityDirectory {
    records: Vec<CityRecord>,
    /// (name lowercased, country lowercased) -> index into `records`
    by_key: HashMap<(String, String), usize>,
}

impl CityDirectory {
    /// Build a directory from an arbitrary record list.
    ///
    /// Records with out-of-range coordinates are rejected rather than
    /// silently dropped, so a bad roster fails at startup.
    pub fn from_records(records: Vec<CityRecord>) -> Result<Self, RiskcastError> {
        for record in &records {
            if !(-90.0..=90.0).contains(&record.latitude)
                || !(-180.0..=180.0).contains(&record.longitude)
            {
                return Err(RiskcastError::config(format!(
                    "City '{}' has invalid coordinates ({}, {})",
                    record.name, record.latitude, record.longitude
                )));
            }
        }

        let by_key = records
            .iter()
            .enumerate()
            .map(|(i, r)| ((r.name.to_lowercase(), r.country.to_lowercase()), i))
            .collect();

        Ok(Self { records, by_key })
    }

    /// Load the roster bundled with the binary
    pub fn bundled() -> Result<Self, RiskcastError> {
        let records: Vec<CityRecord> = serde_json::from_str(BUNDLED_CITIES)
            .map_err(|e| RiskcastError::config(format!("Invalid bundled city roster: {e}")))?;
        Self::from_records(records)
    }

    /// Exact case-insensitive lookup by name, optionally filtered by country.
    /// Not-found is a normal outcome, not an error.
    #[must_use]
    pub fn lookup(&self, name: &str, country: Option<&str>) -> Option<&CityRecord> {
        let name_key = name.trim().to_lowercase();
        match country {
            Some(country) => self
                .by_key
                .get(&(name_key, country.trim().to_lowercase()))
                .map(|&i| &self.records[i]),
            None => self
                .records
                .iter()
                .filter(|r| r.name.to_lowercase() == name_key)
                .max_by_key(|r| r.population.unwrap_or(0)),
        }
    }

    /// Prefix-matched suggestions, ranked by population descending
    #[must_use]
    pub fn autocomplete(&self, prefix: &str, limit: usize) -> Vec<&CityRecord> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.len() < 2 {
            return Vec::new();
        }

        let mut matches: Vec<&CityRecord> = self
            .records
            .iter()
            .filter(|r| r.name.to_lowercase().starts_with(&prefix))
            .collect();
        matches.sort_by(|a, b| b.population.unwrap_or(0).cmp(&a.population.unwrap_or(0)));
        matches.truncate(limit);
        matches
    }

    /// All cities of a country, case-insensitive
    #[must_use]
    pub fn list_by_country(&self, country: &str) -> Vec<&CityRecord> {
        let country = country.trim().to_lowercase();
        self.records
            .iter()
            .filter(|r| r.country.to_lowercase() == country)
            .collect()
    }

    /// All known records
    #[must_use]
    pub fn records(&self) -> &[CityRecord] {
        &self.records
    }

    /// Number of records in the directory
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the directory is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
