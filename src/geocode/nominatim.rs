//! Nominatim (OpenStreetMap) geocoder. Keyless free tier; requires a
//! descriptive user agent and tolerates at most one request per second,
//! so the budget passed in is clamped accordingly.

use super::{GeocodeCandidate, GeocodeProvider};
use crate::error::RiskcastError;
use crate::ratelimit::RateBudget;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER_NAME: &str = "nominatim";
const BASE_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Nominatim usage policy caps anonymous clients at 1 request/second
const NOMINATIM_MAX_PER_MINUTE: u32 = 60;

pub struct NominatimGeocoder {
    client: Client,
    budget: RateBudget,
}

impl NominatimGeocoder {
    pub fn new(timeout: Duration, requests_per_minute: u32) -> Result<Self, RiskcastError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("riskcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RiskcastError::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            budget: RateBudget::new(requests_per_minute.min(NOMINATIM_MAX_PER_MINUTE)),
        })
    }
}

impl GeocodeProvider for NominatimGeocoder {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    #[instrument(skip(self))]
    fn geocode(
        &self,
        query: &str,
        country_hint: Option<&str>,
    ) -> Result<GeocodeCandidate, RiskcastError> {
        if !self.budget.allow_request() {
            return Err(RiskcastError::provider(
                PROVIDER_NAME,
                "rate budget exhausted",
            ));
        }

        let mut url = format!(
            "{BASE_URL}?q={}&format=json&limit=1",
            urlencoding::encode(query)
        );
        if let Some(country) = country_hint {
            url.push_str(&format!(
                "&countrycodes={}",
                urlencoding::encode(&country.to_lowercase())
            ));
        }

        debug!(url, "querying nominatim");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| RiskcastError::provider(PROVIDER_NAME, e.to_string()))?;

        if !response.status().is_success() {
            return Err(RiskcastError::provider(
                PROVIDER_NAME,
                format!("HTTP {}", response.status()),
            ));
        }

        let places: Vec<schema::Place> = response
            .json()
            .map_err(|e| RiskcastError::provider(PROVIDER_NAME, format!("invalid payload: {e}")))?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| RiskcastError::provider(PROVIDER_NAME, "no results"))?;

        let latitude: f64 = place
            .lat
            .parse()
            .map_err(|_| RiskcastError::provider(PROVIDER_NAME, "non-numeric latitude"))?;
        let longitude: f64 = place
            .lon
            .parse()
            .map_err(|_| RiskcastError::provider(PROVIDER_NAME, "non-numeric longitude"))?;

        Ok(GeocodeCandidate {
            latitude,
            longitude,
            label: place.display_name,
        })
    }
}

/// Nominatim API response structures
mod schema {
    use serde::Deserialize;

    /// One search hit; Nominatim returns coordinates as strings
    #[derive(Debug, Deserialize)]
    pub struct Place {
        pub lat: String,
        pub lon: String,
        pub display_name: String,
    }
}
