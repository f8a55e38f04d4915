//! Google Geocoding API provider. Requires an API key; highest priority
//! in the default chain when configured.

use super::{GeocodeCandidate, GeocodeProvider};
use crate::error::RiskcastError;
use crate::ratelimit::RateBudget;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER_NAME: &str = "google";
const BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

pub struct GoogleGeocoder {
    client: Client,
    api_key: String,
    budget: RateBudget,
}

impl GoogleGeocoder {
    pub fn new(
        api_key: String,
        timeout: Duration,
        requests_per_minute: u32,
    ) -> Result<Self, RiskcastError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("riskcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RiskcastError::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key,
            budget: RateBudget::new(requests_per_minute),
        })
    }
}

impl GeocodeProvider for GoogleGeocoder {
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
            "{BASE_URL}?address={}&key={}",
            urlencoding::encode(query),
            self.api_key
        );
        if let Some(country) = country_hint {
            url.push_str(&format!(
                "&components=country:{}",
                urlencoding::encode(country)
            ));
        }

        debug!("querying google geocoding");
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

        let payload: schema::GeocodeResponse = response
            .json()
            .map_err(|e| RiskcastError::provider(PROVIDER_NAME, format!("invalid payload: {e}")))?;

        if payload.status != "OK" {
            return Err(RiskcastError::provider(
                PROVIDER_NAME,
                format!("status {}", payload.status),
            ));
        }

        let result = payload
            .results
            .into_iter()
            .next()
            .ok_or_else(|| RiskcastError::provider(PROVIDER_NAME, "no results"))?;

        Ok(GeocodeCandidate {
            latitude: result.geometry.location.lat,
            longitude: result.geometry.location.lng,
            label: result.formatted_address,
        })
    }
}

/// Google Geocoding API response structures
mod schema {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResponse {
        pub status: String,
        #[serde(default)]
        pub results: Vec<GeocodeResult>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResult {
        pub formatted_address: String,
        pub geometry: Geometry,
    }

    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        pub location: LatLng,
    }

    #[derive(Debug, Deserialize)]
    pub struct LatLng {
        pub lat: f64,
        pub lng: f64,
    }
}
