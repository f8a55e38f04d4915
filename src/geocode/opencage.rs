//! OpenCage geocoder. Requires an API key; second in the default chain.

use super::{GeocodeCandidate, GeocodeProvider};
use crate::error::RiskcastError;
use crate::ratelimit::RateBudget;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER_NAME: &str = "opencage";
const BASE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

pub struct OpenCageGeocoder {
    client: Client,
    api_key: String,
    budget: RateBudget,
}

impl OpenCageGeocoder {
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

impl GeocodeProvider for OpenCageGeocoder {
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
            "{BASE_URL}?q={}&key={}&limit=1",
            urlencoding::encode(query),
            self.api_key
        );
        if let Some(country) = country_hint {
            url.push_str(&format!(
                "&countrycode={}",
                urlencoding::encode(&country.to_lowercase())
            ));
        }

        debug!("querying opencage");
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

        let result = payload
            .results
            .into_iter()
            .next()
            .ok_or_else(|| RiskcastError::provider(PROVIDER_NAME, "no results"))?;

        Ok(GeocodeCandidate {
            latitude: result.geometry.lat,
            longitude: result.geometry.lng,
            label: result.formatted,
        })
    }
}

/// OpenCage API response structures
mod schema {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResponse {
        #[serde(default)]
        pub results: Vec<GeocodeResult>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResult {
        pub formatted: String,
        pub geometry: Geometry,
    }

    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        pub lat: f64,
        pub lng: f64,
    }
}
