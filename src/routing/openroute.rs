//! OpenRouteService routing provider. Requires an API key sent as an
//! Authorization header; coordinates go in a JSON body as [lon, lat].

use super::RouteProvider;
use crate::error::RiskcastError;
use crate::models::{Coordinate, RouteResult};
use crate::ratelimit::RateBudget;
use reqwest::blocking::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER_NAME: &str = "openroute";
const BASE_URL: &str = "https://api.openrouteservice.org/v2/directions/driving-car/geojson";

pub struct OpenRouteRouter {
    client: Client,
    api_key: String,
    budget: RateBudget,
}

impl OpenRouteRouter {
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

impl RouteProvider for OpenRouteRouter {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    #[instrument(skip(self))]
    fn route(&self, start: Coordinate, end: Coordinate) -> Result<RouteResult, RiskcastError> {
        if !self.budget.allow_request() {
            return Err(RiskcastError::provider(
                PROVIDER_NAME,
                "rate budget exhausted",
            ));
        }

        let body = json!({
            "coordinates": [
                [start.longitude, start.latitude],
                [end.longitude, end.latitude],
            ],
        });

        debug!("querying openrouteservice");
        let response = self
            .client
            .post(BASE_URL)
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| RiskcastError::provider(PROVIDER_NAME, e.to_string()))?;

        if !response.status().is_success() {
            return Err(RiskcastError::provider(
                PROVIDER_NAME,
                format!("HTTP {}", response.status()),
            ));
        }

        let payload: schema::DirectionsResponse = response
            .json()
            .map_err(|e| RiskcastError::provider(PROVIDER_NAME, format!("invalid payload: {e}")))?;

        let feature = payload
            .features
            .into_iter()
            .next()
            .ok_or_else(|| RiskcastError::provider(PROVIDER_NAME, "no routes in response"))?;

        let coordinates = feature
            .geometry
            .coordinates
            .into_iter()
            .filter_map(|pair| Coordinate::new(*pair.get(1)?, *pair.first()?).ok())
            .collect();

        // Summary reports meters and seconds
        Ok(RouteResult {
            distance_km: feature.properties.summary.distance / 1000.0,
            duration_min: feature.properties.summary.duration / 60.0,
            path: coordinates,
            provider_used: PROVIDER_NAME.to_string(),
        })
    }
}

/// OpenRouteService GeoJSON response structures
mod schema {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct DirectionsResponse {
        #[serde(default)]
        pub features: Vec<Feature>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Feature {
        pub properties: Properties,
        pub geometry: Geometry,
    }

    #[derive(Debug, Deserialize)]
    pub struct Properties {
        pub summary: Summary,
    }

    #[derive(Debug, Deserialize)]
    pub struct Summary {
        /// Distance in meters
        #[serde(default)]
        pub distance: f64,
        /// Duration in seconds
        #[serde(default)]
        pub duration: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        #[serde(default)]
        pub coordinates: Vec<Vec<f64>>,
    }
}
