//! GraphHopper routing provider. Requires an API key; highest priority
//! in the default chain when configured.

use super::RouteProvider;
use crate::error::RiskcastError;
use crate::models::{Coordinate, RouteResult};
use crate::ratelimit::RateBudget;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER_NAME: &str = "graphhopper";
const BASE_URL: &str = "https://graphhopper.com/api/1/route";

pub struct GraphHopperRouter {
    client: Client,
    api_key: String,
    budget: RateBudget,
}

impl GraphHopperRouter {
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

impl RouteProvider for GraphHopperRouter {
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

        let url = format!(
            "{BASE_URL}?point={},{}&point={},{}&profile=car&points_encoded=false&key={}",
            start.latitude, start.longitude, end.latitude, end.longitude, self.api_key
        );

        debug!("querying graphhopper");
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

        let payload: schema::RouteResponse = response
            .json()
            .map_err(|e| RiskcastError::provider(PROVIDER_NAME, format!("invalid payload: {e}")))?;

        let path = payload
            .paths
            .into_iter()
            .next()
            .ok_or_else(|| RiskcastError::provider(PROVIDER_NAME, "no paths in response"))?;

        // GraphHopper reports meters and milliseconds; geometry is
        // GeoJSON-style [lon, lat] pairs.
        let coordinates = path
            .points
            .coordinates
            .into_iter()
            .filter_map(|pair| {
                Coordinate::new(*pair.get(1)?, *pair.first()?).ok()
            })
            .collect();

        Ok(RouteResult {
            distance_km: path.distance / 1000.0,
            duration_min: path.time as f64 / 1000.0 / 60.0,
            path: coordinates,
            provider_used: PROVIDER_NAME.to_string(),
        })
    }
}

/// GraphHopper API response structures
mod schema {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct RouteResponse {
        #[serde(default)]
        pub paths: Vec<PathResponse>,
    }

    #[derive(Debug, Deserialize)]
    pub struct PathResponse {
        /// Distance in meters
        pub distance: f64,
        /// Travel time in milliseconds
        pub time: u64,
        /// Route geometry, [lon, lat] pairs
        pub points: Points,
    }

    #[derive(Debug, Deserialize)]
    pub struct Points {
        #[serde(default)]
        pub coordinates: Vec<Vec<f64>>,
    }
}
