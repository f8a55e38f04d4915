//! OSRM routing provider, backed by the public demo server. Keyless
//! free tier: always present as the terminal entry of the chain so route
//! resolution works with zero configured credentials.

use super::RouteProvider;
use crate::error::RiskcastError;
use crate::models::{Coordinate, RouteResult};
use crate::ratelimit::RateBudget;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER_NAME: &str = "osrm";
const BASE_URL: &str = "https://router.project-osrm.org/route/v1/driving";

pub struct OsrmRouter {
    client: Client,
    budget: RateBudget,
}

impl OsrmRouter {
    pub fn new(timeout: Duration, requests_per_minute: u32) -> Result<Self, RiskcastError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("riskcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RiskcastError::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            budget: RateBudget::new(requests_per_minute),
        })
    }
}

impl RouteProvider for OsrmRouter {
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

        // OSRM expects lon,lat pairs in the path
        let url = format!(
            "{BASE_URL}/{},{};{},{}?overview=full&geometries=geojson",
            start.longitude, start.latitude, end.longitude, end.latitude
        );

        debug!(url, "querying osrm");
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

        if payload.code != "Ok" {
            return Err(RiskcastError::provider(
                PROVIDER_NAME,
                format!("status {}", payload.code),
            ));
        }

        let route = payload
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| RiskcastError::provider(PROVIDER_NAME, "no routes in response"))?;

        let coordinates = route
            .geometry
            .coordinates
            .into_iter()
            .filter_map(|pair| Coordinate::new(*pair.get(1)?, *pair.first()?).ok())
            .collect();

        // OSRM reports meters and seconds
        Ok(RouteResult {
            distance_km: route.distance / 1000.0,
            duration_min: route.duration / 60.0,
            path: coordinates,
            provider_used: PROVIDER_NAME.to_string(),
        })
    }
}

/// OSRM API response structures
mod schema {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct RouteResponse {
        pub code: String,
        #[serde(default)]
        pub routes: Vec<Route>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Route {
        /// Distance in meters
        pub distance: f64,
        /// Duration in seconds
        pub duration: f64,
        pub geometry: Geometry,
    }

    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        #[serde(default)]
        pub coordinates: Vec<Vec<f64>>,
    }
}
