//! Multi-provider route resolution with ordered fallback.
//!
//! Same discipline as geocoding: an ordered strategy list of routing
//! providers, each normalizing its native schema (meters, milliseconds,
//! lon-lat geometry) into [`RouteResult`]. The resolver returns the first
//! success in the fixed priority order; it never races providers, and on
//! total failure it returns `NoRouteFound` rather than fabricating a
//! straight-line estimate.

mod graphhopper;
mod openroute;
mod osrm;

pub use graphhopper::GraphHopperRouter;
pub use openroute::OpenRouteRouter;
pub use osrm::OsrmRouter;

use crate::config::ProvidersConfig;
use crate::error::RiskcastError;
use crate::models::{Coordinate, RouteResult};
use haversine::{distance, Location as HaversineLocation, Units};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// A single routing strategy in the fallback chain
pub trait RouteProvider: Send + Sync {
    /// Stable provider name recorded in `RouteResult::provider_used`
    fn name(&self) -> &'static str;

    /// Calculate a driving route between two coordinates
    fn route(&self, start: Coordinate, end: Coordinate) -> Result<RouteResult, RiskcastError>;
}

/// Great-circle distance between two coordinates in kilometers
#[must_use]
pub fn great_circle_km(from: Coordinate, to: Coordinate) -> f64 {
    let from = HaversineLocation {
        latitude: from.latitude,
        longitude: from.longitude,
    };
    let to = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    distance(from, to, Units::Kilometers)
}

/// Ordered-fallback resolver over the configured routing providers
pub struct RouteResolver {
    providers: Vec<Box<dyn RouteProvider>>,
}

impl RouteResolver {
    /// Build a resolver from an explicit provider list (highest priority first)
    #[must_use]
    pub fn new(providers: Vec<Box<dyn RouteProvider>>) -> Self {
        Self { providers }
    }

    /// Build the default chain from configuration: GraphHopper, then
    /// OpenRouteService, then the keyless OSRM demo server. Keyed
    /// providers are skipped without credentials, so the chain is never
    /// empty by default.
    pub fn from_config(config: &ProvidersConfig) -> Result<Self, RiskcastError> {
        let timeout = Duration::from_secs(u64::from(config.timeout_seconds));
        let budget = config.requests_per_minute;
        let mut providers: Vec<Box<dyn RouteProvider>> = Vec::new();

        if let Some(key) = &config.graphhopper_api_key {
            providers.push(Box::new(GraphHopperRouter::new(key.clone(), timeout, budget)?));
        }
        if let Some(key) = &config.openroute_api_key {
            providers.push(Box::new(OpenRouteRouter::new(key.clone(), timeout, budget)?));
        }
        providers.push(Box::new(OsrmRouter::new(timeout, budget)?));

        Ok(Self { providers })
    }

    /// Names of the configured providers, in priority order
    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Resolve the best route between two coordinates.
    ///
    /// Deterministic: the first provider to return a sane route wins.
    /// A reported distance meaningfully below the great-circle distance
    /// is a malformed payload and counts as that provider's failure.
    #[instrument(skip(self))]
    pub fn optimal_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RouteResult, RiskcastError> {
        let floor_km = great_circle_km(start, end) * 0.9;

        for provider in &self.providers {
            match provider.route(start, end) {
                Ok(route) => {
                    if route.distance_km + 0.05 < floor_km {
                        warn!(
                            provider = provider.name(),
                            distance_km = route.distance_km,
                            floor_km,
                            "route shorter than great-circle distance, discarding"
                        );
                        continue;
                    }
                    debug!(
                        provider = provider.name(),
                        distance_km = route.distance_km,
                        duration_min = route.duration_min,
                        "route resolved"
                    );
                    return Ok(route);
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "routing provider failed, trying next"
                    );
                }
            }
        }

        Err(RiskcastError::NoRouteFound {
            start: (start.latitude, start.longitude),
            end: (end.latitude, end.longitude),
        })
    }
}
