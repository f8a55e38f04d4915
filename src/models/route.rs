//! Route result model

use crate::models::Coordinate;
use serde::{Deserialize, Serialize};

/// A normalized route between two coordinates. Derived per request.
///
/// Every provider's native schema (meters, milliseconds, lon-lat
/// geometry) is converted into this shape before it leaves the resolver.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RouteResult {
    /// Road distance in kilometers
    pub distance_km: f64,
    /// Travel duration in minutes
    pub duration_min: f64,
    /// Ordered path from start to end
    pub path: Vec<Coordinate>,
    /// Name of the provider that produced this route
    pub provider_used: String,
}

impl RouteResult {
    /// Format a one-line summary of this route
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{:.2} km, {:.1} min via {}",
            self.distance_km, self.duration_min, self.provider_used
        )
    }
}
