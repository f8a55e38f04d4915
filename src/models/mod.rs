//! Data models for the riskcast application
//!
//! This module contains the core domain models organized by concern:
//! - Location: coordinates, directory records and resolution results
//! - Weather: current conditions snapshot
//! - Risk: prediction result and category thresholds
//! - Route: normalized provider route output

pub mod location;
pub mod risk;
pub mod route;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{CityRecord, Confidence, Coordinate, LocationSource, ResolvedLocation};
pub use risk::{RiskCategory, RiskResult, RiskThresholds};
pub use route::RouteResult;
pub use weather::WeatherSnapshot;
