//! Multi-provider geocoding with ordered fallback.
//!
//! Providers form an ordered strategy list: each one turns a free-text
//! place description into a coordinate candidate or fails. The resolver
//! walks the list in fixed priority order and short-circuits on the first
//! well-formed result. A single provider's failure (timeout, quota,
//! malformed payload, exhausted rate budget) is logged and absorbed; only
//! exhausting the whole chain surfaces to the caller, as `NotFound`.

mod google;
mod nominatim;
mod opencage;

pub use google::GoogleGeocoder;
pub use nominatim::NominatimGeocoder;
pub use opencage::OpenCageGeocoder;

use crate::config::ProvidersConfig;
use crate::error::RiskcastError;
use crate::models::{Confidence, LocationSource, ResolvedLocation};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// A raw candidate from a single provider, before validation
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Provider-formatted place label
    pub label: String,
}

/// A single geocoding strategy in the fallback chain
pub trait GeocodeProvider: Send + Sync {
    /// Stable provider name used in `source: provider:<name>` tags
    fn name(&self) -> &'static str;

    /// Resolve a query to the provider's top-ranked candidate.
    /// "No match" is a provider error like any other; the resolver
    /// falls through either way.
    fn geocode(
        &self,
        query: &str,
        country_hint: Option<&str>,
    ) -> Result<GeocodeCandidate, RiskcastError>;
}

/// Ordered-fallback resolver over the configured geocoding providers
pub struct GeocodingResolver {
    providers: Vec<Box<dyn GeocodeProvider>>,
}

impl GeocodingResolver {
    /// Build a resolver from an explicit provider list (highest priority first)
    #[must_use]
    pub fn new(providers: Vec<Box<dyn GeocodeProvider>>) -> Self {
        Self { providers }
    }

    /// Build the default chain from configuration: Google, then OpenCage,
    /// then Nominatim. Providers without credentials are skipped entirely.
    pub fn from_config(config: &ProvidersConfig) -> Result<Self, RiskcastError> {
        let timeout = Duration::from_secs(u64::from(config.timeout_seconds));
        let budget = config.requests_per_minute;
        let mut providers: Vec<Box<dyn GeocodeProvider>> = Vec::new();

        if let Some(key) = &config.google_maps_api_key {
            providers.push(Box::new(GoogleGeocoder::new(key.clone(), timeout, budget)?));
        }
        if let Some(key) = &config.opencage_api_key {
            providers.push(Box::new(OpenCageGeocoder::new(key.clone(), timeout, budget)?));
        }
        if config.nominatim_enabled {
            providers.push(Box::new(NominatimGeocoder::new(timeout, budget)?));
        }

        if providers.is_empty() {
            warn!("No geocoding providers configured; only directory and manual entry will work");
        }

        Ok(Self { providers })
    }

    /// Names of the configured providers, in priority order
    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Resolve a free-text place description to a validated location.
    ///
    /// Empty or whitespace queries fail immediately without touching any
    /// provider. Ambiguity is not handled here: each provider contributes
    /// its top-ranked candidate only.
    #[instrument(skip(self))]
    pub fn resolve(
        &self,
        query: &str,
        country_hint: Option<&str>,
    ) -> Result<ResolvedLocation, RiskcastError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RiskcastError::not_found(query));
        }

        for provider in &self.providers {
            match provider.geocode(query, country_hint) {
                Ok(candidate) => {
                    match ResolvedLocation::new(
                        candidate.latitude,
                        candidate.longitude,
                        candidate.label,
                        LocationSource::Provider(provider.name().to_string()),
                        Confidence::Approximate,
                    ) {
                        Ok(resolved) => {
                            debug!(
                                provider = provider.name(),
                                lat = resolved.latitude,
                                lon = resolved.longitude,
                                "geocoding succeeded"
                            );
                            return Ok(resolved);
                        }
                        Err(e) => {
                            // Out-of-range coordinates count as a malformed
                            // response from this provider.
                            warn!(
                                provider = provider.name(),
                                error = %e,
                                "provider returned invalid coordinates, trying next"
                            );
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "geocoding provider failed, trying next"
                    );
                }
            }
        }

        Err(RiskcastError::not_found(query))
    }
}
