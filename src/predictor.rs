//! Risk prediction.
//!
//! Applies the trained classifier to a feature vector assembled from a
//! resolved location, a weather snapshot and an explicit timestamp.
//! Inference is local and deterministic: no I/O, no randomness, no
//! retries. The model artifact is loaded read-only at startup and its
//! feature schema is asserted against the in-code contract there, so a
//! stale or foreign artifact fails loudly before the first prediction.

use crate::error::RiskcastError;
use crate::models::{ResolvedLocation, RiskResult, RiskThresholds, WeatherSnapshot};
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

/// The feature contract shared with the training pipeline.
///
/// Order and encoding are fixed: the trainer fits against exactly this
/// layout, and any change here requires a retrained artifact. Asserted
/// against the artifact's own feature list at load time.
pub const FEATURE_NAMES: [&str; 12] = [
    "latitude",
    "longitude",
    "hour",
    "day_of_week",
    "month",
    "temperature",
    "humidity",
    "wind_speed",
    "precipitation",
    "pressure",
    "traffic_density",
    "population_density",
];

/// Number of features in the contract
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Metro hubs used by the population-density estimator. Part of the
/// feature contract: the trainer uses the same list.
const METRO_HUBS: [(f64, f64); 8] = [
    (6.5244, 3.3792),    // Lagos
    (30.0444, 31.2357),  // Cairo
    (-1.2864, 36.8172),  // Nairobi
    (-26.2041, 28.0473), // Johannesburg
    (40.7128, -74.0060), // New York
    (51.5074, -0.1278),  // London
    (19.0760, 72.8777),  // Mumbai
    (28.7041, 77.1025),  // Delhi
];

/// Serialized classifier: standard-scaler statistics plus logistic
/// regression weights. The artifact carries its own feature list so a
/// mismatch with [`FEATURE_NAMES`] can be detected instead of silently
/// misassigning weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskModel {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl RiskModel {
    /// Load and validate a model artifact from disk.
    ///
    /// A missing or unreadable artifact is a configuration error; a
    /// well-formed artifact with the wrong feature schema is a schema
    /// mismatch. Neither is ever papered over by padding or truncation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RiskcastError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RiskcastError::config(format!(
                "Cannot read model artifact '{}': {e}",
                path.display()
            ))
        })?;
        let model: RiskModel = serde_json::from_str(&raw).map_err(|e| {
            RiskcastError::config(format!(
                "Invalid model artifact '{}': {e}",
                path.display()
            ))
        })?;
        model.validate()?;
        info!(path = %path.display(), features = model.feature_names.len(), "risk model loaded");
        Ok(model)
    }

    /// Assert the artifact's schema against the in-code feature contract
    pub fn validate(&self) -> Result<(), RiskcastError> {
        if self.feature_names.len() != FEATURE_COUNT
            || self.coefficients.len() != FEATURE_COUNT
            || self.mean.len() != FEATURE_COUNT
            || self.scale.len() != FEATURE_COUNT
        {
            let model = [
                self.feature_names.len(),
                self.coefficients.len(),
                self.mean.len(),
                self.scale.len(),
            ]
            .into_iter()
            .find(|&n| n != FEATURE_COUNT)
            .unwrap_or(FEATURE_COUNT);
            return Err(RiskcastError::SchemaMismatch {
                model,
                contract: FEATURE_COUNT,
            });
        }

        for (i, (model_name, contract_name)) in
            self.feature_names.iter().zip(FEATURE_NAMES).enumerate()
        {
            if model_name != contract_name {
                return Err(RiskcastError::config(format!(
                    "Model feature {i} is '{model_name}' but the contract expects '{contract_name}'; retrain against the current feature layout"
                )));
            }
        }

        if self.scale.iter().any(|&s| s == 0.0) {
            return Err(RiskcastError::config(
                "Model scaler contains a zero scale factor",
            ));
        }

        Ok(())
    }

    /// Scaled logistic regression over a raw feature vector
    fn probability(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let z: f64 = features
            .iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .zip(&self.coefficients)
            .map(|(((x, mean), scale), coef)| coef * (x - mean) / scale)
            .sum::<f64>()
            + self.intercept;
        1.0 / (1.0 + (-z).exp())
    }
}

/// Risk predictor combining the loaded model with category thresholds
pub struct RiskPredictor {
    model: RiskModel,
    thresholds: RiskThresholds,
}

impl RiskPredictor {
    /// Create a predictor from a validated model and threshold policy
    pub fn new(model: RiskModel, thresholds: RiskThresholds) -> Result<Self, RiskcastError> {
        model.validate()?;
        thresholds.validate()?;
        Ok(Self { model, thresholds })
    }

    /// Load the model artifact from disk and build a predictor
    pub fn from_artifact(
        path: impl AsRef<Path>,
        thresholds: RiskThresholds,
    ) -> Result<Self, RiskcastError> {
        Self::new(RiskModel::load(path)?, thresholds)
    }

    /// Predict emergency risk for a location under given weather at a
    /// given time. Deterministic: identical inputs yield identical output.
    #[instrument(skip(self, location, weather), fields(label = %location.label))]
    #[must_use]
    pub fn predict(
        &self,
        location: &ResolvedLocation,
        weather: &WeatherSnapshot,
        at: DateTime<Utc>,
    ) -> RiskResult {
        let features = assemble_features(location, weather, at);
        let probability = self.model.probability(&features).clamp(0.0, 1.0);
        RiskResult {
            probability,
            category: self.thresholds.categorize(probability),
        }
    }
}

/// Assemble the feature vector in contract order
fn assemble_features(
    location: &ResolvedLocation,
    weather: &WeatherSnapshot,
    at: DateTime<Utc>,
) -> [f64; FEATURE_COUNT] {
    [
        location.latitude,
        location.longitude,
        f64::from(at.hour()),
        f64::from(at.weekday().num_days_from_monday()),
        f64::from(at.month()),
        f64::from(weather.temperature),
        f64::from(weather.humidity),
        f64::from(weather.wind_speed),
        f64::from(weather.precipitation),
        f64::from(weather.pressure),
        traffic_density(at),
        population_density(location.latitude, location.longitude),
    ]
}

/// Traffic density score (0-100) from time of day and weekday.
/// Peaks during rush hours, discounted on weekends.
fn traffic_density(at: DateTime<Utc>) -> f64 {
    let base = match at.hour() {
        7 | 8 | 17 | 18 => 80.0,
        6 | 9 | 16 | 19 => 60.0,
        10..=15 => 40.0,
        20..=23 => 30.0,
        _ => 10.0,
    };
    let multiplier = match at.weekday().num_days_from_monday() {
        0..=4 => 1.0,
        5 => 0.7,
        _ => 0.5,
    };
    base * multiplier
}

/// Population density score (0-100) from degree distance to the nearest
/// metro hub. Roughly 0.01 degree per kilometer near the equator.
fn population_density(latitude: f64, longitude: f64) -> f64 {
    let min_distance = METRO_HUBS
        .iter()
        .map(|(hub_lat, hub_lon)| {
            ((latitude - hub_lat).powi(2) + (longitude - hub_lon).powi(2)).sqrt()
        })
        .fold(f64::INFINITY, f64::min);
    (100.0 - min_distance * 1000.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, LocationSource, RiskCategory};
    use chrono::TimeZone;

    pub(crate) fn uniform_model(coefficient: f64, intercept: f64) -> RiskModel {
        RiskModel {
            feature_names: FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect(),
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
            coefficients: vec![coefficient; FEATURE_COUNT],
            intercept,
        }
    }

    fn lagos() -> ResolvedLocation {
        ResolvedLocation::new(
            6.5244,
            3.3792,
            "Lagos, Nigeria".to_string(),
            LocationSource::Directory,
            Confidence::Exact,
        )
        .unwrap()
    }

    fn calm_weather() -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: 27.0,
            humidity: 65.0,
            wind_speed: 3.0,
            precipitation: 0.0,
            pressure: 1012.0,
            condition_code: 1,
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let predictor =
            RiskPredictor::new(uniform_model(0.01, -0.5), RiskThresholds::default()).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap();

        let first = predictor.predict(&lagos(), &calm_weather(), at);
        let second = predictor.predict(&lagos(), &calm_weather(), at);
        assert_eq!(first, second);
    }

    #[test]
    fn test_probability_within_unit_interval() {
        let predictor =
            RiskPredictor::new(uniform_model(5.0, 10.0), RiskThresholds::default()).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap();

        let result = predictor.predict(&lagos(), &calm_weather(), at);
        assert!((0.0..=1.0).contains(&result.probability));
        assert_eq!(result.category, RiskCategory::Critical);
    }

    #[test]
    fn test_extreme_intercepts_map_to_extreme_categories() {
        let at = Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap();

        let low = RiskPredictor::new(uniform_model(0.0, -10.0), RiskThresholds::default()).unwrap();
        assert_eq!(
            low.predict(&lagos(), &calm_weather(), at).category,
            RiskCategory::Low
        );

        let critical =
            RiskPredictor::new(uniform_model(0.0, 10.0), RiskThresholds::default()).unwrap();
        assert_eq!(
            critical.predict(&lagos(), &calm_weather(), at).category,
            RiskCategory::Critical
        );
    }

    #[test]
    fn test_arity_mismatch_rejected() {
        let mut model = uniform_model(0.1, 0.0);
        model.coefficients.pop();
        let err = model.validate().unwrap_err();
        assert!(matches!(
            err,
            RiskcastError::SchemaMismatch {
                model: 11,
                contract: 12
            }
        ));
    }

    #[test]
    fn test_renamed_feature_rejected() {
        let mut model = uniform_model(0.1, 0.0);
        model.feature_names[5] = "temp_celsius".to_string();
        let err = model.validate().unwrap_err();
        assert!(matches!(err, RiskcastError::Config { .. }));
        assert!(err.to_string().contains("temp_celsius"));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let mut model = uniform_model(0.1, 0.0);
        model.scale[3] = 0.0;
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_missing_artifact_is_config_error() {
        let err = RiskModel::load("/nonexistent/risk_model.json").unwrap_err();
        assert!(matches!(err, RiskcastError::Config { .. }));
    }

    #[test]
    fn test_bundled_artifact_matches_contract() {
        let model: RiskModel =
            serde_json::from_str(include_str!("../models/risk_model.json")).unwrap();
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_traffic_density_profile() {
        let rush = Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap(); // Monday
        let night = Utc.with_ymd_and_hms(2024, 6, 3, 3, 0, 0).unwrap();
        let sunday_rush = Utc.with_ymd_and_hms(2024, 6, 9, 8, 0, 0).unwrap();

        assert_eq!(traffic_density(rush), 80.0);
        assert_eq!(traffic_density(night), 10.0);
        assert_eq!(traffic_density(sunday_rush), 40.0);
    }

    #[test]
    fn test_population_density_peaks_at_hub() {
        let at_hub = population_density(6.5244, 3.3792);
        let remote = population_density(-45.0, -120.0);
        assert!(at_hub > 90.0);
        assert_eq!(remote, 0.0);
    }
}
