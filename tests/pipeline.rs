//! End-to-end pipeline tests with in-memory providers.
//!
//! Exercises the full resolve -> weather -> predict -> route flow the
//! binary wires together, substituting fake providers for the network.

use chrono::{TimeZone, Utc};
use riskcast::config::WeatherConfig;
use riskcast::directory::CityDirectory;
use riskcast::error::RiskcastError;
use riskcast::geocode::{GeocodeCandidate, GeocodeProvider, GeocodingResolver};
use riskcast::location_service::LocationService;
use riskcast::models::{
    Confidence, Coordinate, LocationSource, RiskThresholds, RouteResult, WeatherSnapshot,
};
use riskcast::predictor::RiskPredictor;
use riskcast::routing::{great_circle_km, RouteProvider, RouteResolver};
use riskcast::weather::{WeatherClient, WeatherProvider};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const MODEL_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/models/risk_model.json");

struct StaticGeocoder {
    calls: Arc<AtomicUsize>,
}

impl GeocodeProvider for StaticGeocoder {
    fn name(&self) -> &'static str {
        "static"
    }

    fn geocode(
        &self,
        query: &str,
        _country_hint: Option<&str>,
    ) -> Result<GeocodeCandidate, RiskcastError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if query == "Gornau" {
            Ok(GeocodeCandidate {
                latitude: 50.75,
                longitude: 13.05,
                label: "Gornau, Germany".to_string(),
            })
        } else {
            Err(RiskcastError::provider("static", "no results"))
        }
    }
}

struct StaticWeather {
    calls: Arc<AtomicUsize>,
}

impl WeatherProvider for StaticWeather {
    fn name(&self) -> &'static str {
        "static"
    }

    fn current(&self, _coordinate: Coordinate) -> Result<WeatherSnapshot, RiskcastError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(WeatherSnapshot {
            temperature: 31.0,
            humidity: 78.0,
            wind_speed: 9.5,
            precipitation: 12.0,
            pressure: 1002.0,
            condition_code: 95,
            observed_at: Utc::now(),
        })
    }
}

struct GreatCircleRouter;

impl RouteProvider for GreatCircleRouter {
    fn name(&self) -> &'static str {
        "fake-roads"
    }

    fn route(&self, start: Coordinate, end: Coordinate) -> Result<RouteResult, RiskcastError> {
        let distance_km = great_circle_km(start, end) * 1.25;
        Ok(RouteResult {
            distance_km,
            duration_min: distance_km / 50.0 * 60.0,
            path: vec![start, end],
            provider_used: self.name().to_string(),
        })
    }
}

fn pipeline() -> (LocationService, Arc<AtomicUsize>, WeatherClient, Arc<AtomicUsize>) {
    let geocode_calls = Arc::new(AtomicUsize::new(0));
    let weather_calls = Arc::new(AtomicUsize::new(0));
    let locations = LocationService::new(
        CityDirectory::bundled().unwrap(),
        GeocodingResolver::new(vec![Box::new(StaticGeocoder {
            calls: Arc::clone(&geocode_calls),
        })]),
    );
    let weather = WeatherClient::new(
        Box::new(StaticWeather {
            calls: Arc::clone(&weather_calls),
        }),
        &WeatherConfig::default(),
    );
    (locations, geocode_calls, weather, weather_calls)
}

/// Directory city -> weather -> prediction, no geocoder involved
#[test]
fn test_predict_for_directory_city() {
    let (locations, geocode_calls, weather, _) = pipeline();
    let predictor =
        RiskPredictor::from_artifact(Path::new(MODEL_PATH), RiskThresholds::default()).unwrap();

    let origin = locations.resolve_place("Lagos", Some("Nigeria")).unwrap();
    assert_eq!(origin.source, LocationSource::Directory);
    assert_eq!(geocode_calls.load(Ordering::SeqCst), 0);

    let conditions = weather
        .current_weather(origin.latitude, origin.longitude)
        .unwrap();
    let at = Utc.with_ymd_and_hms(2026, 8, 7, 17, 30, 0).unwrap();
    let risk = predictor.predict(&origin, &conditions, at);

    assert!((0.0..=1.0).contains(&risk.probability));
    // Same inputs give the same answer
    let again = predictor.predict(&origin, &conditions, at);
    assert_eq!(risk.probability, again.probability);
    assert_eq!(risk.category, again.category);
}

/// Unknown place falls through the directory to the geocoding chain
#[test]
fn test_predict_for_geocoded_place() {
    let (locations, geocode_calls, weather, _) = pipeline();
    let predictor =
        RiskPredictor::from_artifact(Path::new(MODEL_PATH), RiskThresholds::default()).unwrap();

    let origin = locations.resolve_place("Gornau", None).unwrap();
    assert_eq!(origin.source.to_string(), "provider:static");
    assert_eq!(origin.confidence, Confidence::Approximate);
    assert_eq!(geocode_calls.load(Ordering::SeqCst), 1);

    let conditions = weather
        .current_weather(origin.latitude, origin.longitude)
        .unwrap();
    let at = Utc.with_ymd_and_hms(2026, 8, 7, 3, 0, 0).unwrap();
    let risk = predictor.predict(&origin, &conditions, at);
    assert!((0.0..=1.0).contains(&risk.probability));
}

/// Repeated predictions for the same place cost one weather fetch
#[test]
fn test_weather_cached_across_predictions() {
    let (locations, _, weather, weather_calls) = pipeline();

    let origin = locations.resolve_place("Nairobi", None).unwrap();
    weather
        .current_weather(origin.latitude, origin.longitude)
        .unwrap();
    weather
        .current_weather(origin.latitude, origin.longitude)
        .unwrap();
    assert_eq!(weather_calls.load(Ordering::SeqCst), 1);
}

/// Route between two resolved directory cities
#[test]
fn test_route_between_resolved_cities() {
    let (locations, _, _, _) = pipeline();
    let router = RouteResolver::new(vec![Box::new(GreatCircleRouter)]);

    let start = locations.resolve_place("Lagos", Some("Nigeria")).unwrap();
    let end = locations.resolve_place("Abuja", Some("Nigeria")).unwrap();

    let route = router
        .optimal_route(start.coordinate(), end.coordinate())
        .unwrap();
    assert_eq!(route.provider_used, "fake-roads");

    let floor = great_circle_km(start.coordinate(), end.coordinate());
    assert!(route.distance_km >= floor * 0.9);
    assert!(route.duration_min > 0.0);
}

/// Exhausted resolution surfaces the coordinate-entry hint
#[test]
fn test_not_found_suggests_manual_entry() {
    let (locations, _, _, _) = pipeline();

    let err = locations.resolve_place("Atlantis", None).unwrap_err();
    assert!(matches!(err, RiskcastError::NotFound { .. }));
    assert!(err.user_message().contains("coordinates"));

    // The hint works: raw coordinates resolve without any provider
    let manual = locations.resolve_place("31.5, -64.5", None).unwrap();
    assert_eq!(manual.source, LocationSource::Manual);
}
