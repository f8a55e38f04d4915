use anyhow::Context;
use chrono::Utc;
use riskcast::config::RiskcastConfig;
use riskcast::directory::CityDirectory;
use riskcast::geocode::GeocodingResolver;
use riskcast::location_service::LocationService;
use riskcast::models::ResolvedLocation;
use riskcast::predictor::RiskPredictor;
use riskcast::routing::RouteResolver;
use riskcast::weather::WeatherClient;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = RiskcastConfig::load().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: riskcast <place> [destination]");
        eprintln!("  <place> can be a city name or raw coordinates like '6.52, 3.38'");
        std::process::exit(2);
    }

    let timeout = Duration::from_secs(u64::from(config.providers.timeout_seconds));
    let locations = LocationService::new(
        CityDirectory::bundled().context("Failed to load bundled city directory")?,
        GeocodingResolver::from_config(&config.providers)
            .context("Failed to build geocoding providers")?,
    );
    let weather = WeatherClient::open_meteo(&config.weather, timeout)
        .context("Failed to build weather client")?;
    let predictor = RiskPredictor::from_artifact(&config.model.path, config.model.thresholds)
        .with_context(|| format!("Failed to load risk model from {}", config.model.path))?;

    let origin = resolve_or_exit(&locations, &args[0]);
    info!(label = %origin.label, source = %origin.source, "origin resolved");

    let conditions = weather
        .current_weather(origin.latitude, origin.longitude)
        .context("Failed to fetch current weather")?;
    println!(
        "Conditions at {}: {}, {}, wind {:.1} m/s, precip {:.1} mm",
        origin.label,
        conditions.format_temperature(),
        conditions.condition_description(),
        conditions.wind_speed,
        conditions.precipitation,
    );

    let risk = predictor.predict(&origin, &conditions, Utc::now());
    println!(
        "Emergency risk: {} ({:.1}% probability)",
        risk.category,
        risk.probability * 100.0
    );

    if let Some(destination_text) = args.get(1) {
        let destination = resolve_or_exit(&locations, destination_text);
        let router = RouteResolver::from_config(&config.providers)
            .context("Failed to build routing providers")?;
        let route = router
            .optimal_route(origin.coordinate(), destination.coordinate())
            .context("Failed to calculate a response route")?;
        println!(
            "Response route to {}: {}",
            destination.label,
            route.summary()
        );
    }

    Ok(())
}

fn resolve_or_exit(locations: &LocationService, text: &str) -> ResolvedLocation {
    match locations.resolve_place(text, None) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}
