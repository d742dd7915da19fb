//! cities-list - List catalog cities, nearest first

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use libcities::app::{CitiesState, StateStore};
use libcities::catalog::http::HttpCatalog;
use libcities::geo::Bounds;
use libcities::listing::{build_listing, CityRow};
use libcities::location::{
    permission_channel, resolve_location, FixedLocation, PermissionRationale, PermissionStatus,
};
use libcities::{CitiesError, City, Config, GeoPoint};
use serde_json::json;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "cities-list")]
#[command(version, about = "List catalog cities, nearest first")]
#[command(long_about = r#"List the cities served by the catalog backend.

With a position (--lat/--lon, or defaults.location in the config file) the
list is sorted by distance and each city shows how far away it is. Without
one the server order is kept and raw coordinates are shown.

EXAMPLES:
    cities-list
    cities-list --lat 59.3293 --lon 18.0686
    cities-list --show Stockholm
    cities-list --format json | jq '.[0].name'

EXIT CODES:
    0 - Success
    1 - Catalog unavailable or configuration error
    2 - Malformed city boundary
    3 - Invalid input
"#)]
struct Cli {
    /// Your latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Your longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Print the boundary polygon of one city instead of the list
    #[arg(short, long, value_name = "NAME")]
    show: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Config file (defaults to $CITIES_CONFIG or ~/.config/cities/config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    libcities::logging::init_default(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<CitiesError>()
            .map(CitiesError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let position = requested_location(cli.lat, cli.lon)?;

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::load_or_default()?,
    };
    let position = position.or(config.defaults.location);
    debug!(?position, base_url = %config.backend.base_url, "Starting");

    let mut store = StateStore::new();
    let (reporter, statuses) = permission_channel();
    store.attach_permissions(statuses);
    store.fetch_catalog(HttpCatalog::new(&config.backend)?);

    // A position on hand stands in for a granted location permission
    reporter.report(match position {
        Some(_) => PermissionStatus::Granted,
        None => PermissionStatus::Revoked {
            rationale: PermissionRationale::Optional,
        },
    });

    let state = store
        .wait_for(|s| !s.is_loading())
        .await
        .ok_or_else(|| CitiesError::Unavailable("state store stopped".to_string()))?;
    store.shutdown().await;

    let cities = match state.cities {
        CitiesState::Success { cities } => cities,
        CitiesState::Failed { message } => return Err(CitiesError::Unavailable(message).into()),
        CitiesState::Loading => {
            return Err(CitiesError::Unavailable("catalog did not load".to_string()).into())
        }
    };

    let user_location = match position {
        Some(point) => resolve_location(&state.gps, &mut FixedLocation::new(point)).await,
        None => None,
    };

    match &cli.show {
        Some(name) => show_city(&cities, name, &cli.format),
        None => {
            print_listing(&build_listing(&cities, user_location), user_location, &cli.format)
        }
    }
}

/// Both coordinates or neither, each within range
fn requested_location(lat: Option<f64>, lon: Option<f64>) -> libcities::Result<Option<GeoPoint>> {
    match (lat, lon) {
        (None, None) => Ok(None),
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(CitiesError::InvalidInput(format!(
                    "latitude {} is outside -90..90",
                    lat
                )));
            }
            if !(-180.0..=180.0).contains(&lon) {
                return Err(CitiesError::InvalidInput(format!(
                    "longitude {} is outside -180..180",
                    lon
                )));
            }
            Ok(Some(GeoPoint::new(lat, lon)))
        }
        _ => Err(CitiesError::InvalidInput(
            "--lat and --lon must be given together".to_string(),
        )),
    }
}

fn print_listing(rows: &[CityRow], user_location: Option<GeoPoint>, format: &str) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    match user_location {
        Some(here) => println!("My location - lat: {} lon: {}", here.latitude, here.longitude),
        None => println!("Location unavailable, showing coordinates"),
    }
    for row in rows {
        println!("{}\t{}", row.city.name, row.label);
    }
    Ok(())
}

fn show_city(cities: &[City], name: &str, format: &str) -> Result<()> {
    let city = cities
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| CitiesError::InvalidInput(format!("no city named '{}'", name)))?;

    let boundary = city.boundary().map_err(CitiesError::from)?;
    let bounds = Bounds::of(&boundary);

    if format == "json" {
        let value = json!({
            "name": city.name,
            "lat": city.latitude,
            "lon": city.longitude,
            "r": city.boundary_radius,
            "boundary": boundary,
            "bounds": bounds.map(|b| json!({
                "south_west": b.south_west,
                "north_east": b.north_east,
            })),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{} ({}, {}) r={}m", city.name, city.latitude, city.longitude, city.boundary_radius);
    if let Some(b) = bounds {
        println!(
            "bounds: {},{} .. {},{}",
            b.south_west.latitude, b.south_west.longitude, b.north_east.latitude, b.north_east.longitude
        );
    }
    for point in &boundary {
        println!("{} {}", point.latitude, point.longitude);
    }
    Ok(())
}
