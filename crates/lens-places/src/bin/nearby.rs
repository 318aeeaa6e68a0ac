//! lens-nearby: query nearby landmarks, food and events from the command line.
//!
//! Reads API keys from the environment (or a `.env` file) and prints the
//! ranked suggestions as JSON on stdout. Logs go to stderr.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use lens_core::{defaults, Coordinates, Deadline, EphemeralCache};
use lens_places::{
    EventQuery, GooglePlacesClient, NearbyQuery, SuggestionAggregator, TicketmasterClient,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lens-nearby")]
#[command(author, version, about = "Nearby suggestions for landmark-lens")]
#[command(propagate_version = true)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Overall request budget in seconds
    #[arg(long, global = true)]
    deadline_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Location {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lng: f64,

    /// Maximum number of results
    #[arg(long, default_value_t = defaults::SUGGESTION_LIMIT)]
    max: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Tourist attractions, museums and parks
    Landmarks {
        #[command(flatten)]
        location: Location,

        /// Search radius in meters
        #[arg(long, default_value_t = defaults::PLACES_RADIUS_M)]
        radius: u32,
    },

    /// Restaurants, cafes and bakeries
    Food {
        #[command(flatten)]
        location: Location,

        /// Search radius in meters
        #[arg(long, default_value_t = defaults::PLACES_RADIUS_M)]
        radius: u32,
    },

    /// Upcoming events
    Events {
        #[command(flatten)]
        location: Location,

        /// Search radius in kilometers
        #[arg(long, default_value_t = defaults::EVENTS_RADIUS_KM)]
        radius: u32,
    },
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lens_places=info,lens_core=warn".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let aggregator = SuggestionAggregator::new(
        Arc::new(GooglePlacesClient::from_env()?),
        Arc::new(TicketmasterClient::from_env()?),
        EphemeralCache::from_env(),
    )
    .with_call_timeout(defaults::http_timeout_from_env());

    let deadline = cli
        .deadline_secs
        .map(|secs| Deadline::after(Duration::from_secs(secs)))
        .unwrap_or_default();

    let output = match cli.command {
        Commands::Landmarks { location, radius } => {
            let query = nearby_query(&location, radius)?;
            serde_json::to_string_pretty(&aggregator.get_nearby_landmarks(&query, deadline).await)?
        }
        Commands::Food { location, radius } => {
            let query = nearby_query(&location, radius)?;
            serde_json::to_string_pretty(&aggregator.get_nearby_food(&query, deadline).await)?
        }
        Commands::Events { location, radius } => {
            let query = EventQuery::new(coordinates(&location)?)
                .with_radius_km(radius)
                .with_max_results(location.max);
            serde_json::to_string_pretty(&aggregator.get_nearby_events(&query, deadline).await)?
        }
    };

    println!("{}", output);
    Ok(())
}

fn coordinates(location: &Location) -> anyhow::Result<Coordinates> {
    if !(-90.0..=90.0).contains(&location.lat) || !(-180.0..=180.0).contains(&location.lng) {
        anyhow::bail!(
            "coordinates out of range: lat={}, lng={}",
            location.lat,
            location.lng
        );
    }
    Ok(Coordinates::new(location.lat, location.lng))
}

fn nearby_query(location: &Location, radius: u32) -> anyhow::Result<NearbyQuery> {
    Ok(NearbyQuery::new(coordinates(location)?)
        .with_radius(radius)
        .with_max_results(location.max))
}
