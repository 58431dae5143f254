use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use freightlane_cli::commands::classify::{handle_classify, ClassifyTarget};
use freightlane_cli::commands::ports::handle_ports;
use freightlane_cli::commands::route::{handle_route, RouteCommandArgs};
use freightlane_cli::output::OutputFormat;
use freightlane_lib::{build_planner, PlannerConfig, ProviderSettings};

#[derive(Parser, Debug)]
#[command(author, version, about = "Multimodal freight route planner")]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Nominatim-compatible geocoder base URL (overrides FREIGHTLANE_NOMINATIM_URL).
    #[arg(long, global = true)]
    nominatim_url: Option<String>,

    /// OSRM routing server base URL (overrides FREIGHTLANE_OSRM_URL).
    #[arg(long, global = true)]
    osrm_url: Option<String>,

    /// Directory containing searoute.jar (overrides FREIGHTLANE_SEAROUTE_DIR).
    #[arg(long, global = true)]
    searoute_dir: Option<PathBuf>,

    /// CSV gazetteer of extra places with name,lat,lon columns.
    #[arg(long, global = true)]
    places: Option<PathBuf>,

    /// CSV port catalog with name,country,lat,lon columns replacing the built-in one.
    #[arg(long, global = true)]
    ports: Option<PathBuf>,

    /// Maximum distance in km to a catalog port for a place to count as a port.
    #[arg(long, global = true)]
    port_threshold_km: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a route between two named places.
    Route {
        /// Origin place or port name.
        #[arg(long = "from")]
        from: String,
        /// Destination place or port name.
        #[arg(long = "to")]
        to: String,
        /// Cargo weight in kilograms (informational).
        #[arg(long)]
        cargo_weight_kg: Option<f64>,
    },
    /// List the port catalog.
    Ports,
    /// Classify a place or coordinate as port or inland.
    Classify {
        /// Place name to resolve.
        name: Option<String>,
        /// Latitude in decimal degrees.
        #[arg(long, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,
        /// Longitude in decimal degrees.
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,
    },
}

impl Cli {
    fn provider_settings(&self) -> ProviderSettings {
        let env = ProviderSettings::from_env();
        ProviderSettings {
            nominatim_url: self.nominatim_url.clone().or(env.nominatim_url),
            osrm_url: self.osrm_url.clone().or(env.osrm_url),
            searoute_dir: self.searoute_dir.clone().or(env.searoute_dir),
            places_path: self.places.clone().or(env.places_path),
            ports_path: self.ports.clone().or(env.ports_path),
        }
    }

    fn planner_config(&self) -> PlannerConfig {
        let config = PlannerConfig::from_env();
        match self.port_threshold_km {
            Some(km) => config.with_port_threshold_km(km),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let planner = build_planner(&cli.provider_settings(), cli.planner_config())
        .context("failed to configure route planner")?;

    let output = match cli.command {
        Command::Route {
            from,
            to,
            cargo_weight_kg,
        } => {
            let args = RouteCommandArgs {
                from,
                to,
                cargo_weight_kg,
            };
            handle_route(&planner, &args, cli.format).await?
        }
        Command::Ports => handle_ports(planner.catalog(), cli.format)?,
        Command::Classify { name, lat, lon } => {
            let target = match (name, lat, lon) {
                (Some(name), None, None) => ClassifyTarget::Name(name),
                (None, Some(lat), Some(lon)) => ClassifyTarget::Coordinate { lat, lon },
                _ => bail!("provide either a place name or both --lat and --lon"),
            };
            handle_classify(&planner, target, cli.format).await?
        }
    };

    print!("{output}");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
