//! Metro journey planner CLI.

use std::path::PathBuf;

use anyhow::Context;
use askama::Template;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use metro_planner::dataset::Dataset;
use metro_planner::domain::ClockTime;
use metro_planner::planner::{
    BoardRequest, FrequencySchedule, JourneyRequest, Planner, PlannerConfig,
};
use metro_planner::report::{BoardTemplate, ItineraryTemplate, LinesTemplate};

/// Metro journey planner
#[derive(Parser)]
#[command(name = "metro-planner")]
#[command(version, about = "Plan metro journeys and list upcoming trains", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Network dataset file
    #[arg(long, default_value = "metro_data.txt", env = "METRO_DATA")]
    data: PathBuf,

    /// JSON file overriding planner settings
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan the fastest journey between two stations
    ///
    /// Station names may be abbreviated to any unambiguous prefix.
    /// Example: metro-planner --data data/metro_data.txt plan Majestic Indiranagar --at 09:18
    Plan {
        /// Station to start from
        from: String,

        /// Station to travel to
        to: String,

        /// Time you are ready to travel (HH:MM)
        #[arg(long, value_parser = ClockTime::parse_hhmm)]
        at: ClockTime,
    },

    /// List the next trains at a station in both directions
    Board {
        /// Line name (approximate matches are accepted)
        line: String,

        /// Station on that line
        station: String,

        /// Current time (HH:MM)
        #[arg(long, value_parser = ClockTime::parse_hhmm)]
        at: ClockTime,
    },

    /// List the loaded lines
    Lines,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<PlannerConfig> {
    match path {
        Some(path) => PlannerConfig::from_json_file(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(PlannerConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter_from_verbosity(cli.verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(cli.config.as_ref())?;
    let dataset = Dataset::load(&cli.data)?;
    info!(lines = dataset.lines().len(), "network loaded");

    let output = match cli.command {
        Commands::Plan { from, to, at } => {
            let schedule = FrequencySchedule::from_config(&config);
            let planner = Planner::new(&dataset, &schedule, &config);
            let itinerary = planner.plan(&JourneyRequest::new(from, to, at))?;
            ItineraryTemplate::from_itinerary(&itinerary, &config.currency).render()?
        },

        Commands::Board { line, station, at } => {
            let schedule = FrequencySchedule::from_config(&config);
            let planner = Planner::new(&dataset, &schedule, &config);
            let board = planner.board(&BoardRequest::new(line, station, at))?;
            BoardTemplate::from_board(&board).render()?
        },

        Commands::Lines => LinesTemplate::from_dataset(&dataset).render()?,
    };

    print!("{output}");
    Ok(())
}
