//! marsdem CLI - query MOLA Mars elevation data.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use marsdem::logging::{init_logging, LoggingConfig};
use marsdem::DEFAULT_RESOLUTION;

use commands::chunk::Region;
use error::CliError;

#[derive(Debug, Parser)]
#[command(
    name = "marsdem",
    version = marsdem::VERSION,
    about = "Mixed-resolution Mars elevation queries"
)]
struct Cli {
    /// Data directory holding meg512/ and meg128/ (overrides the config file)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Configuration file (default: <config dir>/marsdem/config.ini)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the elevation at a point
    #[command(allow_negative_numbers = true)]
    Point {
        /// Latitude in degrees
        lat: f64,
        /// Longitude in degrees, any range
        lon: f64,
        /// Probe nearby points when the exact point has no data
        #[arg(long)]
        near: bool,
    },

    /// Render a region to a resampled elevation grid
    #[command(allow_negative_numbers = true)]
    Chunk {
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
        /// Output width in cells
        #[arg(long, short, default_value_t = DEFAULT_RESOLUTION)]
        resolution: u32,
    },

    /// List loaded tiles
    Tiles {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show which tile covers a point
    #[command(allow_negative_numbers = true)]
    Coverage {
        lat: f64,
        lon: f64,
    },
}

fn log_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "marsdem=warn",
        1 => "marsdem=debug",
        _ => "marsdem=trace",
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut logging = LoggingConfig::default().with_directive(log_directive(cli.verbose));
    if let Some(path) = &cli.log_file {
        logging = logging.with_log_file(path);
    }
    let _guard = init_logging(&logging)?;

    let store = commands::common::open_store(cli.config.as_deref(), cli.data_dir.as_deref())?;

    let result = match cli.command {
        Commands::Point { lat, lon, near } => commands::point::run(&store, lat, lon, near),
        Commands::Chunk {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
            resolution,
        } => commands::chunk::run(
            &store,
            Region {
                min_lat,
                max_lat,
                min_lon,
                max_lon,
            },
            resolution,
        ),
        Commands::Tiles { json } => commands::tiles::run(&store, json),
        Commands::Coverage { lat, lon } => commands::coverage::run(&store, lat, lon),
    };

    store.close()?;
    result
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}
