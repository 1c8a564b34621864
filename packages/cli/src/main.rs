#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tool for the street traffic engine.
//!
//! Loads the traffic count dataset once (with a spinner), then answers a
//! single query or starts the HTTP server over the loaded engine.
//!
//! Uses `indicatif-log-bridge` (via [`street_traffic_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the load spinner never fight for the terminal.

mod report;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use street_traffic::route::{analyze_route, strip_markup};
use street_traffic::{EngineHandle, RouteStep, config};
use street_traffic_cli_utils::IndicatifProgress;

#[derive(Parser)]
#[command(
    name = "street_traffic_cli",
    about = "Street traffic lookups and route travel-time adjustment"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Traffic count CSV (overrides the config file and `TRAFFIC_DATASET_PATH`)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print statistics about the loaded dataset
    Stats,
    /// Classify the congestion level of one street
    Classify {
        /// Street name (e.g., "Main Street")
        street: String,
    },
    /// Search street names
    Search {
        /// Text the street name must contain
        query: String,
        /// Maximum number of results
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Compute the traffic multiplier for a route. Each argument is one
    /// driving instruction.
    Adjust {
        /// Driving instructions in route order
        #[arg(required = true)]
        instructions: Vec<String>,
        /// Print the streets that contributed to the multiplier
        #[arg(long)]
        details: bool,
        /// Provider duration of the whole route, in seconds
        #[arg(long)]
        duration_secs: Option<u64>,
    },
    /// Start the HTTP API server
    Serve,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = street_traffic_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = config::resolve(cli.config.as_deref())?;
    if let Some(dataset) = cli.dataset {
        config.dataset_path = dataset;
    }

    let progress = IndicatifProgress::records_spinner(
        &multi,
        &format!("Reading {}", config.dataset_path.display()),
    );
    let handle = Arc::new(EngineHandle::load_with_progress(config, progress.as_ref()));

    let engine = handle.snapshot();
    if !engine.is_built() {
        log::warn!(
            "No traffic data loaded from {}; every street is unknown",
            handle.dataset_path().display()
        );
    }

    match cli.command {
        Commands::Serve => {
            drop(engine);
            actix_web::rt::System::new().block_on(street_traffic_server::run_server(handle))?;
        }
        Commands::Stats => println!("{}", report::stats(engine.stats())),
        Commands::Classify { street } => {
            let classification = engine.classify(&street);
            println!("{}", report::classification(&street, &classification));
        }
        Commands::Search { query, limit } => {
            let results = engine.search_streets(&query, limit);
            println!("{}", report::search_results(&results));
        }
        Commands::Adjust {
            instructions,
            details,
            duration_secs,
        } => {
            let steps: Vec<RouteStep> = instructions
                .iter()
                .map(|i| RouteStep::new(strip_markup(i)))
                .collect();
            let output = match duration_secs {
                Some(seconds) => {
                    let analysis = analyze_route(&engine, &steps, Some(seconds), details);
                    report::analysis(&analysis)
                }
                None => report::adjustment(&engine.adjust_route(&steps, details)),
            };
            println!("{output}");
        }
    }

    Ok(())
}
