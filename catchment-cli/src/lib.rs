//! Command-line interface for mapping retail catchments.
//!
//! The `catchment run` command layers CLI flags, configuration files and
//! `CATCHMENT_*` environment variables into a validated run configuration,
//! wires the Overpass and openrouteservice adapters plus the Leaflet sink,
//! and drives the core pipeline once.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod run;

pub use error::CliError;

use run::{RunArgs, run_catchments};

const ARG_BBOX: &str = "bbox";
const ARG_CHAIN: &str = "chain";
const ARG_COLOUR: &str = "colour";
const ARG_PROFILE: &str = "profile";
const ARG_MINUTES: &str = "minutes";
const ARG_NO_THROTTLE: &str = "no-throttle";
const ARG_BATCH_SIZE: &str = "batch-size";
const ARG_ORS_API_KEY: &str = "ors-api-key";
const ARG_ORS_BASE_URL: &str = "ors-base-url";
const ARG_OVERPASS_URL: &str = "overpass-url";
const ARG_CATEGORY: &str = "category";
const ARG_TILES: &str = "tiles";
const ARG_OUTPUT: &str = "output";
const ENV_BBOX: &str = "CATCHMENT_CMDS_RUN_BBOX";
const ENV_CHAIN: &str = "CATCHMENT_CMDS_RUN_CHAIN";
const ENV_ORS_API_KEY: &str = "CATCHMENT_CMDS_RUN_ORS_API_KEY";

/// Run the CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Run(args) => run_catchments(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "catchment",
    about = "Map the drive-time catchments of retail chain outlets",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch outlets, compute isochrones and write a Leaflet map.
    Run(RunArgs),
}

#[cfg(test)]
mod tests;
