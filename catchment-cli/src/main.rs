//! Entry point for the `catchment` binary.
#![forbid(unsafe_code)]

use catchment_cli::CliError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

fn main() {
    init_logging();
    match catchment_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("catchment: {err}");
            std::process::exit(1);
        }
    }
}

/// Install a `RUST_LOG`-driven subscriber that also forwards `log` records.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
