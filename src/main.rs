//! p4flow - Perforce changelist workflows from the command line
//!
//! Binary entry point: install error reporting, wire up logging, run the
//! CLI.

use tracing_subscriber::EnvFilter;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("p4flow=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    p4flow::cli::run()
}
