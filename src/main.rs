//! whscmd - Main entry point

use std::io::IsTerminal;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use sentinel_cli::{Cli, CliApp, report_error};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli);

    let exit_code = match CliApp::new(cli) {
        Ok(app) => app.run().await?,
        Err(err) => report_error(&err),
    };

    std::process::exit(exit_code);
}

/// Initialize tracing; RUST_LOG takes precedence over --verbosity
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.verbosity.directive()));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
