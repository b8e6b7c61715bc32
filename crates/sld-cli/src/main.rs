use std::process::ExitCode;

use clap::Parser;
use sld_cli::cli::{Cli, Commands};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

mod commands;

use crate::commands::{layout, route, validate};

/// Exit status for a diagram that failed validation.
const EXIT_INVALID: u8 = 1;
/// Exit status for I/O, parse and argument errors.
const EXIT_ERROR: u8 = 2;

fn run(cli: &Cli) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Route { diagram, grid, out } => {
            route::handle(diagram, *grid, out.as_deref())?;
        }
        Commands::Validate {
            diagram,
            config,
            grid,
            floating,
            json,
        } => {
            return validate::handle(diagram, config.as_deref(), *grid, floating, *json);
        }
        Commands::Align {
            diagram,
            direction,
            ids,
        } => layout::align(diagram, *direction, ids)?,
        Commands::Distribute {
            diagram,
            direction,
            ids,
        } => layout::distribute(diagram, *direction, ids)?,
        Commands::Snap { diagram, grid, ids } => layout::snap(diagram, *grid, ids)?,
    }
    Ok(true)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries JSON payloads, so logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: could not install logger: {err}");
    }

    info!("sld {}", env!("CARGO_PKG_VERSION"));

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_INVALID),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
