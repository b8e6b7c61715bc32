use clap::{Parser, Subcommand, ValueHint};
use sld_core::units::DEFAULT_GRID_SIZE;
use sld_viz::{AlignDirection, DistributeDirection};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sld",
    author,
    version,
    about = "Single-line diagram routing, validation and layout",
    long_about = None
)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive and route every connection of a diagram
    Route {
        /// Path to the symbol snapshot (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        diagram: PathBuf,
        /// Grid spacing the paths snap to
        #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
        grid: f64,
        /// Write the connections to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Run the topology and geometry rules; exits with status 1 when the diagram is invalid
    Validate {
        /// Path to the symbol snapshot (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        diagram: PathBuf,
        /// Validator configuration (TOML)
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
        /// Override the configured grid spacing
        #[arg(long)]
        grid: Option<f64>,
        /// Symbol id reported as floating by an external analysis (repeatable)
        #[arg(long = "floating")]
        floating: Vec<String>,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Align symbols to the one with the smallest id
    Align {
        #[arg(value_hint = ValueHint::FilePath)]
        diagram: PathBuf,
        /// left, right, top, bottom, center-horizontal or center-vertical
        #[arg(long)]
        direction: AlignDirection,
        /// Restrict to these symbol ids (comma separated); all symbols by default
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
    },
    /// Space symbols evenly between the outermost two
    Distribute {
        #[arg(value_hint = ValueHint::FilePath)]
        diagram: PathBuf,
        /// horizontal or vertical
        #[arg(long)]
        direction: DistributeDirection,
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
    },
    /// Snap symbol positions to the grid
    Snap {
        #[arg(value_hint = ValueHint::FilePath)]
        diagram: PathBuf,
        #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
        grid: f64,
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_align() {
        let cli = Cli::try_parse_from([
            "sld",
            "align",
            "d.json",
            "--direction",
            "center-vertical",
            "--ids",
            "a,b",
        ])
        .unwrap();
        match cli.command {
            Commands::Align { direction, ids, .. } => {
                assert_eq!(direction, AlignDirection::CenterVertical);
                assert_eq!(ids, vec!["a", "b"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_validate_defaults() {
        let cli = Cli::try_parse_from(["sld", "validate", "d.json", "--floating", "x"]).unwrap();
        assert_eq!(cli.log_level, tracing::Level::INFO);
        match cli.command {
            Commands::Validate {
                config,
                grid,
                floating,
                json,
                ..
            } => {
                assert!(config.is_none());
                assert!(grid.is_none());
                assert_eq!(floating, vec!["x"]);
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_only_diagram_subcommands() {
        let names: Vec<String> = Cli::command()
            .get_subcommands()
            .map(|c| c.get_name().to_string())
            .collect();
        assert_eq!(names, ["route", "validate", "align", "distribute", "snap"]);
        assert!(Cli::try_parse_from(["sld", "graph", "stats", "d.json"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_direction() {
        let parsed =
            Cli::try_parse_from(["sld", "distribute", "d.json", "--direction", "diagonal"]);
        assert!(parsed.is_err());
    }
}
