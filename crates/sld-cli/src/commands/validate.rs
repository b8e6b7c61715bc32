use std::path::Path;

use anyhow::{Context, Result};
use sld_core::GridSize;
use sld_validate::{validate, ValidatorConfig};
use tracing::info;

use super::load_symbols;

/// Validate a snapshot and print the report. Returns the save gate.
pub fn handle(
    diagram: &Path,
    config_path: Option<&Path>,
    grid: Option<f64>,
    floating: &[String],
    json: bool,
) -> Result<bool> {
    let mut config = match config_path {
        Some(path) => ValidatorConfig::load_from(path)
            .with_context(|| format!("failed to load validator config {}", path.display()))?,
        None => ValidatorConfig::default(),
    };
    if let Some(grid) = grid {
        config.grid_size = GridSize::new(grid)?;
    }
    config.floating_symbol_ids.extend(floating.iter().cloned());

    let symbols = load_symbols(diagram, &[])?;
    let result = validate(&symbols, &config);
    info!("Validated {}: {}", diagram.display(), result.summary());

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{result}");
    }
    Ok(result.valid)
}
