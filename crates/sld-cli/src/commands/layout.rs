//! Layout transforms. Each prints a `symbol id -> new position` map; ids
//! missing from the map keep their position.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use sld_core::{GridSize, Position};
use sld_viz::{align_symbols, distribute_symbols, snap_symbols, AlignDirection, DistributeDirection};

use super::load_symbols;

fn print_positions(positions: &BTreeMap<String, Position>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(positions)?);
    Ok(())
}

pub fn align(diagram: &Path, direction: AlignDirection, ids: &[String]) -> Result<()> {
    let symbols = load_symbols(diagram, ids)?;
    print_positions(&align_symbols(&symbols, direction))
}

pub fn distribute(diagram: &Path, direction: DistributeDirection, ids: &[String]) -> Result<()> {
    let symbols = load_symbols(diagram, ids)?;
    let positions = distribute_symbols(&symbols, direction);
    if positions.is_empty() && !symbols.is_empty() {
        tracing::warn!("distribute needs at least three symbols, got {}", symbols.len());
    }
    print_positions(&positions)
}

pub fn snap(diagram: &Path, grid: f64, ids: &[String]) -> Result<()> {
    let grid = GridSize::new(grid)?;
    let symbols = load_symbols(diagram, ids)?;
    print_positions(&snap_symbols(&symbols, grid))
}
