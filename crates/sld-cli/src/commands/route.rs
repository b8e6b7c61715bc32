use std::path::Path;

use anyhow::Result;
use sld_core::GridSize;
use sld_viz::{route_connections, RouterConfig};
use tracing::info;

use super::{emit, load_symbols};

pub fn handle(diagram: &Path, grid: f64, out: Option<&Path>) -> Result<()> {
    let config = RouterConfig {
        grid_size: GridSize::new(grid)?,
    };
    let symbols = load_symbols(diagram, &[])?;
    let connections = route_connections(&symbols, &config);
    info!(
        "Routed {} connection(s) for {} symbol(s) in {}",
        connections.len(),
        symbols.len(),
        diagram.display()
    );
    let payload = serde_json::to_string_pretty(&connections)?;
    emit(&payload, out, "Connections")
}
