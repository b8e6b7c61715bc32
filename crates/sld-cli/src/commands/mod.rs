use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use sld_core::{Diagram, Symbol};

pub mod layout;
pub mod route;
pub mod validate;

/// Load a snapshot, keeping only `ids` when any are given.
pub fn load_symbols(path: &Path, ids: &[String]) -> Result<Vec<Symbol>> {
    let diagram = Diagram::load(path)
        .with_context(|| format!("failed to read diagram {}", path.display()))?;
    let symbols = diagram.select(ids);
    tracing::debug!(
        total = diagram.symbols.len(),
        selected = symbols.len(),
        "loaded {}",
        path.display()
    );
    Ok(symbols)
}

/// Print `payload`, or write it to `out` and say where it went.
pub fn emit(payload: &str, out: Option<&Path>, what: &str) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, payload)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("{what} written to {}", path.display());
        }
        None => println!("{payload}"),
    }
    Ok(())
}
