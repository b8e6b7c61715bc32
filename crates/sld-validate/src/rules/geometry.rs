//! Geometric rules: overlaps, grid alignment and floating symbols.

use std::collections::BTreeSet;

use sld_core::geometry::is_on_grid;
use sld_core::{bounding_box, snap_to_grid, BoundingBox, Symbol, ValidationIssue};

use super::{RuleContext, COLLISION, FLOATING_SYMBOL, GRID_ALIGNMENT};

/// G-01: one warning per overlapping pair. Quadratic in the symbol count.
pub fn collisions(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    let boxes: Vec<(&Symbol, BoundingBox)> = ctx
        .ordered()
        .map(|(_, symbol)| (symbol, bounding_box(symbol)))
        .collect();

    let mut issues = Vec::new();
    for (i, (a, a_box)) in boxes.iter().enumerate() {
        for (b, b_box) in &boxes[i + 1..] {
            if a_box.intersects(b_box) {
                issues.push(
                    ValidationIssue::warning(
                        COLLISION,
                        format!("Symbols '{}' and '{}' overlap", a.id, b.id),
                    )
                    .with_symbols([a.id.as_str(), b.id.as_str()])
                    .with_hint("Move one of the symbols apart"),
                );
            }
        }
    }
    issues
}

/// G-03: symbols whose position is not a grid multiple.
pub fn grid_alignment(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    let grid = ctx.config.grid_size;
    ctx.ordered()
        .filter(|(_, symbol)| !is_on_grid(symbol.position, grid))
        .map(|(_, symbol)| {
            let target = snap_to_grid(symbol.position, grid);
            ValidationIssue::info(
                GRID_ALIGNMENT,
                format!(
                    "Symbol '{}' at {} is off the {} grid; snap to {}",
                    symbol.id, symbol.position, grid, target
                ),
            )
            .with_symbol(&symbol.id)
            .with_hint(format!("Move to {target}"))
        })
        .collect()
}

/// Bus with no incident reference, or non-bus with no resolvable one.
fn is_topology_free(ctx: &RuleContext<'_>, idx: usize, symbol: &Symbol) -> bool {
    if symbol.is_bus() {
        ctx.graph.degree(idx) == 0
    } else {
        symbol
            .referenced_ids()
            .into_iter()
            .all(|element_id| !ctx.exists(element_id))
    }
}

/// G-04: externally reported floating symbols, then symbols with no
/// topology at all that were not already reported.
pub fn floating_symbols(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    let hinted: BTreeSet<&str> = ctx
        .config
        .floating_symbol_ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .collect();

    let mut issues = Vec::new();
    if !hinted.is_empty() {
        issues.push(
            ValidationIssue::warning(
                FLOATING_SYMBOL,
                format!("{} floating symbol(s) reported", hinted.len()),
            )
            .with_symbols(hinted.iter().copied()),
        );
        for id in &hinted {
            issues.push(
                ValidationIssue::warning(FLOATING_SYMBOL, format!("Symbol '{id}' is floating"))
                    .with_symbol(*id)
                    .with_hint("Connect the symbol or remove it"),
            );
        }
    }

    for (idx, symbol) in ctx.ordered() {
        if hinted.contains(symbol.id.as_str()) || !is_topology_free(ctx, idx, symbol) {
            continue;
        }
        issues.push(
            ValidationIssue::warning(
                FLOATING_SYMBOL,
                format!(
                    "Symbol '{}' ({}) is not connected to anything",
                    symbol.id,
                    symbol.kind.label()
                ),
            )
            .with_symbol(&symbol.id)
            .with_hint("Connect the symbol or remove it"),
        );
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatorConfig;
    use sld_core::{GridSize, SymbolKind};

    fn square(id: &str, x: f64, y: f64) -> Symbol {
        Symbol::new(id, SymbolKind::bus(20.0, 20.0)).at(x, y)
    }

    #[test]
    fn test_collisions_one_issue_per_pair() {
        let symbols = vec![
            square("c", 15.0, 0.0),
            square("a", 0.0, 0.0),
            square("b", 20.0, 0.0),
            square("far", 500.0, 500.0),
        ];
        let config = ValidatorConfig::default();
        let ctx = RuleContext::new(&symbols, &config);
        let issues = collisions(&ctx);
        // a-b touch at x=10, a-c and b-c overlap
        let pairs: Vec<Vec<String>> = issues.iter().map(|i| i.symbol_ids.clone()).collect();
        assert_eq!(pairs, vec![vec!["a", "b"], vec!["a", "c"], vec!["b", "c"]]);
    }

    #[test]
    fn test_grid_alignment_reports_target() {
        let symbols = vec![square("on", 40.0, 60.0), square("off", 41.0, 69.0)];
        let config = ValidatorConfig::default();
        let ctx = RuleContext::new(&symbols, &config);
        let issues = grid_alignment(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].symbol_ids, vec!["off"]);
        assert!(issues[0].message.contains("(40, 60)"));
        assert_eq!(issues[0].severity, sld_core::Severity::Info);

        let config = ValidatorConfig::default().with_grid_size(GridSize::new(1.0).unwrap());
        let ctx = RuleContext::new(&symbols, &config);
        assert!(grid_alignment(&ctx).is_empty());
    }

    #[test]
    fn test_floating_hints_and_structural_detection() {
        let symbols = vec![
            Symbol::new("s", SymbolKind::source("B1")).with_element("S"),
            Symbol::new("b1", SymbolKind::bus(100.0, 10.0)).with_element("B1"),
            Symbol::new("b2", SymbolKind::bus(100.0, 10.0)).with_element("B2"),
            Symbol::new("b3", SymbolKind::bus(100.0, 10.0)).with_element("B3"),
            Symbol::new("ld", SymbolKind::load("B404")).with_element("LD"),
        ];
        let config = ValidatorConfig::default().with_floating(["b3", "b3"]);
        let ctx = RuleContext::new(&symbols, &config);
        let issues = floating_symbols(&ctx);

        let ids: Vec<Vec<String>> = issues.iter().map(|i| i.symbol_ids.clone()).collect();
        assert_eq!(
            ids,
            vec![
                vec!["b3".to_string()],
                vec!["b3".to_string()],
                vec!["b2".to_string()],
                vec!["ld".to_string()],
            ]
        );
        assert!(issues[0].message.contains("1 floating"));
    }

    #[test]
    fn test_no_hints_means_no_aggregate() {
        let symbols = vec![
            Symbol::new("s", SymbolKind::source("B1")).with_element("S"),
            Symbol::new("b1", SymbolKind::bus(100.0, 10.0)).with_element("B1"),
        ];
        let config = ValidatorConfig::default();
        let ctx = RuleContext::new(&symbols, &config);
        assert!(floating_symbols(&ctx).is_empty());
    }
}
