//! Connectivity rules over the topology references.
//!
//! - V-03 dangling references
//! - V-04 buses no source can reach
//! - V-05 diagrams without any source
//! - V-06 medium-voltage lines without a switch
//! - V-07 transformers between tiers without a switch

use std::collections::BTreeSet;

use sld_core::{References, Symbol, SymbolKind, ValidationIssue};

use super::{
    RuleContext, DANGLING_REFERENCE, ISLAND, NO_SOURCE, UNPROTECTED_TRANSFORMER,
    UNSWITCHED_BRANCH,
};
use crate::voltage::{classify, VoltageLevel};

/// V-03: missing or unresolvable node references.
pub fn dangling_references(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (_, symbol) in ctx.ordered() {
        match symbol.references() {
            References::None => {}
            References::Pair { from, to } => {
                for (side, target) in [("from", from), ("to", to)] {
                    if let Some(issue) = check_reference(ctx, symbol, side, target) {
                        issues.push(issue);
                    }
                }
            }
            References::Single(target) => {
                if let Some(issue) = check_reference(ctx, symbol, "connection", target) {
                    issues.push(issue);
                }
            }
        }
    }
    issues
}

fn check_reference(
    ctx: &RuleContext<'_>,
    symbol: &Symbol,
    side: &str,
    target: Option<&str>,
) -> Option<ValidationIssue> {
    let message = match target {
        None => format!(
            "Symbol '{}' ({}) has no {} node",
            symbol.id,
            symbol.kind.label(),
            side
        ),
        Some(element_id) if !ctx.exists(element_id) => format!(
            "Symbol '{}' ({}) references missing element '{}' on its {} side",
            symbol.id,
            symbol.kind.label(),
            element_id,
            side
        ),
        Some(_) => return None,
    };
    Some(
        ValidationIssue::error(DANGLING_REFERENCE, message)
            .with_symbol(&symbol.id)
            .with_hint("Reconnect the symbol to an existing node"),
    )
}

/// V-04: buses no source reaches, as a single warning.
pub fn islands(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    let reached = ctx.graph.reachable_from_sources();
    let unreached: Vec<&str> = ctx
        .ordered()
        .filter(|(idx, symbol)| symbol.is_bus() && !reached[*idx])
        .map(|(_, symbol)| symbol.id.as_str())
        .collect();

    if unreached.is_empty() {
        return Vec::new();
    }
    let noun = if unreached.len() == 1 { "bus" } else { "buses" };
    vec![ValidationIssue::warning(
        ISLAND,
        format!(
            "{} {} not reachable from any source: {}",
            unreached.len(),
            noun,
            unreached.join(", ")
        ),
    )
    .with_symbols(unreached)
    .with_hint("Connect the island to a supplied part of the network")]
}

/// V-05: at least one source must exist.
pub fn missing_source(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    if ctx.symbols.iter().any(Symbol::is_source) {
        return Vec::new();
    }
    vec![
        ValidationIssue::error(NO_SOURCE, "Diagram has no source")
            .with_hint("Add a source (grid infeed or generator) to a bus"),
    ]
}

/// `(from, to)` element pairs linked by switches with both sides set.
fn switch_links<'a>(ctx: &RuleContext<'a>) -> Vec<(&'a str, &'a str)> {
    ctx.symbols
        .iter()
        .filter(|symbol| matches!(symbol.kind, SymbolKind::Switch(_)))
        .filter_map(|symbol| match symbol.references() {
            References::Pair {
                from: Some(from),
                to: Some(to),
            } => Some((from, to)),
            _ => None,
        })
        .collect()
}

/// V-06: every SN end of a line needs a switch between that bus and the
/// line's other endpoint.
pub fn unswitched_branches(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    let links = switch_links(ctx);
    let linked = |a: &str, b: &str| {
        links
            .iter()
            .any(|&(from, to)| (from == a && to == b) || (from == b && to == a))
    };

    let mut issues = Vec::new();
    for (_, symbol) in ctx.ordered() {
        let SymbolKind::LineBranch(_) = symbol.kind else {
            continue;
        };
        let References::Pair { from, to } = symbol.references() else {
            continue;
        };

        let mut unswitched: BTreeSet<&str> = BTreeSet::new();
        for (end, other) in [(from, to), (to, from)] {
            let (Some(end), Some(bus)) = (end, ctx.resolve(end)) else {
                continue;
            };
            if classify(bus) != Some(VoltageLevel::Medium) {
                continue;
            }
            if !other.map_or(false, |other| linked(end, other)) {
                unswitched.insert(bus.id.as_str());
            }
        }
        if unswitched.is_empty() {
            continue;
        }

        let buses: Vec<&str> = unswitched.iter().copied().collect();
        let mut implicated: BTreeSet<&str> = unswitched;
        implicated.insert(symbol.id.as_str());
        issues.push(
            ValidationIssue::error(
                UNSWITCHED_BRANCH,
                format!(
                    "Line '{}' connects to SN bus {} without a switching device",
                    symbol.id,
                    buses.join(", ")
                ),
            )
            .with_symbols(implicated)
            .with_hint("Insert a breaker or disconnector between the bus and the line"),
        );
    }
    issues
}

/// V-07: transformers between adjacent tiers need a switch on the SN side or
/// on the transformer itself.
pub fn unprotected_transformers(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    let touched: BTreeSet<&str> = ctx
        .symbols
        .iter()
        .filter(|symbol| matches!(symbol.kind, SymbolKind::Switch(_)))
        .flat_map(|symbol| symbol.referenced_ids())
        .collect();

    let mut issues = Vec::new();
    for (_, symbol) in ctx.ordered() {
        let SymbolKind::TransformerBranch(_) = symbol.kind else {
            continue;
        };
        let References::Pair {
            from: Some(from),
            to: Some(to),
        } = symbol.references()
        else {
            continue;
        };
        let (Some(from_bus), Some(to_bus)) = (ctx.resolve(Some(from)), ctx.resolve(Some(to)))
        else {
            continue;
        };
        let (Some(from_level), Some(to_level)) = (classify(from_bus), classify(to_bus)) else {
            continue;
        };
        if !from_level.is_adjacent(to_level) {
            continue;
        }

        let (sn_element, sn_bus) = if from_level == VoltageLevel::Medium {
            (from, from_bus)
        } else {
            (to, to_bus)
        };
        let own_switch = symbol
            .element_id()
            .map_or(false, |element_id| touched.contains(element_id));
        if touched.contains(sn_element) || own_switch {
            continue;
        }

        let implicated: BTreeSet<&str> = [symbol.id.as_str(), sn_bus.id.as_str()].into();
        issues.push(
            ValidationIssue::error(
                UNPROTECTED_TRANSFORMER,
                format!(
                    "Transformer '{}' ({}/{}) has no switching device on its SN side",
                    symbol.id, from_level, to_level
                ),
            )
            .with_symbols(implicated)
            .with_hint("Add a breaker or fuse at the SN-side bus"),
        );
    }
    issues
}
