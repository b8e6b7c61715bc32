//! Identity rules: every symbol depicts exactly one model element and every
//! model element is depicted.

use std::collections::BTreeSet;

use sld_core::ValidationIssue;

use super::{RuleContext, DUPLICATE_ELEMENT, HIDDEN_ELEMENT, ORPHAN_SYMBOL};

/// V-01: symbols without an element id.
pub fn orphan_symbols(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    ctx.ordered()
        .filter(|(_, symbol)| symbol.element_id().is_none())
        .map(|(_, symbol)| {
            ValidationIssue::error(
                ORPHAN_SYMBOL,
                format!(
                    "Symbol '{}' ({}) is not linked to a model element",
                    symbol.id,
                    symbol.kind.label()
                ),
            )
            .with_symbol(&symbol.id)
            .with_hint("Assign the element this symbol depicts or delete the symbol")
        })
        .collect()
}

/// V-01b: element ids carried by more than one symbol.
pub fn duplicate_elements(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    ctx.index
        .iter()
        .filter(|(_, carriers)| carriers.len() > 1)
        .map(|(element_id, carriers)| {
            ValidationIssue::error(
                DUPLICATE_ELEMENT,
                format!(
                    "Element '{}' is depicted by {} symbols",
                    element_id,
                    carriers.len()
                ),
            )
            .with_symbols(carriers.iter().map(|symbol| symbol.id.as_str()))
            .with_hint("Keep one symbol per model element")
        })
        .collect()
}

/// V-02: model elements with no symbol. Skipped without a model id list.
pub fn hidden_elements(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    let Some(model_ids) = &ctx.config.model_element_ids else {
        return Vec::new();
    };
    let wanted: BTreeSet<&str> = model_ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .collect();

    wanted
        .into_iter()
        .filter(|element_id| !ctx.exists(element_id))
        .map(|element_id| {
            ValidationIssue::warning(
                HIDDEN_ELEMENT,
                format!("Model element '{element_id}' has no symbol on the diagram"),
            )
            .with_hint("Place a symbol for it or confirm it is intentionally hidden")
        })
        .collect()
}
