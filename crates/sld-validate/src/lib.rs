//! # sld-validate: Diagram Validation
//!
//! Runs the topology (V-*) and geometry (G-*) rules over a symbol snapshot and
//! assembles a [`ValidationResult`]. Rules are independent: each sees the
//! whole snapshot, none short-circuits another, and their issues are
//! concatenated in a fixed execution order.
//!
//! Malformed topology is never an error here. Dangling references, islands
//! and missing switches all come back as issues; the caller decides whether
//! to block on `valid`.
//!
//! ```rust
//! use sld_core::{Symbol, SymbolKind};
//! use sld_validate::{validate, ValidatorConfig};
//!
//! let symbols = vec![
//!     Symbol::new("src", SymbolKind::source("B1")).with_element("S1").at(100.0, 40.0),
//!     Symbol::new("b1", SymbolKind::bus(120.0, 10.0)).with_element("B1").at(100.0, 100.0),
//! ];
//! let result = validate(&symbols, &ValidatorConfig::default());
//! assert!(result.valid);
//! ```

pub mod config;
pub mod rules;
pub mod voltage;

pub use config::{CheckToggles, ValidatorConfig};
pub use rules::{Rule, RuleContext, RULES};
pub use voltage::{classify, VoltageLevel};

use sld_core::{Symbol, ValidationResult};

/// Validate a snapshot with every enabled rule.
pub fn validate(symbols: &[Symbol], config: &ValidatorConfig) -> ValidationResult {
    let ctx = RuleContext::new(symbols, config);

    let mut issues = Vec::new();
    for rule in RULES {
        if !rule.is_enabled(&config.checks) {
            tracing::trace!(rule = rule.id, "rule disabled");
            continue;
        }
        let found = rule.run(&ctx);
        tracing::trace!(rule = rule.id, name = rule.name, issues = found.len(), "rule finished");
        issues.extend(found);
    }

    let result = ValidationResult::from_issues(issues);
    tracing::debug!(
        symbols = symbols.len(),
        errors = result.stats.errors,
        warnings = result.stats.warnings,
        infos = result.stats.infos,
        valid = result.valid,
        "validated diagram"
    );
    result
}
