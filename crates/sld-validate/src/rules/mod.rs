//! Rule table and the shared context rules run against.

use sld_core::{ElementIndex, Symbol, TopologyGraph, ValidationIssue};

use crate::config::{CheckToggles, ValidatorConfig};

pub mod connectivity;
pub mod geometry;
pub mod identity;

pub const ORPHAN_SYMBOL: &str = "V-01";
pub const DUPLICATE_ELEMENT: &str = "V-01b";
pub const HIDDEN_ELEMENT: &str = "V-02";
pub const DANGLING_REFERENCE: &str = "V-03";
pub const ISLAND: &str = "V-04";
pub const NO_SOURCE: &str = "V-05";
pub const UNSWITCHED_BRANCH: &str = "V-06";
pub const UNPROTECTED_TRANSFORMER: &str = "V-07";
pub const COLLISION: &str = "G-01";
pub const GRID_ALIGNMENT: &str = "G-03";
pub const FLOATING_SYMBOL: &str = "G-04";

/// Everything a rule may look at. Built once per validation run.
pub struct RuleContext<'a> {
    pub symbols: &'a [Symbol],
    pub config: &'a ValidatorConfig,
    pub index: ElementIndex<'a>,
    pub graph: TopologyGraph<'a>,
    order: Vec<usize>,
}

impl<'a> RuleContext<'a> {
    pub fn new(symbols: &'a [Symbol], config: &'a ValidatorConfig) -> Self {
        let mut order: Vec<usize> = (0..symbols.len()).collect();
        order.sort_by(|&a, &b| symbols[a].id.cmp(&symbols[b].id).then(a.cmp(&b)));
        Self {
            symbols,
            config,
            index: ElementIndex::new(symbols),
            graph: TopologyGraph::build(symbols),
            order,
        }
    }

    /// Symbols with their slice index, in ascending id order.
    pub fn ordered(&self) -> impl Iterator<Item = (usize, &'a Symbol)> + '_ {
        let symbols = self.symbols;
        self.order.iter().map(move |&idx| (idx, &symbols[idx]))
    }

    /// True when some symbol carries `element_id`.
    pub fn exists(&self, element_id: &str) -> bool {
        self.index.contains(element_id)
    }

    pub fn resolve(&self, element_id: Option<&str>) -> Option<&'a Symbol> {
        element_id.and_then(|id| self.index.resolve(id))
    }
}

/// A single validation rule.
pub struct Rule {
    pub id: &'static str,
    pub name: &'static str,
    enabled: fn(&CheckToggles) -> bool,
    check: fn(&RuleContext<'_>) -> Vec<ValidationIssue>,
}

impl Rule {
    pub fn is_enabled(&self, checks: &CheckToggles) -> bool {
        (self.enabled)(checks)
    }

    pub fn run(&self, ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
        (self.check)(ctx)
    }
}

/// All rules, in execution order.
pub const RULES: &[Rule] = &[
    Rule {
        id: ORPHAN_SYMBOL,
        name: "orphan symbol",
        enabled: |c| c.orphan_symbols,
        check: identity::orphan_symbols,
    },
    Rule {
        id: DUPLICATE_ELEMENT,
        name: "duplicate element identifier",
        enabled: |c| c.duplicate_elements,
        check: identity::duplicate_elements,
    },
    Rule {
        id: HIDDEN_ELEMENT,
        name: "hidden element",
        enabled: |c| c.hidden_elements,
        check: identity::hidden_elements,
    },
    Rule {
        id: DANGLING_REFERENCE,
        name: "dangling reference",
        enabled: |c| c.dangling_references,
        check: connectivity::dangling_references,
    },
    Rule {
        id: ISLAND,
        name: "islands",
        enabled: |c| c.islands,
        check: connectivity::islands,
    },
    Rule {
        id: NO_SOURCE,
        name: "no source",
        enabled: |c| c.missing_source,
        check: connectivity::missing_source,
    },
    Rule {
        id: UNSWITCHED_BRANCH,
        name: "unswitched medium-voltage branch",
        enabled: |c| c.unswitched_branches,
        check: connectivity::unswitched_branches,
    },
    Rule {
        id: UNPROTECTED_TRANSFORMER,
        name: "unprotected transformer",
        enabled: |c| c.unprotected_transformers,
        check: connectivity::unprotected_transformers,
    },
    Rule {
        id: COLLISION,
        name: "collision",
        enabled: |c| c.collisions,
        check: geometry::collisions,
    },
    Rule {
        id: GRID_ALIGNMENT,
        name: "grid alignment",
        enabled: |c| c.grid_alignment,
        check: geometry::grid_alignment,
    },
    Rule {
        id: FLOATING_SYMBOL,
        name: "floating symbol",
        enabled: |c| c.floating_symbols,
        check: geometry::floating_symbols,
    },
];
