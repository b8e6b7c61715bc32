//! End-to-end validation scenarios over whole snapshots.

use sld_core::{Diagram, Severity, Symbol, SymbolKind};
use sld_validate::{validate, CheckToggles, ValidatorConfig, RULES};
use sld_viz::{route_connections, RouterConfig};

const FEEDER: &str = r#"{"symbols": [
    {"id": "src", "elementId": "GRID", "kind": "source", "connectedToNodeId": "B1",
     "position": {"x": 200, "y": 40}},
    {"id": "b1", "elementId": "B1", "name": "RS 15 kV", "kind": "bus",
     "width": 120, "height": 10, "voltageKv": 15, "position": {"x": 200, "y": 100}},
    {"id": "t1", "elementId": "T1", "kind": "transformer_branch",
     "fromNodeId": "B1", "toNodeId": "B2", "position": {"x": 200, "y": 200}},
    {"id": "f1", "elementId": "F1", "kind": "switch", "switchType": "fuse",
     "fromNodeId": "B1", "toNodeId": "T1", "position": {"x": 300, "y": 160}},
    {"id": "b2", "elementId": "B2", "name": "nN 0,4", "kind": "bus",
     "width": 120, "height": 10, "position": {"x": 200, "y": 300}},
    {"id": "ld", "elementId": "LD1", "kind": "load", "connectedToNodeId": "B2",
     "position": {"x": 200, "y": 360}}
]}"#;

fn bus(id: &str, element: &str, name: &str) -> Symbol {
    Symbol::new(id, SymbolKind::bus(120.0, 10.0))
        .with_element(element)
        .named(name)
}

#[test]
fn clean_feeder_has_no_issues() {
    let diagram = Diagram::from_json_str(FEEDER).unwrap();
    let result = validate(&diagram.symbols, &ValidatorConfig::default());
    assert!(result.valid, "{result}");
    assert_eq!(result.stats.total, 0, "{result}");

    let connections = route_connections(&diagram.symbols, &RouterConfig::default());
    let ids: Vec<&str> = connections.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["f1:from", "f1:to", "ld", "src", "t1"]);
}

#[test]
fn island_reports_only_the_isolated_bus() {
    let symbols = vec![
        Symbol::new("s", SymbolKind::source("B1")).with_element("S"),
        bus("b1", "B1", ""),
        bus("b2", "B2", ""),
    ];
    let result = validate(&symbols, &ValidatorConfig::default());
    let islands: Vec<_> = result.issues_by_rule("V-04").collect();
    assert_eq!(islands.len(), 1);
    assert_eq!(islands[0].severity, Severity::Warning);
    assert!(islands[0].implicates("b2"));
    assert!(!islands[0].implicates("b1"));
}

#[test]
fn switch_requirement_on_medium_voltage_line() {
    let mut symbols = vec![
        Symbol::new("s", SymbolKind::source("B1")).with_element("S"),
        bus("b1", "B1", "SN"),
        bus("b2", "B2", "nN"),
        Symbol::new("l1", SymbolKind::line("B1", "B2")).with_element("L1"),
    ];
    let result = validate(&symbols, &ValidatorConfig::default());
    let unswitched: Vec<_> = result.issues_by_rule("V-06").collect();
    assert_eq!(unswitched.len(), 1);
    assert_eq!(unswitched[0].severity, Severity::Error);
    assert!(unswitched[0].implicates("l1"));
    assert!(!result.valid);

    symbols.push(Symbol::new("q1", SymbolKind::switch("B1", "B2")).with_element("Q1"));
    let result = validate(&symbols, &ValidatorConfig::default());
    assert_eq!(result.issues_by_rule("V-06").count(), 0);
}

#[test]
fn save_gate_ignores_warnings_and_infos() {
    let diagram = Diagram::from_json_str(FEEDER).unwrap();
    let mut symbols = diagram.symbols;
    // overlap b2 and nudge it off the grid: G-01 warnings and a G-03 info only
    if let Some(b2) = symbols.iter_mut().find(|s| s.id == "b2") {
        b2.position.y = 355.0;
    }
    let result = validate(&symbols, &ValidatorConfig::default());
    assert!(result.stats.warnings > 0);
    assert!(result.stats.infos > 0);
    assert_eq!(result.stats.errors, 0);
    assert!(result.valid);
    assert!(result.ensure_valid().is_ok());

    symbols.retain(|s| s.id != "src");
    let result = validate(&symbols, &ValidatorConfig::default());
    assert!(!result.valid);
    assert!(result.ensure_valid().is_err());
}

#[test]
fn issues_follow_rule_execution_order() {
    let symbols = vec![
        bus("b1", "B1", "SN"),
        bus("b2", "B2", "nN"),
        bus("dup", "B1", "").at(1000.0, 1000.0),
        Symbol::new("l1", SymbolKind::line("B1", "B2")).with_element("L1"),
        Symbol::new("t1", SymbolKind::transformer("B1", "B2")).with_element("T1"),
        Symbol::new("ld", SymbolKind::load("B9")).with_element("LD"),
        Symbol::new("orphan", SymbolKind::bus(120.0, 10.0)).at(333.0, 333.0),
    ];
    let config = ValidatorConfig::default()
        .with_model_elements(["HIDDEN"])
        .with_floating(["ld"]);
    let result = validate(&symbols, &config);

    let rank = |rule_id: &str| RULES.iter().position(|r| r.id == rule_id).unwrap();
    let ranks: Vec<usize> = result.issues.iter().map(|i| rank(&i.rule_id)).collect();
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "{result}");

    for rule in RULES {
        assert!(
            result.issues_by_rule(rule.id).count() > 0,
            "{} did not fire",
            rule.id
        );
    }
}

#[test]
fn router_skips_what_the_validator_reports() {
    let symbols = vec![
        Symbol::new("s", SymbolKind::source("B1")).with_element("S"),
        bus("b1", "B1", ""),
        Symbol::new("ld", SymbolKind::load("GONE")).with_element("LD"),
    ];
    let connections = route_connections(&symbols, &RouterConfig::default());
    assert!(connections.iter().all(|c| c.id != "ld"));

    let config = ValidatorConfig::default().with_checks(CheckToggles::topology_only());
    let result = validate(&symbols, &config);
    let dangling: Vec<_> = result.issues_by_rule("V-03").collect();
    assert_eq!(dangling.len(), 1);
    assert!(dangling[0].implicates("ld"));
}

#[test]
fn validation_is_deterministic() {
    let diagram = Diagram::from_json_str(FEEDER).unwrap();
    let mut reversed = diagram.symbols.clone();
    reversed.reverse();
    reversed.retain(|s| s.id != "f1");

    let mut forward = diagram.symbols;
    forward.retain(|s| s.id != "f1");

    let config = ValidatorConfig::default();
    assert_eq!(validate(&forward, &config), validate(&reversed, &config));
}
