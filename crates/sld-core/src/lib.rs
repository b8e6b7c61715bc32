//! # sld-core: Single-Line Diagram Modeling Core
//!
//! Provides the symbol model, port geometry and topology graph that the router
//! (`sld-viz`) and validator (`sld-validate`) operate on.
//!
//! ## Design Philosophy
//!
//! A diagram is an immutable snapshot of [`Symbol`]s. Every symbol is one of a
//! closed set of kinds ([`SymbolKind`]):
//! - **Nodes**: buses (busbars)
//! - **Branches**: lines/cables and transformers, referencing two nodes
//! - **Switches**: breakers, disconnectors and fuses, referencing two nodes
//! - **Attachments**: sources and loads, referencing a single node
//!
//! References are made by *element identifier* (the id of the domain model
//! element the symbol depicts), not by symbol id. A reference that cannot be
//! resolved is data, not a failure: the router skips it and the validator
//! reports it.
//!
//! ## Quick Start
//!
//! ```rust
//! use sld_core::*;
//!
//! let bus = Symbol::new("b1", SymbolKind::bus(80.0, 40.0))
//!     .with_element("E-B1")
//!     .at(200.0, 100.0);
//!
//! let left = resolve_port(&bus, PortName::Left, Rotation::Deg0);
//! assert_eq!(left.position, Position::new(160.0, 100.0));
//! ```
//!
//! ## Modules
//!
//! - [`geometry`] - Positions, bounding boxes and grid snapping
//! - [`ports`] - Apparatus port templates and port resolution
//! - [`graph_utils`] - Topology graph and source reachability
//! - [`diagnostics`] - Validation issues and results

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod graph_utils;
pub mod ports;
pub mod units;

pub use diagnostics::{Severity, ValidationIssue, ValidationResult, ValidationStats};
pub use error::{SldError, SldResult};
pub use geometry::{bounding_box, snap_to_grid, BoundingBox, Position, Rotation, Size};
pub use graph_utils::TopologyGraph;
pub use ports::{port_facing, resolve_port, PortName, PortTemplate, ResolvedPort};
pub use units::{GridSize, Kilovolts};

/// Kind of conductor a line branch represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    #[default]
    Cable,
    Overhead,
}

/// Switching apparatus type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchType {
    #[default]
    Breaker,
    Disconnector,
    Fuse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchState {
    Open,
    #[default]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusData {
    /// Explicit drawing width; non-positive means "use the default size"
    pub width: f64,
    pub height: f64,
    /// Nominal voltage, when the catalog provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage_kv: Option<Kilovolts>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_node_id: Option<String>,
    pub line_type: LineType,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformerData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_node_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwitchData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_node_id: Option<String>,
    pub switch_type: SwitchType,
    pub state: SwitchState,
}

/// Source or load attached to a single node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_to_node_id: Option<String>,
}

/// Kind-specific part of a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SymbolKind {
    Bus(BusData),
    LineBranch(LineData),
    TransformerBranch(TransformerData),
    Switch(SwitchData),
    Source(Attachment),
    Load(Attachment),
}

impl SymbolKind {
    pub fn bus(width: f64, height: f64) -> Self {
        SymbolKind::Bus(BusData {
            width,
            height,
            voltage_kv: None,
        })
    }

    pub fn line(from: impl Into<String>, to: impl Into<String>) -> Self {
        SymbolKind::LineBranch(LineData {
            from_node_id: Some(from.into()),
            to_node_id: Some(to.into()),
            line_type: LineType::Cable,
        })
    }

    pub fn transformer(from: impl Into<String>, to: impl Into<String>) -> Self {
        SymbolKind::TransformerBranch(TransformerData {
            from_node_id: Some(from.into()),
            to_node_id: Some(to.into()),
        })
    }

    pub fn switch(from: impl Into<String>, to: impl Into<String>) -> Self {
        SymbolKind::Switch(SwitchData {
            from_node_id: Some(from.into()),
            to_node_id: Some(to.into()),
            ..SwitchData::default()
        })
    }

    pub fn source(node: impl Into<String>) -> Self {
        SymbolKind::Source(Attachment {
            connected_to_node_id: Some(node.into()),
        })
    }

    pub fn load(node: impl Into<String>) -> Self {
        SymbolKind::Load(Attachment {
            connected_to_node_id: Some(node.into()),
        })
    }

    /// Short lowercase label used in messages and DOT output.
    pub fn label(&self) -> &'static str {
        match self {
            SymbolKind::Bus(_) => "bus",
            SymbolKind::LineBranch(_) => "line",
            SymbolKind::TransformerBranch(_) => "transformer",
            SymbolKind::Switch(_) => "switch",
            SymbolKind::Source(_) => "source",
            SymbolKind::Load(_) => "load",
        }
    }
}

/// Topology references carried by a symbol, with blank ids treated as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum References<'a> {
    /// Buses reference nothing
    None,
    /// Branches and switches
    Pair {
        from: Option<&'a str>,
        to: Option<&'a str>,
    },
    /// Sources and loads
    Single(Option<&'a str>),
}

/// A positioned diagram symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub rotation: Rotation,
    /// Explicit drawing size overriding the per-apparatus default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Catalog apparatus key overriding the kind's port template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apparatus: Option<String>,
    #[serde(default = "default_in_service")]
    pub in_service: bool,
    #[serde(flatten)]
    pub kind: SymbolKind,
}

fn default_in_service() -> bool {
    true
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.as_str()).filter(|s| !s.trim().is_empty())
}

impl Symbol {
    pub fn new(id: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            id: id.into(),
            element_id: None,
            name: String::new(),
            position: Position::default(),
            rotation: Rotation::default(),
            size: None,
            apparatus: None,
            in_service: true,
            kind,
        }
    }

    pub fn with_element(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = Some(element_id.into());
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    pub fn rotated(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_apparatus(mut self, key: impl Into<String>) -> Self {
        self.apparatus = Some(key.into());
        self
    }

    pub fn out_of_service(mut self) -> Self {
        self.in_service = false;
        self
    }

    /// Element identifier, or `None` when absent or blank.
    pub fn element_id(&self) -> Option<&str> {
        non_blank(self.element_id.as_ref())
    }

    /// Element identifier, falling back to the symbol id for display.
    pub fn element_or_id(&self) -> &str {
        self.element_id().unwrap_or(&self.id)
    }

    pub fn is_bus(&self) -> bool {
        matches!(self.kind, SymbolKind::Bus(_))
    }

    pub fn is_source(&self) -> bool {
        matches!(self.kind, SymbolKind::Source(_))
    }

    pub fn references(&self) -> References<'_> {
        match &self.kind {
            SymbolKind::Bus(_) => References::None,
            SymbolKind::LineBranch(data) => References::Pair {
                from: non_blank(data.from_node_id.as_ref()),
                to: non_blank(data.to_node_id.as_ref()),
            },
            SymbolKind::TransformerBranch(data) => References::Pair {
                from: non_blank(data.from_node_id.as_ref()),
                to: non_blank(data.to_node_id.as_ref()),
            },
            SymbolKind::Switch(data) => References::Pair {
                from: non_blank(data.from_node_id.as_ref()),
                to: non_blank(data.to_node_id.as_ref()),
            },
            SymbolKind::Source(data) | SymbolKind::Load(data) => {
                References::Single(non_blank(data.connected_to_node_id.as_ref()))
            }
        }
    }

    /// Every non-blank element id this symbol references, in from/to order.
    pub fn referenced_ids(&self) -> Vec<&str> {
        match self.references() {
            References::None => Vec::new(),
            References::Pair { from, to } => from.into_iter().chain(to).collect(),
            References::Single(node) => node.into_iter().collect(),
        }
    }
}

/// Lookup from element identifier to the symbols that carry it.
///
/// When several symbols share an element id, [`ElementIndex::resolve`] returns
/// the one with the smallest symbol id so results never depend on input order.
#[derive(Debug, Clone)]
pub struct ElementIndex<'a> {
    symbols: &'a [Symbol],
    by_element: BTreeMap<&'a str, Vec<usize>>,
}

impl<'a> ElementIndex<'a> {
    pub fn new(symbols: &'a [Symbol]) -> Self {
        let mut by_element: BTreeMap<&'a str, Vec<usize>> = BTreeMap::new();
        for (idx, symbol) in symbols.iter().enumerate() {
            if let Some(element_id) = symbol.element_id() {
                by_element.entry(element_id).or_default().push(idx);
            }
        }
        for carriers in by_element.values_mut() {
            carriers.sort_by(|&a, &b| symbols[a].id.cmp(&symbols[b].id).then(a.cmp(&b)));
        }
        Self {
            symbols,
            by_element,
        }
    }

    /// Position in the symbol slice of the symbol carrying `element_id`.
    pub fn resolve_index(&self, element_id: &str) -> Option<usize> {
        self.by_element
            .get(element_id)
            .and_then(|carriers| carriers.first().copied())
    }

    pub fn resolve(&self, element_id: &str) -> Option<&'a Symbol> {
        self.resolve_index(element_id).map(|idx| &self.symbols[idx])
    }

    pub fn contains(&self, element_id: &str) -> bool {
        self.by_element.contains_key(element_id)
    }

    /// All element ids with their carriers (ascending by symbol id), ascending by element id.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Vec<&'a Symbol>)> + '_ {
        self.by_element.iter().map(move |(element_id, carriers)| {
            (
                *element_id,
                carriers.iter().map(|&idx| &self.symbols[idx]).collect(),
            )
        })
    }
}

/// A symbol snapshot as exchanged with the editing application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub symbols: Vec<Symbol>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DiagramRepr {
    Bare(Vec<Symbol>),
    Wrapped { symbols: Vec<Symbol> },
}

impl Diagram {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    /// Parse a snapshot that is either a bare array or `{"symbols": [...]}`.
    pub fn from_json_str(json: &str) -> SldResult<Self> {
        let symbols = match serde_json::from_str::<DiagramRepr>(json)? {
            DiagramRepr::Bare(symbols) => symbols,
            DiagramRepr::Wrapped { symbols } => symbols,
        };
        Ok(Self { symbols })
    }

    pub fn load(path: impl AsRef<Path>) -> SldResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Symbols whose ids appear in `ids`; all symbols when `ids` is empty.
    pub fn select(&self, ids: &[String]) -> Vec<Symbol> {
        if ids.is_empty() {
            return self.symbols.clone();
        }
        self.symbols
            .iter()
            .filter(|symbol| ids.contains(&symbol.id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_json_shape() {
        let json = r#"{
            "id": "sw1",
            "elementId": "E-SW1",
            "name": "Q1",
            "position": {"x": 40, "y": 60},
            "rotation": 90,
            "kind": "switch",
            "fromNodeId": "E-B1",
            "toNodeId": "E-B2",
            "switchType": "disconnector",
            "state": "open"
        }"#;
        let symbol: Symbol = serde_json::from_str(json).unwrap();

        assert_eq!(symbol.rotation, Rotation::Deg90);
        assert!(symbol.in_service);
        match &symbol.kind {
            SymbolKind::Switch(data) => {
                assert_eq!(data.switch_type, SwitchType::Disconnector);
                assert_eq!(data.state, SwitchState::Open);
            }
            other => panic!("expected switch, got {:?}", other),
        }
        assert_eq!(
            symbol.references(),
            References::Pair {
                from: Some("E-B1"),
                to: Some("E-B2")
            }
        );
    }

    #[test]
    fn test_blank_references_are_absent() {
        let symbol = Symbol::new("l1", SymbolKind::line("  ", "E-B2")).with_element(" ");
        assert_eq!(symbol.element_id(), None);
        assert_eq!(symbol.element_or_id(), "l1");
        assert_eq!(symbol.referenced_ids(), vec!["E-B2"]);
    }

    #[test]
    fn test_element_index_prefers_smallest_symbol_id() {
        let symbols = vec![
            Symbol::new("b2", SymbolKind::bus(80.0, 10.0)).with_element("E1"),
            Symbol::new("b1", SymbolKind::bus(80.0, 10.0)).with_element("E1"),
        ];
        let index = ElementIndex::new(&symbols);
        assert_eq!(index.resolve("E1").map(|s| s.id.as_str()), Some("b1"));
        assert!(index.resolve("E2").is_none());
    }

    #[test]
    fn test_diagram_accepts_bare_and_wrapped() {
        let bare = r#"[{"id": "b1", "kind": "bus", "width": 80, "height": 10}]"#;
        let wrapped = r#"{"symbols": [{"id": "b1", "kind": "bus", "width": 80, "height": 10}]}"#;
        let a = Diagram::from_json_str(bare).unwrap();
        let b = Diagram::from_json_str(wrapped).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.symbols.len(), 1);
    }

    #[test]
    fn test_diagram_rejects_unknown_kind() {
        let json = r#"[{"id": "x", "kind": "capacitor"}]"#;
        let err = Diagram::from_json_str(json).unwrap_err();
        assert!(matches!(err, SldError::Parse(_)));
    }
}
