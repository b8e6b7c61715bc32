//! Apparatus port templates and port resolution.
//!
//! Every symbol draws as one apparatus (busbar, breaker, transformer...). The
//! apparatus template places the four canonical ports in a normalized 100x100
//! layout space. Resolving a port rotates that offset with the symbol, scales
//! it into the symbol's drawing size and translates it so the symbol is
//! centered on its position.
//!
//! Resolution is total: an apparatus key the catalog knows but this crate does
//! not degrades to [`PortTemplate::Generic`], whose ports all sit at the center.

use serde::{Deserialize, Serialize};

use crate::geometry::{symbol_size, BoundingBox, Position, Rotation, Size};
use crate::{LineType, SwitchType, Symbol, SymbolKind};

/// Canonical port names, in clockwise order starting at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortName {
    Top,
    Right,
    Bottom,
    Left,
}

impl PortName {
    pub const ALL: [PortName; 4] = [
        PortName::Top,
        PortName::Right,
        PortName::Bottom,
        PortName::Left,
    ];

    fn index(self) -> u8 {
        match self {
            PortName::Top => 0,
            PortName::Right => 1,
            PortName::Bottom => 2,
            PortName::Left => 3,
        }
    }

    fn from_index(index: u8) -> Self {
        Self::ALL[(index % 4) as usize]
    }

    /// Side this port faces after rotating the symbol (top→right at 90°).
    pub fn rotate(self, rotation: Rotation) -> Self {
        Self::from_index(self.index() + rotation.quarter_turns())
    }

    /// Inverse of [`PortName::rotate`].
    pub fn rotate_back(self, rotation: Rotation) -> Self {
        Self::from_index(self.index() + 4 - rotation.quarter_turns())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PortName::Top => "top",
            PortName::Right => "right",
            PortName::Bottom => "bottom",
            PortName::Left => "left",
        }
    }
}

impl std::fmt::Display for PortName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port layout template, keyed by the underlying apparatus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortTemplate {
    Busbar,
    CircuitBreaker,
    Disconnector,
    Fuse,
    Cable,
    OverheadLine,
    Transformer,
    Source,
    Load,
    /// Fallback for unknown apparatus: every port at the center
    Generic,
}

impl PortTemplate {
    /// Parse a catalog apparatus key. Unknown keys map to [`PortTemplate::Generic`].
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "busbar" => PortTemplate::Busbar,
            "circuit_breaker" => PortTemplate::CircuitBreaker,
            "disconnector" => PortTemplate::Disconnector,
            "fuse" => PortTemplate::Fuse,
            "cable" => PortTemplate::Cable,
            "overhead_line" => PortTemplate::OverheadLine,
            "transformer" => PortTemplate::Transformer,
            "source" => PortTemplate::Source,
            "load" => PortTemplate::Load,
            _ => PortTemplate::Generic,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            PortTemplate::Busbar => "busbar",
            PortTemplate::CircuitBreaker => "circuit_breaker",
            PortTemplate::Disconnector => "disconnector",
            PortTemplate::Fuse => "fuse",
            PortTemplate::Cable => "cable",
            PortTemplate::OverheadLine => "overhead_line",
            PortTemplate::Transformer => "transformer",
            PortTemplate::Source => "source",
            PortTemplate::Load => "load",
            PortTemplate::Generic => "generic",
        }
    }

    pub fn for_kind(kind: &SymbolKind) -> Self {
        match kind {
            SymbolKind::Bus(_) => PortTemplate::Busbar,
            SymbolKind::LineBranch(line) => match line.line_type {
                LineType::Cable => PortTemplate::Cable,
                LineType::Overhead => PortTemplate::OverheadLine,
            },
            SymbolKind::TransformerBranch(_) => PortTemplate::Transformer,
            SymbolKind::Switch(switch) => match switch.switch_type {
                SwitchType::Breaker => PortTemplate::CircuitBreaker,
                SwitchType::Disconnector => PortTemplate::Disconnector,
                SwitchType::Fuse => PortTemplate::Fuse,
            },
            SymbolKind::Source(_) => PortTemplate::Source,
            SymbolKind::Load(_) => PortTemplate::Load,
        }
    }

    /// Template for a symbol, honoring its apparatus override.
    pub fn for_symbol(symbol: &Symbol) -> Self {
        match &symbol.apparatus {
            Some(key) => PortTemplate::from_key(key),
            None => PortTemplate::for_kind(&symbol.kind),
        }
    }

    /// Port offset in the normalized 100x100 layout space, before rotation.
    pub fn offset(self, port: PortName) -> (f64, f64) {
        match self {
            PortTemplate::Generic => (50.0, 50.0),
            // Generator circle: side terminals sit on the inscribed circle
            PortTemplate::Source => match port {
                PortName::Top => (50.0, 0.0),
                PortName::Bottom => (50.0, 100.0),
                PortName::Left => (10.0, 50.0),
                PortName::Right => (90.0, 50.0),
            },
            // Load arrow: the tip stops short of the bottom edge
            PortTemplate::Load => match port {
                PortName::Top => (50.0, 0.0),
                PortName::Bottom => (50.0, 90.0),
                PortName::Left => (15.0, 50.0),
                PortName::Right => (85.0, 50.0),
            },
            _ => match port {
                PortName::Top => (50.0, 0.0),
                PortName::Bottom => (50.0, 100.0),
                PortName::Left => (0.0, 50.0),
                PortName::Right => (100.0, 50.0),
            },
        }
    }

    /// Drawing size used when the symbol carries none.
    pub fn default_size(self) -> Option<Size> {
        match self {
            PortTemplate::Busbar => Some(Size::new(120.0, 10.0)),
            PortTemplate::CircuitBreaker | PortTemplate::Disconnector => {
                Some(Size::new(20.0, 40.0))
            }
            PortTemplate::Fuse => Some(Size::new(16.0, 40.0)),
            PortTemplate::Cable | PortTemplate::OverheadLine => Some(Size::new(20.0, 60.0)),
            PortTemplate::Transformer => Some(Size::new(40.0, 60.0)),
            PortTemplate::Source => Some(Size::new(40.0, 40.0)),
            PortTemplate::Load => Some(Size::new(30.0, 30.0)),
            PortTemplate::Generic => None,
        }
    }
}

/// A port with its concrete canvas position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPort {
    pub symbol_id: String,
    /// Port name in the symbol's own (unrotated) frame
    pub port: PortName,
    /// Canvas side the port faces once the rotation is applied
    pub facing: PortName,
    pub position: Position,
}

/// Resolve `port` of `symbol` under `rotation`.
///
/// The template offset is rotated in normalized space, scaled by
/// `(width / 100, height / 100)` and translated to the symbol's top-left
/// corner (the symbol is centered on its position).
pub fn resolve_port(symbol: &Symbol, port: PortName, rotation: Rotation) -> ResolvedPort {
    let template = PortTemplate::for_symbol(symbol);
    let (nx, ny) = rotation.apply_normalized(template.offset(port));
    let size = symbol_size(symbol);
    let bbox = BoundingBox::centered(symbol.position, size);

    ResolvedPort {
        symbol_id: symbol.id.clone(),
        port,
        facing: port.rotate(rotation),
        position: Position::new(
            bbox.x + nx * size.width / 100.0,
            bbox.y + ny * size.height / 100.0,
        ),
    }
}

/// Resolve the port that faces `side` on the canvas, using the symbol's own rotation.
pub fn port_facing(symbol: &Symbol, side: PortName) -> ResolvedPort {
    let local = side.rotate_back(symbol.rotation);
    resolve_port(symbol, local, symbol.rotation)
}
