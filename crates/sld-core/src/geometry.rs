//! Canvas geometry: positions, sizes, bounding boxes and grid snapping.

use serde::{Deserialize, Serialize};

use crate::error::{SldError, SldResult};
use crate::ports::PortTemplate;
use crate::units::GridSize;
use crate::{Symbol, SymbolKind};

/// Size used when neither the symbol nor its apparatus template defines one.
pub const DEFAULT_SYMBOL_SIZE: Size = Size {
    width: 40.0,
    height: 40.0,
};

/// Coordinates closer than this are treated as equal.
pub const EPSILON: f64 = 1e-9;

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn approx_eq(&self, other: &Position) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned rectangle; `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn centered(center: Position, size: Size) -> Self {
        Self {
            x: center.x - size.width / 2.0,
            y: center.y - size.height / 2.0,
            width: size.width,
            height: size.height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Rectangle intersection with inclusive bounds: touching edges overlap.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }
}

/// Quarter-turn rotation of a symbol, clockwise in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Accepts any multiple of 90, normalizing into `0..360`.
    pub fn from_degrees(degrees: i32) -> SldResult<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            _ => Err(SldError::Parse(format!(
                "rotation must be a multiple of 90 degrees, got {degrees}"
            ))),
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Number of clockwise quarter turns.
    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    /// Rotate a point in the normalized 100x100 template space.
    pub fn apply_normalized(self, (x, y): (f64, f64)) -> (f64, f64) {
        match self {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (100.0 - y, x),
            Rotation::Deg180 => (100.0 - x, 100.0 - y),
            Rotation::Deg270 => (y, 100.0 - x),
        }
    }
}

impl TryFrom<i32> for Rotation {
    type Error = SldError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        Rotation::from_degrees(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Round each coordinate to the nearest grid multiple, halves away from zero.
pub fn snap_to_grid(position: Position, grid: GridSize) -> Position {
    let g = grid.value();
    Position::new(snap_value(position.x, g), snap_value(position.y, g))
}

fn snap_value(value: f64, grid: f64) -> f64 {
    let snapped = (value / grid).round() * grid;
    // Avoid emitting -0.0 for small negative inputs
    if snapped == 0.0 {
        0.0
    } else {
        snapped
    }
}

pub fn is_on_grid(position: Position, grid: GridSize) -> bool {
    snap_to_grid(position, grid).approx_eq(&position)
}

/// Physical drawing size of a symbol.
///
/// Precedence: a bus's explicit width/height, the symbol's explicit size, the
/// apparatus template default, then [`DEFAULT_SYMBOL_SIZE`].
pub fn symbol_size(symbol: &Symbol) -> Size {
    if let SymbolKind::Bus(bus) = &symbol.kind {
        let explicit = Size::new(bus.width, bus.height);
        if explicit.is_positive() {
            return explicit;
        }
    }
    if let Some(size) = symbol.size.filter(Size::is_positive) {
        return size;
    }
    PortTemplate::for_symbol(symbol)
        .default_size()
        .unwrap_or(DEFAULT_SYMBOL_SIZE)
}

/// Bounding box centered on the symbol's position.
pub fn bounding_box(symbol: &Symbol) -> BoundingBox {
    BoundingBox::centered(symbol.position, symbol_size(symbol))
}
