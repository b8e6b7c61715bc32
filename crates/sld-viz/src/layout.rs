use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sld_core::geometry::{is_on_grid, symbol_size};
use sld_core::{snap_to_grid, GridSize, Position, SldError, Symbol};

/// Edge or center line that [`align_symbols`] matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignDirection {
    Left,
    Right,
    Top,
    Bottom,
    CenterHorizontal,
    CenterVertical,
}

impl FromStr for AlignDirection {
    type Err = SldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(AlignDirection::Left),
            "right" => Ok(AlignDirection::Right),
            "top" => Ok(AlignDirection::Top),
            "bottom" => Ok(AlignDirection::Bottom),
            "center-horizontal" => Ok(AlignDirection::CenterHorizontal),
            "center-vertical" => Ok(AlignDirection::CenterVertical),
            other => Err(SldError::Parse(format!("unknown align direction '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributeDirection {
    Horizontal,
    Vertical,
}

impl FromStr for DistributeDirection {
    type Err = SldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "horizontal" => Ok(DistributeDirection::Horizontal),
            "vertical" => Ok(DistributeDirection::Vertical),
            other => Err(SldError::Parse(format!(
                "unknown distribute direction '{other}'"
            ))),
        }
    }
}

/// Leading coordinate and extent of a symbol along one axis.
///
/// Layout transforms treat the stored position as the leading (left/top)
/// coordinate with the drawing size extending from it.
fn span(symbol: &Symbol, horizontal: bool) -> (f64, f64) {
    let size = symbol_size(symbol);
    if horizontal {
        (symbol.position.x, size.width)
    } else {
        (symbol.position.y, size.height)
    }
}

fn with_leading(position: Position, horizontal: bool, value: f64) -> Position {
    if horizontal {
        Position::new(value, position.y)
    } else {
        Position::new(position.x, value)
    }
}

/// Align every symbol to the anchor, the symbol with the smallest id.
///
/// Only the aligned axis changes. Every input symbol appears in the result,
/// the anchor included.
pub fn align_symbols(symbols: &[Symbol], direction: AlignDirection) -> BTreeMap<String, Position> {
    let Some(anchor) = symbols.iter().min_by(|a, b| a.id.cmp(&b.id)) else {
        return BTreeMap::new();
    };

    let horizontal = matches!(
        direction,
        AlignDirection::Left | AlignDirection::Right | AlignDirection::CenterHorizontal
    );
    let (anchor_lead, anchor_size) = span(anchor, horizontal);

    let aligned: BTreeMap<String, Position> = symbols
        .iter()
        .map(|symbol| {
            let (_, size) = span(symbol, horizontal);
            let target = match direction {
                AlignDirection::Left | AlignDirection::Top => anchor_lead,
                AlignDirection::Right | AlignDirection::Bottom => anchor_lead + anchor_size - size,
                AlignDirection::CenterHorizontal | AlignDirection::CenterVertical => {
                    anchor_lead + anchor_size / 2.0 - size / 2.0
                }
            };
            (
                symbol.id.clone(),
                with_leading(symbol.position, horizontal, target),
            )
        })
        .collect();

    tracing::debug!(count = aligned.len(), anchor = %anchor.id, ?direction, "aligned symbols");
    aligned
}

/// Space symbols so the gaps between consecutive boxes are equal.
///
/// Needs at least three symbols; otherwise the result is empty. The outermost
/// symbols keep their positions.
pub fn distribute_symbols(
    symbols: &[Symbol],
    direction: DistributeDirection,
) -> BTreeMap<String, Position> {
    if symbols.len() < 3 {
        return BTreeMap::new();
    }
    let horizontal = direction == DistributeDirection::Horizontal;

    let mut ordered: Vec<&Symbol> = symbols.iter().collect();
    ordered.sort_by(|a, b| {
        span(a, horizontal)
            .0
            .total_cmp(&span(b, horizontal).0)
            .then_with(|| a.id.cmp(&b.id))
    });

    let count = ordered.len();
    let (first_lead, first_size) = span(ordered[0], horizontal);
    let (last_lead, _) = span(ordered[count - 1], horizontal);
    let middle = &ordered[1..count - 1];

    let extent = last_lead - (first_lead + first_size);
    let middle_sizes: f64 = middle.iter().map(|s| span(s, horizontal).1).sum();
    let spacing = (extent - middle_sizes) / (count - 1) as f64;

    let mut distributed = BTreeMap::new();
    distributed.insert(ordered[0].id.clone(), ordered[0].position);
    distributed.insert(ordered[count - 1].id.clone(), ordered[count - 1].position);

    let mut cursor = first_lead + first_size + spacing;
    for symbol in middle {
        distributed.insert(
            symbol.id.clone(),
            with_leading(symbol.position, horizontal, cursor),
        );
        cursor += span(symbol, horizontal).1 + spacing;
    }

    tracing::debug!(count, spacing, ?direction, "distributed symbols");
    distributed
}

/// Snapped targets for every symbol that is not already on the grid.
pub fn snap_symbols(symbols: &[Symbol], grid: GridSize) -> BTreeMap<String, Position> {
    symbols
        .iter()
        .filter(|symbol| !is_on_grid(symbol.position, grid))
        .map(|symbol| (symbol.id.clone(), snap_to_grid(symbol.position, grid)))
        .collect()
}
