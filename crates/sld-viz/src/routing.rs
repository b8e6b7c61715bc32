//! Connection derivation and orthogonal routing.
//!
//! Each topology-bearing symbol yields zero, one or two logical connections:
//! - line/transformer branches: one connection between their two nodes
//! - switches: two connections, `from node -> switch` and `switch -> to node`
//! - sources/loads: one connection from the symbol to its node
//!
//! Paths start and end on resolved ports, use only horizontal and vertical
//! segments, and have every point on the grid. Unresolvable references are
//! skipped silently; reporting them is the validator's job.

use serde::{Deserialize, Serialize};
use sld_core::geometry::EPSILON;
use sld_core::{
    port_facing, snap_to_grid, ElementIndex, GridSize, PortName, Position, References, Symbol,
    SymbolKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Branch,
    Switch,
    Source,
    Load,
}

/// A routed connection between two symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    /// Element id of the owning symbol (its symbol id when it has none)
    pub element_id: String,
    pub connection_type: ConnectionType,
    pub from_symbol_id: String,
    pub to_symbol_id: String,
    pub from_port: PortName,
    pub to_port: PortName,
    pub in_service: bool,
    /// At least two points, all on the grid, consecutive pairs axis-aligned
    pub points: Vec<Position>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub grid_size: GridSize,
}

/// Pick the canvas sides to connect from `from` to `to`.
///
/// Mostly-vertical pairs connect bottom/top, everything else right/left,
/// oriented by the sign of the delta. Ties favor horizontal.
pub fn select_best_ports(from: &Symbol, to: &Symbol) -> (PortName, PortName) {
    let dx = to.position.x - from.position.x;
    let dy = to.position.y - from.position.y;

    if dy.abs() > dx.abs() {
        if dy > 0.0 {
            (PortName::Bottom, PortName::Top)
        } else {
            (PortName::Top, PortName::Bottom)
        }
    } else if dx > 0.0 {
        (PortName::Right, PortName::Left)
    } else {
        (PortName::Left, PortName::Right)
    }
}

/// Orthogonal path between two points with a single mid-span jog.
///
/// Vertical routes bend at the snapped mid-y, horizontal ones at the snapped
/// mid-x. Endpoints are snapped too, so every point lands on the grid.
pub fn orthogonal_path(
    start: Position,
    end: Position,
    vertical: bool,
    grid: GridSize,
) -> Vec<Position> {
    let start = snap_to_grid(start, grid);
    let end = snap_to_grid(end, grid);

    let points = if vertical {
        let mid_y = snap_to_grid(Position::new(start.x, (start.y + end.y) / 2.0), grid).y;
        vec![
            start,
            Position::new(start.x, mid_y),
            Position::new(end.x, mid_y),
            end,
        ]
    } else {
        let mid_x = snap_to_grid(Position::new((start.x + end.x) / 2.0, start.y), grid).x;
        vec![
            start,
            Position::new(mid_x, start.y),
            Position::new(mid_x, end.y),
            end,
        ]
    };
    simplify_path(points)
}

fn simplify_path(points: Vec<Position>) -> Vec<Position> {
    let first = points[0];
    let last = points[points.len() - 1];

    let mut cleaned: Vec<Position> = Vec::with_capacity(points.len());
    for point in points {
        if cleaned.last().map_or(false, |prev| prev.approx_eq(&point)) {
            continue;
        }
        cleaned.push(point);
    }

    let mut simplified: Vec<Position> = Vec::with_capacity(cleaned.len());
    for point in cleaned {
        while simplified.len() >= 2 {
            let a = simplified[simplified.len() - 2];
            let b = simplified[simplified.len() - 1];
            let collinear = ((a.x - b.x).abs() < EPSILON && (b.x - point.x).abs() < EPSILON)
                || ((a.y - b.y).abs() < EPSILON && (b.y - point.y).abs() < EPSILON);
            if collinear {
                simplified.pop();
            } else {
                break;
            }
        }
        simplified.push(point);
    }

    if simplified.len() < 2 {
        return vec![first, last];
    }
    simplified
}

struct Router<'a> {
    index: ElementIndex<'a>,
    grid: GridSize,
    connections: Vec<Connection>,
}

impl<'a> Router<'a> {
    fn connect(
        &mut self,
        id: String,
        owner: &Symbol,
        connection_type: ConnectionType,
        from: &Symbol,
        to: &Symbol,
    ) {
        let (from_side, to_side) = select_best_ports(from, to);
        let start = port_facing(from, from_side);
        let end = port_facing(to, to_side);
        let vertical = matches!(from_side, PortName::Top | PortName::Bottom);

        self.connections.push(Connection {
            id,
            element_id: owner.element_or_id().to_string(),
            connection_type,
            from_symbol_id: from.id.clone(),
            to_symbol_id: to.id.clone(),
            from_port: start.port,
            to_port: end.port,
            in_service: owner.in_service,
            points: orthogonal_path(start.position, end.position, vertical, self.grid),
        });
    }

    fn resolve(&self, element_id: Option<&str>) -> Option<&'a Symbol> {
        element_id.and_then(|id| self.index.resolve(id))
    }

    fn route_symbol(&mut self, symbol: &Symbol) {
        match (&symbol.kind, symbol.references()) {
            (SymbolKind::Switch(_), References::Pair { from, to }) => {
                if let Some(node) = self.resolve(from) {
                    self.connect(
                        format!("{}:from", symbol.id),
                        symbol,
                        ConnectionType::Switch,
                        node,
                        symbol,
                    );
                }
                if let Some(node) = self.resolve(to) {
                    self.connect(
                        format!("{}:to", symbol.id),
                        symbol,
                        ConnectionType::Switch,
                        symbol,
                        node,
                    );
                }
            }
            (_, References::Pair { from, to }) => {
                if let (Some(from_node), Some(to_node)) = (self.resolve(from), self.resolve(to)) {
                    self.connect(
                        symbol.id.clone(),
                        symbol,
                        ConnectionType::Branch,
                        from_node,
                        to_node,
                    );
                }
            }
            (kind, References::Single(node)) => {
                let connection_type = match kind {
                    SymbolKind::Load(_) => ConnectionType::Load,
                    _ => ConnectionType::Source,
                };
                if let Some(node) = self.resolve(node) {
                    self.connect(symbol.id.clone(), symbol, connection_type, symbol, node);
                }
            }
            (_, References::None) => {}
        }
    }
}

/// Derive and route every connection of the diagram, sorted by id.
pub fn route_connections(symbols: &[Symbol], config: &RouterConfig) -> Vec<Connection> {
    let mut router = Router {
        index: ElementIndex::new(symbols),
        grid: config.grid_size,
        connections: Vec::new(),
    };
    for symbol in symbols {
        router.route_symbol(symbol);
    }

    let mut connections = router.connections;
    connections.sort_by(|a, b| {
        a.id.cmp(&b.id)
            .then_with(|| a.from_symbol_id.cmp(&b.from_symbol_id))
            .then_with(|| a.to_symbol_id.cmp(&b.to_symbol_id))
    });
    tracing::debug!(
        symbols = symbols.len(),
        connections = connections.len(),
        grid = %config.grid_size,
        "routed connections"
    );
    connections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus(id: &str, element: &str, x: f64, y: f64) -> Symbol {
        Symbol::new(id, SymbolKind::bus(120.0, 10.0))
            .with_element(element)
            .at(x, y)
    }

    fn feeder() -> Vec<Symbol> {
        vec![
            Symbol::new("src", SymbolKind::source("B1"))
                .with_element("S1")
                .at(200.0, 20.0),
            bus("b1", "B1", 200.0, 100.0),
            Symbol::new("q1", SymbolKind::switch("B1", "B2"))
                .with_element("Q1")
                .at(200.0, 180.0),
            bus("b2", "B2", 200.0, 260.0),
            Symbol::new("l1", SymbolKind::line("B2", "B3"))
                .with_element("L1")
                .at(330.0, 300.0),
            bus("b3", "B3", 470.0, 345.0),
            Symbol::new("ld", SymbolKind::load("B3"))
                .with_element("LD1")
                .at(470.0, 433.0),
        ]
    }

    fn config() -> RouterConfig {
        RouterConfig::default()
    }

    #[test]
    fn test_empty_input_yields_no_connections() {
        assert!(route_connections(&[], &config()).is_empty());
    }

    #[test]
    fn test_derivation_and_ordering() {
        let connections = route_connections(&feeder(), &config());
        let ids: Vec<&str> = connections.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["l1", "ld", "q1:from", "q1:to", "src"]);

        let by_id = |id: &str| connections.iter().find(|c| c.id == id).unwrap();
        assert_eq!(by_id("l1").connection_type, ConnectionType::Branch);
        assert_eq!(by_id("l1").from_symbol_id, "b2");
        assert_eq!(by_id("l1").to_symbol_id, "b3");
        assert_eq!(by_id("q1:from").from_symbol_id, "b1");
        assert_eq!(by_id("q1:from").to_symbol_id, "q1");
        assert_eq!(by_id("q1:to").from_symbol_id, "q1");
        assert_eq!(by_id("q1:to").to_symbol_id, "b2");
        assert_eq!(by_id("ld").connection_type, ConnectionType::Load);
        assert_eq!(by_id("src").connection_type, ConnectionType::Source);
        assert_eq!(by_id("src").element_id, "S1");
    }

    #[test]
    fn test_routing_is_deterministic() {
        let symbols = feeder();
        let first = route_connections(&symbols, &config());
        let second = route_connections(&symbols, &config());
        assert_eq!(first, second);

        let mut reversed = symbols.clone();
        reversed.reverse();
        assert_eq!(route_connections(&reversed, &config()), first);
    }

    #[test]
    fn test_paths_are_orthogonal_and_on_grid() {
        for grid in [10.0, 20.0, 25.0] {
            let config = RouterConfig {
                grid_size: GridSize::new(grid).unwrap(),
            };
            for connection in route_connections(&feeder(), &config) {
                assert!(connection.points.len() >= 2);
                for point in &connection.points {
                    assert_eq!(point.x % grid, 0.0, "{} off grid", connection.id);
                    assert_eq!(point.y % grid, 0.0, "{} off grid", connection.id);
                }
                for pair in connection.points.windows(2) {
                    assert!(
                        pair[0].x == pair[1].x || pair[0].y == pair[1].y,
                        "{} has a diagonal segment",
                        connection.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_vertical_connection_uses_bottom_to_top() {
        let connections = route_connections(&feeder(), &config());
        let src = connections.iter().find(|c| c.id == "src").unwrap();
        // source above its bus: leave from the bottom, enter from the top
        assert_eq!(src.from_port, PortName::Bottom);
        assert_eq!(src.to_port, PortName::Top);
        assert_eq!(
            src.points,
            vec![Position::new(200.0, 40.0), Position::new(200.0, 100.0)]
        );
    }

    #[test]
    fn test_horizontal_connection_jogs_at_mid_x() {
        let symbols = vec![
            bus("a", "A", 100.0, 100.0),
            bus("b", "B", 400.0, 180.0),
            Symbol::new("l", SymbolKind::line("A", "B")).with_element("L"),
        ];
        let connections = route_connections(&symbols, &config());
        assert_eq!(
            connections[0].points,
            vec![
                Position::new(160.0, 100.0),
                Position::new(260.0, 100.0),
                Position::new(260.0, 180.0),
                Position::new(340.0, 180.0),
            ]
        );
    }

    #[test]
    fn test_select_best_ports_is_directional_only() {
        let origin = bus("a", "A", 0.0, 0.0);
        let cases = [
            ((100.0, 10.0), (PortName::Right, PortName::Left)),
            ((-100.0, 10.0), (PortName::Left, PortName::Right)),
            ((10.0, 100.0), (PortName::Bottom, PortName::Top)),
            ((10.0, -100.0), (PortName::Top, PortName::Bottom)),
            ((50.0, 50.0), (PortName::Right, PortName::Left)),
        ];
        for ((x, y), expected) in cases {
            let other = Symbol::new("o", SymbolKind::load("A")).at(x, y);
            assert_eq!(select_best_ports(&origin, &other), expected);
        }
    }

    #[test]
    fn test_dangling_sides_are_skipped() {
        let symbols = vec![
            bus("b1", "B1", 0.0, 0.0),
            Symbol::new("q", SymbolKind::switch("B1", "NOPE"))
                .with_element("Q")
                .at(0.0, 100.0),
            Symbol::new("l", SymbolKind::line("B1", "NOPE")).with_element("L"),
            Symbol::new("ld", SymbolKind::load("NOPE")).with_element("LD"),
        ];
        let connections = route_connections(&symbols, &config());
        let ids: Vec<&str> = connections.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["q:from"]);
    }

    #[test]
    fn test_rotated_symbol_uses_port_facing_the_neighbor() {
        let symbols = vec![
            bus("b1", "B1", 100.0, 100.0),
            Symbol::new("q", SymbolKind::switch("B1", "B2"))
                .with_element("Q")
                .rotated(sld_core::Rotation::Deg90)
                .at(300.0, 100.0),
        ];
        let connections = route_connections(&symbols, &config());
        let from = &connections[0];
        // switch sits to the right; its canvas-left port is the local bottom at 90°
        assert_eq!(from.to_port, PortName::Bottom);
        // unswapped 20x40 box: the port lands at x=290 and snaps to 300
        assert_eq!(
            from.points,
            vec![Position::new(160.0, 100.0), Position::new(300.0, 100.0)]
        );
    }

    #[test]
    fn test_coincident_ports_keep_two_points() {
        let path = orthogonal_path(
            Position::new(41.0, 39.0),
            Position::new(39.0, 41.0),
            false,
            GridSize::default(),
        );
        assert_eq!(path, vec![Position::new(40.0, 40.0), Position::new(40.0, 40.0)]);
    }

    #[test]
    fn test_connection_serialization() {
        let connections = route_connections(&feeder(), &config());
        let json = serde_json::to_string(&connections[0]).unwrap();
        assert!(json.contains("\"connectionType\":\"branch\""));
        assert!(json.contains("\"fromPort\""));
    }
}
