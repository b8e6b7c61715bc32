//! # sld-viz: diagram layout and connection routing
//!
//! - [`layout`] - align, distribute and snap symbol positions
//! - [`routing`] - derive connections and route them orthogonally on the grid
//!
//! Both modules are pure functions over a symbol snapshot. They return new
//! positions or connections and never mutate their input.

pub mod layout;
pub mod routing;

pub use layout::{
    align_symbols, distribute_symbols, snap_symbols, AlignDirection, DistributeDirection,
};
pub use routing::{route_connections, select_best_ports, Connection, ConnectionType, RouterConfig};
