//! Topology graph over diagram symbols.
//!
//! Every symbol becomes a node of an undirected `petgraph` graph whose node
//! weight is the symbol's position in the input slice. Edges come from
//! topology references: a branch or switch is linked to each endpoint it
//! resolves, a source or load to the node it is attached to. Unresolvable
//! references add no edge.

use crate::{ElementIndex, Symbol};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::VecDeque;

/// Undirected symbol graph. Node `i` is `symbols[i]`.
pub struct TopologyGraph<'a> {
    symbols: &'a [Symbol],
    graph: UnGraph<usize, ()>,
}

impl<'a> TopologyGraph<'a> {
    pub fn build(symbols: &'a [Symbol]) -> Self {
        let index = ElementIndex::new(symbols);
        let mut graph = UnGraph::with_capacity(symbols.len(), symbols.len() * 2);
        for idx in 0..symbols.len() {
            graph.add_node(idx);
        }
        for (idx, symbol) in symbols.iter().enumerate() {
            for target in symbol.referenced_ids() {
                if let Some(target_idx) = index.resolve_index(target) {
                    graph.add_edge(NodeIndex::new(idx), NodeIndex::new(target_idx), ());
                }
            }
        }
        tracing::trace!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built topology graph"
        );
        Self { symbols, graph }
    }

    pub fn symbols(&self) -> &'a [Symbol] {
        self.symbols
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of references touching `symbols[idx]`, in either direction.
    pub fn degree(&self, idx: usize) -> usize {
        self.graph.edges(NodeIndex::new(idx)).count()
    }

    /// Breadth-first search seeded from every source symbol.
    ///
    /// Returns one flag per symbol, true when a source reaches it.
    pub fn reachable_from_sources(&self) -> Vec<bool> {
        let seeds = self
            .symbols
            .iter()
            .enumerate()
            .filter(|(_, symbol)| symbol.is_source())
            .map(|(idx, _)| idx);
        self.reachable_from(seeds)
    }

    pub fn reachable_from(&self, seeds: impl IntoIterator<Item = usize>) -> Vec<bool> {
        let mut visited = vec![false; self.symbols.len()];
        let mut queue: VecDeque<NodeIndex> = seeds.into_iter().map(NodeIndex::new).collect();
        while let Some(node) = queue.pop_front() {
            if visited[node.index()] {
                continue;
            }
            visited[node.index()] = true;
            for neighbor in self.graph.neighbors(node) {
                if !visited[neighbor.index()] {
                    queue.push_back(neighbor);
                }
            }
        }
        visited
    }
}
