//! Node-level topology of a consolidated graph.
//!
//! Port-level links are collapsed to undirected node-to-node edges. The
//! barycenter sweeps only care whether two nodes are connected, not through
//! how many links or in which direction.

use crate::core::types::NodeId;
use crate::graph::structure::AudioGraph;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Bfs;
use std::collections::HashSet;

/// Undirected node adjacency.
///
/// Backed by a `GraphMap`, whose neighbour iteration follows edge insertion
/// order, so every traversal is deterministic for a given graph.
#[derive(Debug, Clone)]
pub struct NodeAdjacency {
    graph: UnGraphMap<NodeId, ()>,
}

impl NodeAdjacency {
    /// Build the adjacency of `graph`, discarding self-edges.
    pub fn from_graph(graph: &AudioGraph) -> Self {
        let mut adjacency = UnGraphMap::new();
        for id in graph.node_ids() {
            adjacency.add_node(id);
        }
        for link in graph.links() {
            let (a, b) = (link.output_node_id, link.input_node_id);
            if a == b || !adjacency.contains_node(a) || !adjacency.contains_node(b) {
                continue;
            }
            adjacency.add_edge(a, b, ());
        }
        Self { graph: adjacency }
    }

    /// Nodes connected to `id` by at least one link.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.neighbors(id)
    }

    /// Whether a link joins `a` and `b` in either direction.
    pub fn are_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.graph.contains_edge(a, b)
    }

    /// Number of distinct neighbours of `id`.
    pub fn degree(&self, id: NodeId) -> usize {
        self.graph.neighbors(id).count()
    }

    /// Number of adjacent node pairs.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes without any neighbour.
    pub fn isolated_nodes(&self) -> Vec<NodeId> {
        self.graph
            .nodes()
            .filter(|&id| self.degree(id) == 0)
            .collect()
    }

    /// Connected components, each listed in discovery order.
    pub fn components(&self) -> Vec<Vec<NodeId>> {
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut components = Vec::new();

        for start in self.graph.nodes() {
            if visited.contains(&start) {
                continue;
            }
            let mut component = Vec::new();
            let mut bfs = Bfs::new(&self.graph, start);
            while let Some(id) = bfs.next(&self.graph) {
                visited.insert(id);
                component.push(id);
            }
            components.push(component);
        }

        components
    }
}
