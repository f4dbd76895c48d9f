//! The consolidated audio graph.
//!
//! An [`AudioGraph`] is the logical view of one snapshot: implementation-level
//! node pairs have been merged and the port/link collections sanitised. It is
//! only produced by the consolidator and is immutable afterwards; a refresh
//! builds a new one rather than patching the old.

use crate::core::error::{GraphError, GraphResult};
use crate::core::node::Node;
use crate::core::port::{Port, PortDirection};
use crate::core::types::{NodeId, PortId};
use crate::graph::connection::Link;
use crate::graph::snapshot::GraphSnapshot;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Number of input and output ports on a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortCounts {
    /// Input ports.
    pub inputs: usize,
    /// Output ports.
    pub outputs: usize,
}

/// The consolidated graph.
///
/// Uses IndexMap to keep snapshot order for consistent iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioGraph {
    nodes: IndexMap<NodeId, Node>,
    ports: IndexMap<PortId, Port>,
    links: Vec<Link>,
}

impl AudioGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a graph from already-sanitised parts.
    pub(crate) fn from_parts(nodes: Vec<Node>, ports: Vec<Port>, links: Vec<Link>) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id, n)).collect(),
            ports: ports.into_iter().map(|p| (p.id, p)).collect(),
            links,
        }
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Get a reference to a node.
    pub fn get_node(&self, id: NodeId) -> GraphResult<&Node> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Check if a node exists.
    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Find a node by name.
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.values().find(|n| n.name == name)
    }

    /// Get all nodes, in snapshot order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True when the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========================================================================
    // Ports
    // ========================================================================

    /// Get a reference to a port.
    pub fn get_port(&self, id: PortId) -> GraphResult<&Port> {
        self.ports.get(&id).ok_or(GraphError::PortNotFound(id))
    }

    /// Get all ports, in attachment order.
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.values()
    }

    /// Ports of one node, in attachment order.
    pub fn ports_of(&self, node_id: NodeId) -> impl Iterator<Item = &Port> {
        self.ports.values().filter(move |p| p.node_id == node_id)
    }

    /// Ports of one node in one direction, in attachment order.
    pub fn ports_of_direction(
        &self,
        node_id: NodeId,
        direction: PortDirection,
    ) -> impl Iterator<Item = &Port> {
        self.ports_of(node_id).filter(move |p| p.direction == direction)
    }

    /// Number of ports.
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    /// Input/output port counts for every node that has ports.
    pub fn port_counts(&self) -> HashMap<NodeId, PortCounts> {
        let mut counts: HashMap<NodeId, PortCounts> = HashMap::new();
        for port in self.ports.values() {
            let entry = counts.entry(port.node_id).or_default();
            match port.direction {
                PortDirection::Input => entry.inputs += 1,
                PortDirection::Output => entry.outputs += 1,
            }
        }
        counts
    }

    // ========================================================================
    // Links
    // ========================================================================

    /// Get all links.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Links leaving a node.
    pub fn links_from(&self, node_id: NodeId) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |l| l.output_node_id == node_id)
    }

    /// Links entering a node.
    pub fn links_to(&self, node_id: NodeId) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |l| l.input_node_id == node_id)
    }

    /// Number of links.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Convert back into a snapshot, e.g. to serialise the logical graph.
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.values().cloned().collect(),
            ports: self.ports.values().cloned().collect(),
            links: self.links.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::media_class;

    fn sample() -> AudioGraph {
        AudioGraph::from_parts(
            vec![
                Node::new(NodeId(1), "mic", media_class::AUDIO_SOURCE),
                Node::new(NodeId(2), "alsa_output.usb", media_class::AUDIO_SINK),
            ],
            vec![
                Port::new(PortId(10), NodeId(1), PortDirection::Output, "capture_FL"),
                Port::new(PortId(11), NodeId(1), PortDirection::Output, "capture_FR"),
                Port::new(PortId(20), NodeId(2), PortDirection::Input, "playback_FL"),
            ],
            vec![Link::new(NodeId(1), PortId(10), NodeId(2), PortId(20))],
        )
    }

    #[test]
    fn test_lookup() {
        let graph = sample();
        assert_eq!(graph.node_count(), 2);
        assert!(graph.has_node(NodeId(1)));
        assert_eq!(graph.node_by_name("mic").map(|n| n.id), Some(NodeId(1)));
        assert_eq!(graph.get_node(NodeId(9)), Err(GraphError::NodeNotFound(NodeId(9))));
        assert_eq!(graph.get_port(PortId(99)).unwrap_err(), GraphError::PortNotFound(PortId(99)));
    }

    #[test]
    fn test_port_counts_and_order() {
        let graph = sample();
        let counts = graph.port_counts();
        assert_eq!(counts[&NodeId(1)], PortCounts { inputs: 0, outputs: 2 });
        assert_eq!(counts[&NodeId(2)], PortCounts { inputs: 1, outputs: 0 });

        let names: Vec<_> = graph
            .ports_of_direction(NodeId(1), PortDirection::Output)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["capture_FL", "capture_FR"]);
    }

    #[test]
    fn test_links_by_node() {
        let graph = sample();
        assert_eq!(graph.links_from(NodeId(1)).count(), 1);
        assert_eq!(graph.links_to(NodeId(1)).count(), 0);
        assert_eq!(graph.links_to(NodeId(2)).count(), 1);
        assert_eq!(graph.to_snapshot().links.len(), 1);
    }
}
