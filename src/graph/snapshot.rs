//! Raw graph snapshots as delivered by the graph endpoint.

use crate::core::node::Node;
use crate::core::port::Port;
use crate::graph::connection::Link;
use serde::{Deserialize, Serialize};

/// One snapshot of the audio server's graph.
///
/// The order of the three collections carries no meaning, except that the
/// order of ports is taken as their attachment order on each node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// All nodes.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// All ports, in attachment order.
    #[serde(default)]
    pub ports: Vec<Port>,
    /// All links.
    #[serde(default)]
    pub links: Vec<Link>,
}

impl GraphSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node.
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add a port.
    pub fn with_port(mut self, port: Port) -> Self {
        self.ports.push(port);
        self
    }

    /// Add a link.
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Deserialize from a JSON byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// True when there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
