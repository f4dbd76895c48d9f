//! Links between ports.

use crate::core::types::{LinkState, NodeId, PortId};
use serde::{Deserialize, Serialize};

/// A link from one node's output port to another node's input port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Server-side link id, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Node owning the output port.
    pub output_node_id: NodeId,
    /// Port audio leaves through.
    pub output_port_id: PortId,
    /// Node owning the input port.
    pub input_node_id: NodeId,
    /// Port audio enters through.
    pub input_port_id: PortId,
    /// Negotiation state. Missing states read as `unknown`.
    #[serde(default)]
    pub state: LinkState,
}

impl Link {
    /// Create a new link in the `active` state.
    pub fn new(
        output_node_id: NodeId,
        output_port_id: PortId,
        input_node_id: NodeId,
        input_port_id: PortId,
    ) -> Self {
        Self {
            id: None,
            output_node_id,
            output_port_id,
            input_node_id,
            input_port_id,
            state: LinkState::Active,
        }
    }

    /// Set the link state.
    pub fn with_state(mut self, state: LinkState) -> Self {
        self.state = state;
        self
    }

    /// The `(output, input)` port pair that identifies a link.
    pub fn port_pair(&self) -> (PortId, PortId) {
        (self.output_port_id, self.input_port_id)
    }

    /// Whether both ends are on the same node.
    pub fn is_self_link(&self) -> bool {
        self.output_node_id == self.input_node_id
    }

    /// Whether either endpoint is on `node_id`.
    pub fn touches(&self, node_id: NodeId) -> bool {
        self.output_node_id == node_id || self.input_node_id == node_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link() {
        let link = Link::new(NodeId(1), PortId(10), NodeId(2), PortId(20));

        assert_eq!(link.port_pair(), (PortId(10), PortId(20)));
        assert!(!link.is_self_link());
        assert!(link.touches(NodeId(2)));
        assert!(!link.touches(NodeId(3)));
    }

    #[test]
    fn test_link_json() {
        let link: Link = serde_json::from_str(
            r#"{"outputNodeId": 1, "outputPortId": 10, "inputNodeId": 1, "inputPortId": 11, "state": "paused"}"#,
        )
        .unwrap();
        assert!(link.is_self_link());
        assert_eq!(link.state, LinkState::Paused);
        assert_eq!(link.id, None);
    }
}
