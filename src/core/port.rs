//! Ports: the per-channel endpoints of a node.
//!
//! A port belongs to exactly one node through `node_id`. The consolidator may
//! rewrite that back-reference when it merges nodes, but it never reorders the
//! port list, so the attachment order seen here is the slot order used when
//! anchoring ports on screen.

use crate::core::types::{NodeId, PortId};
use crate::core::naming::MONITOR_PORT_PREFIX;
use serde::{Deserialize, Serialize};

/// Direction of a port (input or output).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    /// Receives audio.
    Input,
    /// Produces audio.
    Output,
}

impl PortDirection {
    /// Whether this is an input port direction.
    pub fn is_input(&self) -> bool {
        matches!(self, PortDirection::Input)
    }
}

/// A port as reported by the audio server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    /// Unique identifier within the snapshot.
    pub id: PortId,
    /// Owning node.
    pub node_id: NodeId,
    /// Input or output.
    pub direction: PortDirection,
    /// Port name, e.g. `playback_FL`.
    pub name: String,
    /// Semantic channel, e.g. `FL`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl Port {
    /// Create a port without a channel label.
    pub fn new(
        id: PortId,
        node_id: NodeId,
        direction: PortDirection,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            node_id,
            direction,
            name: name.into(),
            channel: None,
        }
    }

    /// Set the channel label.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Channel label, or `None` when absent or empty.
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref().filter(|c| !c.is_empty())
    }

    /// Key used to detect duplicate ports of one node: the channel when known,
    /// the port name otherwise.
    pub fn channel_key(&self) -> &str {
        self.channel().unwrap_or(&self.name)
    }

    /// Whether this port mirrors a sink's input.
    pub fn is_monitor(&self) -> bool {
        self.name.starts_with(MONITOR_PORT_PREFIX)
    }

    /// Short label drawn next to the port dot.
    pub fn label(&self) -> String {
        if let Some(channel) = self.channel() {
            return channel.to_string();
        }
        self.name
            .replacen("playback_", "", 1)
            .replacen("output_", "", 1)
            .replacen("input_", "", 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_label() {
        let port = Port::new(PortId(1), NodeId(1), PortDirection::Input, "playback_FL");
        assert_eq!(port.label(), "FL");

        let port = port.with_channel("RL");
        assert_eq!(port.label(), "RL");

        let port = Port::new(PortId(2), NodeId(1), PortDirection::Output, "capture_1");
        assert_eq!(port.label(), "capture_1");
    }

    #[test]
    fn test_channel_key_falls_back_to_name() {
        let port = Port::new(PortId(1), NodeId(1), PortDirection::Output, "output_AUX0");
        assert_eq!(port.channel_key(), "output_AUX0");
        assert_eq!(port.with_channel("AUX0").channel_key(), "AUX0");
    }

    #[test]
    fn test_empty_channel_is_absent() {
        let port = Port::new(PortId(1), NodeId(1), PortDirection::Output, "capture_AUX0").with_channel("");
        assert_eq!(port.channel(), None);
        assert_eq!(port.channel_key(), "capture_AUX0");
        assert_eq!(port.label(), "capture_AUX0");

        let port = Port::new(PortId(2), NodeId(1), PortDirection::Input, "playback_AUX1").with_channel("");
        assert_eq!(port.label(), "AUX1");
    }

    #[test]
    fn test_port_json() {
        let port: Port = serde_json::from_str(
            r#"{"id": 40, "nodeId": 7, "direction": "output", "name": "monitor_FL", "channel": "FL"}"#,
        )
        .unwrap();
        assert_eq!(port.node_id, NodeId(7));
        assert!(port.is_monitor());
        assert!(!port.direction.is_input());
    }
}
