//! Individual validation stages.
//!
//! Each stage checks one group of graph invariants.

use crate::core::error::{ValidationError, ValidationWarning};
use crate::core::port::PortDirection;
use crate::core::types::{NodeId, PortId};
use crate::graph::structure::AudioGraph;
use crate::graph::topology::NodeAdjacency;
use std::collections::HashSet;

/// Trait for validation stages.
pub trait ValidationStage: Send + Sync {
    /// Name of this validation stage.
    fn name(&self) -> &str;

    /// Validate the graph.
    ///
    /// Returns Ok with warnings, or Err with errors.
    fn validate(&self, graph: &AudioGraph) -> Result<Vec<ValidationWarning>, Vec<ValidationError>>;
}

fn into_result(errors: Vec<ValidationError>) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(Vec::new())
    } else {
        Err(errors)
    }
}

/// Referential integrity of nodes and ports.
///
/// Verifies:
/// - Every port's owner exists
/// - Node names are unique
pub struct ReferentialIntegrity;

impl ValidationStage for ReferentialIntegrity {
    fn name(&self) -> &str {
        "Referential Integrity"
    }

    fn validate(&self, graph: &AudioGraph) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        let mut errors = Vec::new();

        for port in graph.ports() {
            if !graph.has_node(port.node_id) {
                errors.push(ValidationError::OrphanPort {
                    port: port.id,
                    node_id: port.node_id,
                });
            }
        }

        let mut names: HashSet<&str> = HashSet::new();
        for node in graph.nodes() {
            if !names.insert(node.name.as_str()) {
                errors.push(ValidationError::DuplicateNodeName(node.name.clone()));
            }
        }

        into_result(errors)
    }
}

/// Link integrity.
///
/// Verifies:
/// - Both ports of every link exist
/// - Link endpoints are the owners of its ports
/// - No link joins a node to itself
/// - No two links share a port pair
pub struct LinkIntegrity;

impl ValidationStage for LinkIntegrity {
    fn name(&self) -> &str {
        "Link Integrity"
    }

    fn validate(&self, graph: &AudioGraph) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen: HashSet<(PortId, PortId)> = HashSet::new();

        for link in graph.links() {
            let (output, input) = link.port_pair();

            match (graph.get_port(output), graph.get_port(input)) {
                (Ok(out_port), Ok(in_port)) => {
                    if out_port.node_id != link.output_node_id || in_port.node_id != link.input_node_id {
                        errors.push(ValidationError::MismatchedLinkNodes { output, input });
                    }
                }
                _ => errors.push(ValidationError::DanglingLink { output, input }),
            }

            if link.is_self_link() {
                errors.push(ValidationError::SelfLink {
                    output,
                    input,
                    node_id: link.output_node_id,
                });
            }

            if !seen.insert((output, input)) {
                errors.push(ValidationError::DuplicateLink { output, input });
            }
        }

        into_result(errors)
    }
}

/// Port hygiene.
///
/// Verifies:
/// - No monitor ports remain
/// - No node has two output ports for one channel
pub struct PortHygiene;

impl ValidationStage for PortHygiene {
    fn name(&self) -> &str {
        "Port Hygiene"
    }

    fn validate(&self, graph: &AudioGraph) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut channels: HashSet<(NodeId, &str)> = HashSet::new();

        for port in graph.ports() {
            if port.is_monitor() {
                errors.push(ValidationError::MonitorPort(port.id));
            }
            if port.direction == PortDirection::Output
                && !channels.insert((port.node_id, port.channel_key()))
            {
                errors.push(ValidationError::DuplicateChannel {
                    node_id: port.node_id,
                    channel: port.channel_key().to_string(),
                });
            }
        }

        into_result(errors)
    }
}

/// Connectivity observations. Never fails.
///
/// Warns about:
/// - An empty graph
/// - Nodes without any link
/// - A graph split into several disconnected parts
pub struct Connectivity;

impl ValidationStage for Connectivity {
    fn name(&self) -> &str {
        "Connectivity"
    }

    fn validate(&self, graph: &AudioGraph) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        let mut warnings = Vec::new();

        if graph.is_empty() {
            warnings.push(ValidationWarning {
                message: "Graph is empty".to_string(),
                node_id: None,
            });
            return Ok(warnings);
        }

        let adjacency = NodeAdjacency::from_graph(graph);
        for id in adjacency.isolated_nodes() {
            let name = graph.get_node(id).map(|n| n.name.as_str()).unwrap_or("?");
            warnings.push(ValidationWarning {
                message: format!("Node '{}' has no links", name),
                node_id: Some(id),
            });
        }

        let linked_components = adjacency
            .components()
            .into_iter()
            .filter(|component| component.len() > 1)
            .count();
        if linked_components > 1 {
            warnings.push(ValidationWarning {
                message: format!("Graph has {} disconnected routing chains", linked_components),
                node_id: None,
            });
        }

        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::Node;
    use crate::core::port::Port;
    use crate::graph::connection::Link;

    fn node(id: u32, name: &str) -> Node {
        Node::new(NodeId(id), name, "")
    }

    fn out(id: u32, node: u32, name: &str) -> Port {
        Port::new(PortId(id), NodeId(node), PortDirection::Output, name)
    }

    fn inp(id: u32, node: u32, name: &str) -> Port {
        Port::new(PortId(id), NodeId(node), PortDirection::Input, name)
    }

    #[test]
    fn test_referential_integrity() {
        let graph = AudioGraph::from_parts(
            vec![node(1, "a"), node(2, "a")],
            vec![out(10, 1, "o"), out(11, 7, "o")],
            Vec::new(),
        );
        let errors = ReferentialIntegrity.validate(&graph).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::OrphanPort { port: PortId(11), node_id: NodeId(7) },
                ValidationError::DuplicateNodeName("a".to_string()),
            ]
        );
    }

    #[test]
    fn test_link_integrity() {
        let graph = AudioGraph::from_parts(
            vec![node(1, "a"), node(2, "b")],
            vec![out(10, 1, "o"), inp(20, 2, "i"), inp(21, 1, "i")],
            vec![
                Link::new(NodeId(1), PortId(10), NodeId(2), PortId(20)),
                Link::new(NodeId(1), PortId(10), NodeId(2), PortId(20)),
                Link::new(NodeId(1), PortId(10), NodeId(1), PortId(21)),
                Link::new(NodeId(2), PortId(10), NodeId(2), PortId(20)),
                Link::new(NodeId(1), PortId(10), NodeId(2), PortId(99)),
            ],
        );
        let errors = LinkIntegrity.validate(&graph).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateLink { output: PortId(10), input: PortId(20) }));
        assert!(errors.contains(&ValidationError::SelfLink { output: PortId(10), input: PortId(21), node_id: NodeId(1) }));
        assert!(errors.contains(&ValidationError::MismatchedLinkNodes { output: PortId(10), input: PortId(20) }));
        assert!(errors.contains(&ValidationError::DanglingLink { output: PortId(10), input: PortId(99) }));
    }

    #[test]
    fn test_port_hygiene() {
        let graph = AudioGraph::from_parts(
            vec![node(1, "a")],
            vec![
                out(10, 1, "monitor_FL"),
                out(11, 1, "output_FL").with_channel("FL"),
                out(12, 1, "capture_FL").with_channel("FL"),
                inp(13, 1, "playback_FL").with_channel("FL"),
            ],
            Vec::new(),
        );
        let errors = PortHygiene.validate(&graph).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::MonitorPort(PortId(10)),
                ValidationError::DuplicateChannel { node_id: NodeId(1), channel: "FL".to_string() },
            ]
        );
    }

    #[test]
    fn test_connectivity_warnings() {
        let empty = Connectivity.validate(&AudioGraph::new()).unwrap();
        assert_eq!(empty.len(), 1);

        let graph = AudioGraph::from_parts(
            vec![node(1, "a"), node(2, "b"), node(3, "c"), node(4, "d"), node(5, "lonely")],
            vec![out(10, 1, "o"), inp(20, 2, "i"), out(30, 3, "o"), inp(40, 4, "i")],
            vec![
                Link::new(NodeId(1), PortId(10), NodeId(2), PortId(20)),
                Link::new(NodeId(3), PortId(30), NodeId(4), PortId(40)),
            ],
        );
        let warnings = Connectivity.validate(&graph).unwrap();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].node_id, Some(NodeId(5)));
        assert!(warnings[1].message.contains("2 disconnected"));
    }
}
