//! Port and link clean-up applied after node merging.
//!
//! Every function here edits its collections in place, keeps the relative
//! order of what survives, and returns how many items it removed.

use crate::core::port::{Port, PortDirection};
use crate::core::types::{NodeId, PortId};
use crate::graph::connection::Link;
use std::collections::{HashMap, HashSet};

/// Follow the absorption map to the final surviving node.
fn resolve(remap: &HashMap<NodeId, NodeId>, mut id: NodeId) -> NodeId {
    // absorbed nodes never absorb each other in a cycle, but cap the walk anyway
    for _ in 0..=remap.len() {
        match remap.get(&id) {
            Some(&next) if next != id => id = next,
            _ => break,
        }
    }
    id
}

/// Point link endpoints at the nodes that absorbed them.
pub fn remap_link_nodes(links: &mut [Link], remap: &HashMap<NodeId, NodeId>) {
    if remap.is_empty() {
        return;
    }
    for link in links.iter_mut() {
        link.output_node_id = resolve(remap, link.output_node_id);
        link.input_node_id = resolve(remap, link.input_node_id);
    }
}

/// Drop links from a node to itself. Returns how many were dropped.
pub fn drop_self_links(links: &mut Vec<Link>) -> usize {
    let before = links.len();
    links.retain(|l| !l.is_self_link());
    before - links.len()
}

/// Keep the first link for each (output port, input port) pair.
pub fn dedupe_links(links: &mut Vec<Link>) -> usize {
    let before = links.len();
    let mut seen: HashSet<(PortId, PortId)> = HashSet::with_capacity(links.len());
    links.retain(|l| seen.insert(l.port_pair()));
    before - links.len()
}

/// Drop ports whose owner is not in `live`.
pub fn drop_orphan_ports(ports: &mut Vec<Port>, live: &HashSet<NodeId>) -> usize {
    let before = ports.len();
    ports.retain(|p| live.contains(&p.node_id));
    before - ports.len()
}

/// Drop `monitor_*` ports.
pub fn drop_monitor_ports(ports: &mut Vec<Port>) -> usize {
    let before = ports.len();
    ports.retain(|p| !p.is_monitor());
    before - ports.len()
}

/// Collapse output ports that repeat a channel on the same node.
///
/// After a merge a node can expose the same channel twice (once from the
/// parent, once from the absorbed child). The first occurrence in attachment
/// order is canonical; links on the duplicates are moved onto it.
pub fn collapse_duplicate_channels(ports: &mut Vec<Port>, links: &mut [Link]) -> usize {
    let mut canonical: HashMap<(NodeId, String), PortId> = HashMap::new();
    let mut replaced: HashMap<PortId, PortId> = HashMap::new();

    for port in ports.iter().filter(|p| p.direction == PortDirection::Output) {
        let key = (port.node_id, port.channel_key().to_string());
        match canonical.get(&key) {
            Some(&keep) => {
                replaced.insert(port.id, keep);
            }
            None => {
                canonical.insert(key, port.id);
            }
        }
    }

    if replaced.is_empty() {
        return 0;
    }

    for link in links.iter_mut() {
        if let Some(&keep) = replaced.get(&link.output_port_id) {
            link.output_port_id = keep;
        }
        if let Some(&keep) = replaced.get(&link.input_port_id) {
            link.input_port_id = keep;
        }
    }

    ports.retain(|p| !replaced.contains_key(&p.id));
    replaced.len()
}

/// Drop links whose ports are gone and re-derive endpoint nodes from the
/// owners of the remaining ports.
pub fn resolve_links(ports: &[Port], links: &mut Vec<Link>) -> usize {
    let owners: HashMap<PortId, NodeId> = ports.iter().map(|p| (p.id, p.node_id)).collect();
    let before = links.len();

    links.retain_mut(|link| {
        match (owners.get(&link.output_port_id), owners.get(&link.input_port_id)) {
            (Some(&out_node), Some(&in_node)) => {
                link.output_node_id = out_node;
                link.input_node_id = in_node;
                true
            }
            _ => false,
        }
    });

    before - links.len()
}
