//! The consolidation pipeline.
//!
//! Runs the merge rules over a snapshot, then sanitises ports and links so the
//! resulting [`AudioGraph`] satisfies the graph invariants:
//!
//! - every port's owner is a surviving node
//! - every link references two existing ports and their owners
//! - no link joins a node to itself, no two links share a port pair
//! - no node has two output ports with the same channel
//! - no monitor ports remain

use crate::consolidate::rules::{default_rules, MergeContext, MergeRule};
use crate::consolidate::sanitize;
use crate::core::node::Node;
use crate::core::port::Port;
use crate::core::types::{NodeId, NodeState};
use crate::graph::snapshot::GraphSnapshot;
use crate::graph::structure::AudioGraph;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One node absorbed into another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRecord {
    /// Rule that matched.
    pub rule: String,
    /// The absorbed node.
    pub child: NodeId,
    /// Name of the absorbed node, kept for logging.
    pub child_name: String,
    /// The node that now owns its ports and links.
    pub parent: NodeId,
}

/// What a consolidation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationReport {
    /// Merges in the order they happened.
    pub merges: Vec<MergeRecord>,
    /// Links that ended up connecting a node to itself.
    pub self_links_dropped: usize,
    /// Repeated `(output port, input port)` pairs.
    pub duplicate_links_dropped: usize,
    /// Ports whose owner was not in the snapshot.
    pub orphan_ports_dropped: usize,
    /// `monitor_*` ports.
    pub monitor_ports_dropped: usize,
    /// Output ports folded into an earlier port of the same channel.
    pub duplicate_channels_collapsed: usize,
    /// Links left without a port on either end.
    pub dangling_links_dropped: usize,
}

impl ConsolidationReport {
    /// True when the snapshot was already consolidated.
    pub fn is_noop(&self) -> bool {
        self.merges.is_empty()
            && self.self_links_dropped == 0
            && self.duplicate_links_dropped == 0
            && self.orphan_ports_dropped == 0
            && self.monitor_ports_dropped == 0
            && self.duplicate_channels_collapsed == 0
            && self.dangling_links_dropped == 0
    }

    /// Number of merges performed by one rule.
    pub fn merges_by(&self, rule: &str) -> usize {
        self.merges.iter().filter(|m| m.rule == rule).count()
    }

    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        format!(
            "{} merges; dropped {} self links, {} duplicate links, {} dangling links, {} orphan ports, {} monitor ports; collapsed {} duplicate channels",
            self.merges.len(),
            self.self_links_dropped,
            self.duplicate_links_dropped,
            self.dangling_links_dropped,
            self.orphan_ports_dropped,
            self.monitor_ports_dropped,
            self.duplicate_channels_collapsed,
        )
    }
}

/// Consolidates raw snapshots into logical graphs.
pub struct Consolidator {
    rules: Vec<Box<dyn MergeRule>>,
}

impl Default for Consolidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Consolidator {
    /// Consolidator with the standard rule set.
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Consolidator without any merge rule; only sanitises.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. Rules run in insertion order.
    pub fn add_rule(&mut self, rule: Box<dyn MergeRule>) {
        self.rules.push(rule);
    }

    /// Builder variant of [`add_rule`](Self::add_rule).
    pub fn with_rule(mut self, rule: Box<dyn MergeRule>) -> Self {
        self.add_rule(rule);
        self
    }

    /// Names of the registered rules, in order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Consolidate `snapshot`.
    pub fn consolidate(&self, snapshot: &GraphSnapshot) -> AudioGraph {
        self.consolidate_with_report(snapshot).0
    }

    /// Consolidate `snapshot` and report what changed.
    ///
    /// Never fails: malformed input is repaired by dropping whatever cannot be
    /// resolved.
    pub fn consolidate_with_report(
        &self,
        snapshot: &GraphSnapshot,
    ) -> (AudioGraph, ConsolidationReport) {
        let mut report = ConsolidationReport::default();
        let mut nodes = snapshot.nodes.clone();
        let mut ports = snapshot.ports.clone();
        let mut links = snapshot.links.clone();

        let remap = self.merge_nodes(&mut nodes, &mut ports, &mut report);
        nodes.retain(|n| !remap.contains_key(&n.id));

        // Links first follow their nodes into the parents.
        sanitize::remap_link_nodes(&mut links, &remap);
        report.self_links_dropped += sanitize::drop_self_links(&mut links);
        report.duplicate_links_dropped += sanitize::dedupe_links(&mut links);

        // Then ports.
        let live: HashSet<NodeId> = nodes.iter().map(|n| n.id).collect();
        report.orphan_ports_dropped += sanitize::drop_orphan_ports(&mut ports, &live);
        report.monitor_ports_dropped += sanitize::drop_monitor_ports(&mut ports);
        report.duplicate_channels_collapsed +=
            sanitize::collapse_duplicate_channels(&mut ports, &mut links);

        // Finally re-resolve links against the surviving ports.
        report.dangling_links_dropped += sanitize::resolve_links(&ports, &mut links);
        report.self_links_dropped += sanitize::drop_self_links(&mut links);
        report.duplicate_links_dropped += sanitize::dedupe_links(&mut links);

        debug!("consolidated {} nodes into {}: {}", snapshot.nodes.len(), nodes.len(), report.summary());

        (AudioGraph::from_parts(nodes, ports, links), report)
    }

    /// Apply every rule, in order, to every surviving node in snapshot order.
    ///
    /// Returns the absorption map (child → parent). Ports are re-owned as
    /// merges happen, so chains of merges carry their ports along.
    fn merge_nodes(
        &self,
        nodes: &mut [Node],
        ports: &mut [Port],
        report: &mut ConsolidationReport,
    ) -> HashMap<NodeId, NodeId> {
        let mut absorbed: HashSet<NodeId> = HashSet::new();
        let mut remap: HashMap<NodeId, NodeId> = HashMap::new();

        for rule in &self.rules {
            for index in 0..nodes.len() {
                let child_id = nodes[index].id;
                if absorbed.contains(&child_id) {
                    continue;
                }

                let parent_id = {
                    let ctx = MergeContext::new(nodes, &absorbed);
                    match rule.parent_of(&nodes[index], &ctx) {
                        Some(parent) if parent != child_id => parent,
                        _ => continue,
                    }
                };

                let Some(parent_index) = nodes.iter().position(|n| n.id == parent_id) else {
                    continue;
                };

                if nodes[index].state == NodeState::Running {
                    nodes[parent_index].state = NodeState::Running;
                }
                for port in ports.iter_mut().filter(|p| p.node_id == child_id) {
                    port.node_id = parent_id;
                }

                debug!(
                    "{}: merged {} ({}) into {} ({})",
                    rule.name(),
                    nodes[index].name,
                    child_id,
                    nodes[parent_index].name,
                    parent_id
                );
                report.merges.push(MergeRecord {
                    rule: rule.name().to_string(),
                    child: child_id,
                    child_name: nodes[index].name.clone(),
                    parent: parent_id,
                });

                absorbed.insert(child_id);
                remap.insert(child_id, parent_id);
            }
        }

        remap
    }
}

/// Consolidate with the standard rule set.
pub fn consolidate(snapshot: &GraphSnapshot) -> AudioGraph {
    Consolidator::new().consolidate(snapshot)
}
