//! Merge rules recognising multi-node implementation patterns.
//!
//! Each rule is a pure predicate over a node and the set of nodes still alive:
//! it either names the logical parent the node belongs to, or declines. The
//! consolidator owns the control flow (rule order, absorption bookkeeping, port
//! re-owning), so adding a pattern means adding a rule, nothing else.

use crate::core::naming::{self, COMBINE_SINK_PREFIX, INPUT_GROUP_ID_KEY, INPUT_GROUP_MARKER_KEY, MIX_BUS_PREFIX, OUTPUT_NAMESPACE};
use crate::core::node::Node;
use crate::core::types::NodeId;
use log::trace;
use std::collections::HashSet;

/// Nodes visible to a rule: everything in the snapshot that has not been
/// absorbed yet.
pub struct MergeContext<'a> {
    nodes: &'a [Node],
    absorbed: &'a HashSet<NodeId>,
}

impl<'a> MergeContext<'a> {
    /// View `nodes` with the ids in `absorbed` hidden.
    pub fn new(nodes: &'a [Node], absorbed: &'a HashSet<NodeId>) -> Self {
        Self { nodes, absorbed }
    }

    /// Surviving nodes, in snapshot order.
    pub fn live(&self) -> impl Iterator<Item = &'a Node> + '_ {
        self.nodes.iter().filter(move |n| !self.absorbed.contains(&n.id))
    }

    /// Surviving node with the given name.
    pub fn by_name(&self, name: &str) -> Option<&'a Node> {
        self.live().find(|n| n.name == name)
    }
}

/// A consolidation pattern.
pub trait MergeRule: Send + Sync {
    /// Name of this rule, used in logs and reports.
    fn name(&self) -> &str;

    /// The surviving node `node` should be merged into, if this rule applies.
    fn parent_of(&self, node: &Node, ctx: &MergeContext<'_>) -> Option<NodeId>;
}

/// `fpp_fx_<slot>_out` → `fpp_fx_<slot>`.
///
/// A filter-chain is created as a sink plus a stream output carrying the
/// processed signal.
pub struct FilterChainPair;

impl MergeRule for FilterChainPair {
    fn name(&self) -> &str {
        "filter-chain pair"
    }

    fn parent_of(&self, node: &Node, ctx: &MergeContext<'_>) -> Option<NodeId> {
        let parent_name = naming::effect_parent_name(&node.name)?;
        let parent = ctx.by_name(parent_name);
        if parent.is_none() {
            trace!("no filter-chain parent '{}' for {}", parent_name, node.name);
        }
        parent.map(|p| p.id)
    }
}

/// `output.<prefix>…` → the `<prefix>…` node with the longest matching name.
///
/// Combine-streams create one stream output per member; member names are
/// appended to the group name, so the longest prefix disambiguates groups
/// whose names prefix one another (`fpp_group_a` vs `fpp_group_ab`).
pub struct NamespacedOutputs {
    label: &'static str,
    parent_prefix: &'static str,
}

impl NamespacedOutputs {
    /// Member outputs of output-group combine sinks.
    pub fn combine_sinks() -> Self {
        Self {
            label: "combine-sink output",
            parent_prefix: COMBINE_SINK_PREFIX,
        }
    }

    /// Member outputs of input-group mix buses.
    pub fn mix_buses() -> Self {
        Self {
            label: "mix-bus output",
            parent_prefix: MIX_BUS_PREFIX,
        }
    }
}

impl MergeRule for NamespacedOutputs {
    fn name(&self) -> &str {
        self.label
    }

    fn parent_of(&self, node: &Node, ctx: &MergeContext<'_>) -> Option<NodeId> {
        if !naming::is_namespaced_output(&node.name, self.parent_prefix) {
            return None;
        }
        let member = &node.name[OUTPUT_NAMESPACE.len()..];

        let mut best: Option<&Node> = None;
        for candidate in ctx.live() {
            if candidate.id == node.id
                || !candidate.name.starts_with(self.parent_prefix)
                || !member.starts_with(candidate.name.as_str())
            {
                continue;
            }
            if best.map_or(true, |b| candidate.name.len() > b.name.len()) {
                best = Some(candidate);
            }
        }

        if best.is_none() {
            trace!("no {} parent for {}", self.parent_prefix, node.name);
        }
        best.map(|b| b.id)
    }
}

/// `input.fpp_loopback_ig*` / `output.fpp_loopback_ig*` → the last mix bus with
/// the same input-group id.
///
/// Loopback modules only create the two namespaced halves, and their names do
/// not contain the mix bus name, so the match goes through the group id the
/// graph API attaches to both sides.
pub struct LoopbackPair;

impl MergeRule for LoopbackPair {
    fn name(&self) -> &str {
        "loopback pair"
    }

    fn parent_of(&self, node: &Node, ctx: &MergeContext<'_>) -> Option<NodeId> {
        if !naming::is_loopback_half(&node.name) {
            return None;
        }
        let group_id = node.property(INPUT_GROUP_ID_KEY)?;

        // the last mix bus in snapshot order wins when several share the id
        let parent = ctx
            .live()
            .filter(|candidate| {
                candidate.id != node.id
                    && candidate
                        .property(INPUT_GROUP_MARKER_KEY)
                        .is_some_and(|marker| marker.is_truthy())
                    && candidate.property(INPUT_GROUP_ID_KEY) == Some(group_id)
            })
            .last();

        if parent.is_none() {
            trace!("no mix bus with {} = {} for {}", INPUT_GROUP_ID_KEY, group_id, node.name);
        }
        parent.map(|p| p.id)
    }
}

/// The rules in the order they must run.
pub fn default_rules() -> Vec<Box<dyn MergeRule>> {
    vec![
        Box::new(FilterChainPair),
        Box::new(NamespacedOutputs::combine_sinks()),
        Box::new(LoopbackPair),
        Box::new(NamespacedOutputs::mix_buses()),
    ]
}
