//! Layered layout of a consolidated graph.
//!
//! Nodes are assigned to one of five fixed columns by stage, seeded in label
//! order, then reordered by a bounded number of barycenter sweeps to reduce
//! link crossings between adjacent columns. Coordinates are stacked top-down
//! per column, except for nodes with a remembered position.

use crate::core::config::LayoutConfig;
use crate::core::node::Node;
use crate::core::types::NodeId;
use crate::graph::structure::AudioGraph;
use crate::graph::topology::NodeAdjacency;
use crate::layout::classify::{column, STAGE_COUNT};
use crate::layout::positions::PositionCache;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Geometry computed for one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    /// The placed node.
    pub id: NodeId,
    /// Column index, `0..STAGE_COUNT`.
    pub column: usize,
    /// Position within the column after ordering.
    pub order: usize,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Box width.
    pub width: f64,
    /// Grows with the larger of the two port counts.
    pub height: f64,
    /// Number of input ports.
    pub ports_in: usize,
    /// Number of output ports.
    pub ports_out: usize,
}

impl LayoutNode {
    /// Vertical centre of the node box.
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// The result of laying out one graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    nodes: IndexMap<NodeId, LayoutNode>,
    columns: [Vec<NodeId>; STAGE_COUNT],
}

impl Layout {
    /// Geometry of one node.
    pub fn get(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(&id)
    }

    /// All laid-out nodes, column by column, top to bottom.
    pub fn nodes(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.values()
    }

    /// Node ids of one column in final order. Empty for unknown columns.
    pub fn column(&self, column: usize) -> &[NodeId] {
        self.columns.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of placed nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no node was placed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Move one node by `(dx, dy)`.
    pub fn translate(&mut self, id: NodeId, dx: f64, dy: f64) -> Option<&LayoutNode> {
        let node = self.nodes.get_mut(&id)?;
        node.x += dx;
        node.y += dy;
        Some(node)
    }
}

/// Computes layouts with a fixed set of metrics.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create an engine with the given metrics.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Metrics in use.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `graph`.
    ///
    /// Nodes found in `cache` keep their cached coordinates; every other node
    /// gets a fresh position, which is recorded in `cache`. Never fails.
    pub fn layout(&self, graph: &AudioGraph, cache: &mut PositionCache) -> Layout {
        let counts = graph.port_counts();
        let heights: HashMap<NodeId, f64> = graph
            .node_ids()
            .map(|id| {
                let c = counts.get(&id).copied().unwrap_or_default();
                (id, self.config.node_height(c.inputs, c.outputs))
            })
            .collect();

        let columns = self.order_columns(graph, &heights);

        let mut layout = Layout::default();
        let mut sticky = 0usize;

        for (index, column) in columns.iter().enumerate() {
            let x = self.config.column_x(index);
            let mut cursor = self.config.column_top();

            for (order, node) in column.iter().enumerate() {
                let c = counts.get(&node.id).copied().unwrap_or_default();
                let height = heights.get(&node.id).copied().unwrap_or(self.config.base_height);

                let (nx, ny) = match cache.get(&node.name) {
                    Some(pos) => {
                        sticky += 1;
                        (pos.x, pos.y)
                    }
                    None => {
                        cache.insert(node.name.clone(), x, cursor);
                        (x, cursor)
                    }
                };

                layout.nodes.insert(
                    node.id,
                    LayoutNode {
                        id: node.id,
                        column: index,
                        order,
                        x: nx,
                        y: ny,
                        width: self.config.node_width,
                        height,
                        ports_in: c.inputs,
                        ports_out: c.outputs,
                    },
                );
                layout.columns[index].push(node.id);
                cursor += height + self.config.row_gap;
            }
        }

        debug!("laid out {} nodes ({} sticky)", layout.len(), sticky);
        layout
    }

    /// Column membership and order after seeding and barycenter sweeps.
    fn order_columns<'g>(
        &self,
        graph: &'g AudioGraph,
        heights: &HashMap<NodeId, f64>,
    ) -> [Vec<&'g Node>; STAGE_COUNT] {
        let mut columns: [Vec<&Node>; STAGE_COUNT] = Default::default();
        for node in graph.nodes() {
            columns[column(node)].push(node);
        }

        // Seed: label case-insensitively, then exactly, then id.
        let mut seed_rank: HashMap<NodeId, usize> = HashMap::new();
        for nodes in columns.iter_mut() {
            nodes.sort_by_cached_key(|n| {
                let label = n.display_label();
                (label.to_lowercase(), label.to_string(), n.id)
            });
            for (rank, node) in nodes.iter().enumerate() {
                seed_rank.insert(node.id, rank);
            }
        }

        let adjacency = NodeAdjacency::from_graph(graph);
        for _ in 0..self.config.sweep_passes {
            for target in 1..STAGE_COUNT {
                self.reorder(&mut columns, target, target - 1, &adjacency, heights, &seed_rank);
            }
            for target in (0..STAGE_COUNT - 1).rev() {
                self.reorder(&mut columns, target, target + 1, &adjacency, heights, &seed_rank);
            }
        }

        columns
    }

    /// Reorder column `target` by the mean centre of each node's neighbours in
    /// column `reference`.
    ///
    /// A node without neighbours there keeps its own current slot centre, so it
    /// holds its place relative to the nodes around it.
    fn reorder(
        &self,
        columns: &mut [Vec<&Node>; STAGE_COUNT],
        target: usize,
        reference: usize,
        adjacency: &NodeAdjacency,
        heights: &HashMap<NodeId, f64>,
        seed_rank: &HashMap<NodeId, usize>,
    ) {
        if columns[target].len() <= 1 {
            return;
        }

        let reference_centres = self.stack_centres(&columns[reference], heights);
        let own_centres = self.stack_centres(&columns[target], heights);

        let mut keyed: Vec<(f64, usize, &Node)> = columns[target]
            .iter()
            .map(|&node| {
                let (sum, count) = adjacency
                    .neighbors(node.id)
                    .filter_map(|neighbor| reference_centres.get(&neighbor))
                    .fold((0.0, 0usize), |(sum, count), y| (sum + y, count + 1));
                let barycenter = if count > 0 {
                    sum / count as f64
                } else {
                    own_centres.get(&node.id).copied().unwrap_or(0.0)
                };
                let rank = seed_rank.get(&node.id).copied().unwrap_or(usize::MAX);
                (barycenter, rank, node)
            })
            .collect();

        keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        columns[target] = keyed.into_iter().map(|(_, _, node)| node).collect();
    }

    /// Centre-Y of each node when `nodes` are stacked from zero.
    fn stack_centres(&self, nodes: &[&Node], heights: &HashMap<NodeId, f64>) -> HashMap<NodeId, f64> {
        let mut centres = HashMap::with_capacity(nodes.len());
        let mut y = 0.0;
        for node in nodes {
            let h = heights.get(&node.id).copied().unwrap_or(self.config.base_height);
            centres.insert(node.id, y + h / 2.0);
            y += h + self.config.row_gap;
        }
        centres
    }
}
