//! The render model: everything a renderer needs to draw one graph.

use crate::consolidate::ConsolidationReport;
use crate::core::config::LayoutConfig;
use crate::core::node::{Node, NodeRole};
use crate::core::types::NodeId;
use crate::graph::structure::AudioGraph;
use crate::layout::bounds::{column_headers, ColumnHeader, LayoutBounds, ViewTransform};
use crate::layout::engine::Layout;
use crate::layout::ports::{LinkRoute, PortAnchor, PortGeometry};
use serde::Serialize;

/// A node with its geometry and presentation attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    /// The node itself, flattened into the JSON object.
    #[serde(flatten)]
    pub node: Node,
    /// Stage column.
    pub column: usize,
    /// Position within the column.
    pub order: usize,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
    /// Number of input ports.
    pub ports_in: usize,
    /// Number of output ports.
    pub ports_out: usize,
    /// Role that picks the colour.
    pub role: NodeRole,
    /// Box colour as a CSS hex string.
    pub color: &'static str,
    /// Truncated display label.
    pub title: String,
    /// Secondary line: class, state and enrichment facts.
    pub meta: String,
}

/// Complete drawing instructions for one graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel {
    /// Nodes, column by column.
    pub nodes: Vec<RenderNode>,
    /// Port anchors.
    pub ports: Vec<PortAnchor>,
    /// Link curves.
    pub links: Vec<LinkRoute>,
    /// Headers of all five columns.
    pub columns: Vec<ColumnHeader>,
    /// `None` for an empty graph.
    pub bounds: Option<LayoutBounds>,
    /// Number of nodes drawn.
    pub node_count: usize,
    /// Number of links in the graph.
    pub link_count: usize,
    /// What consolidation changed.
    pub consolidation: ConsolidationReport,
}

impl RenderModel {
    /// Assemble the render model. Nodes are listed column by column.
    pub fn build(
        graph: &AudioGraph,
        layout: &Layout,
        geometry: &PortGeometry,
        config: &LayoutConfig,
        report: &ConsolidationReport,
    ) -> Self {
        let nodes: Vec<RenderNode> = layout
            .nodes()
            .filter_map(|placed| {
                let node = graph.get_node(placed.id).ok()?;
                let role = node.role();
                Some(RenderNode {
                    node: node.clone(),
                    column: placed.column,
                    order: placed.order,
                    x: placed.x,
                    y: placed.y,
                    width: placed.width,
                    height: placed.height,
                    ports_in: placed.ports_in,
                    ports_out: placed.ports_out,
                    role,
                    color: role.color(),
                    title: node.title(),
                    meta: node.meta_text(),
                })
            })
            .collect();

        Self {
            node_count: nodes.len(),
            link_count: graph.link_count(),
            nodes,
            ports: geometry.anchors().cloned().collect(),
            links: geometry.routes().to_vec(),
            columns: column_headers(config),
            bounds: LayoutBounds::of(layout),
            consolidation: report.clone(),
        }
    }

    /// Find a node by id.
    pub fn node(&self, id: NodeId) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.node.id == id)
    }

    /// Find a node by name.
    pub fn node_by_name(&self, name: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.node.name == name)
    }

    /// Transform fitting the graph into a viewport; `None` for an empty graph.
    pub fn fit(&self, viewport_width: f64, viewport_height: f64) -> Option<ViewTransform> {
        self.bounds.map(|b| b.fit(viewport_width, viewport_height))
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidate::Consolidator;
    use crate::core::port::{Port, PortDirection};
    use crate::core::types::{media_class, PortId};
    use crate::graph::connection::Link;
    use crate::graph::snapshot::GraphSnapshot;
    use crate::layout::engine::LayoutEngine;
    use crate::layout::positions::PositionCache;

    fn model() -> RenderModel {
        let snapshot = GraphSnapshot::new()
            .with_node(Node::new(NodeId(1), "mic", media_class::AUDIO_SOURCE).with_description("USB Microphone"))
            .with_node(Node::new(NodeId(2), "alsa_output.usb", media_class::AUDIO_SINK))
            .with_port(Port::new(PortId(10), NodeId(1), PortDirection::Output, "capture_MONO"))
            .with_port(Port::new(PortId(20), NodeId(2), PortDirection::Input, "playback_MONO"))
            .with_link(Link::new(NodeId(1), PortId(10), NodeId(2), PortId(20)));
        let (graph, report) = Consolidator::new().consolidate_with_report(&snapshot);
        let config = LayoutConfig::default();
        let layout = LayoutEngine::new(config.clone()).layout(&graph, &mut PositionCache::new());
        let geometry = PortGeometry::compute(&graph, &layout, &config);
        RenderModel::build(&graph, &layout, &geometry, &config, &report)
    }

    #[test]
    fn test_build() {
        let model = model();
        assert_eq!(model.node_count, 2);
        assert_eq!(model.link_count, 1);
        assert_eq!(model.links.len(), 1);
        assert_eq!(model.ports.len(), 2);
        assert_eq!(model.columns.len(), 5);

        let mic = model.node_by_name("mic").unwrap();
        assert_eq!(mic.title, "USB Microphone");
        assert_eq!(mic.role, NodeRole::Source);
        assert_eq!(mic.color, NodeRole::Source.color());
        assert!(model.node(NodeId(2)).is_some());
        assert!(model.fit(900.0, 600.0).is_some());
    }

    #[test]
    fn test_json_is_camel_case_and_flat() {
        let json: serde_json::Value = serde_json::from_str(&model().to_json().unwrap()).unwrap();
        let node = &json["nodes"][0];
        assert_eq!(node["name"], "mic");
        assert_eq!(node["mediaClass"], "Audio/Source");
        assert_eq!(node["portsOut"], 1);
        assert!(json["links"][0]["control1"]["x"].is_number());
        assert_eq!(json["nodeCount"], 2);
    }
}
