//! Port anchors and link routes.
//!
//! Ports sit on the left edge (inputs) or right edge (outputs) of their node,
//! one row per port in attachment order. Links are drawn as horizontal cubic
//! Béziers between the anchors of their two ports.

use crate::core::config::LayoutConfig;
use crate::core::port::PortDirection;
use crate::core::types::{LinkState, NodeId, PortId};
use crate::graph::connection::Link;
use crate::graph::structure::AudioGraph;
use crate::layout::engine::Layout;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where a port is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortAnchor {
    /// The anchored port.
    pub id: PortId,
    /// Owning node.
    pub node_id: NodeId,
    /// Inputs sit on the left edge, outputs on the right.
    pub direction: PortDirection,
    /// Index among the node's ports of the same direction.
    pub slot: usize,
    /// Horizontal centre of the port dot.
    pub x: f64,
    /// Vertical centre of the port dot.
    pub y: f64,
    /// Channel label, or the port name without a channel.
    pub label: String,
}

impl PortAnchor {
    /// Centre of the port dot as a point.
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Cubic Bézier drawn for one link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRoute {
    /// Node the link leaves.
    pub output_node_id: NodeId,
    /// Port the link leaves.
    pub output_port_id: PortId,
    /// Node the link enters.
    pub input_node_id: NodeId,
    /// Port the link enters.
    pub input_port_id: PortId,
    /// State of the underlying link.
    pub state: LinkState,
    /// Output anchor.
    pub from: Point,
    /// First control point.
    pub control1: Point,
    /// Second control point.
    pub control2: Point,
    /// Input anchor.
    pub to: Point,
}

impl LinkRoute {
    /// Route from an output anchor to an input anchor. Control points are
    /// pulled horizontally by half the horizontal distance.
    pub fn between(from: Point, to: Point) -> (Point, Point) {
        let d = (to.x - from.x).abs() * 0.5;
        (Point::new(from.x + d, from.y), Point::new(to.x - d, to.y))
    }

    /// SVG path data, `M x1 y1 C c1 c2 x2 y2`.
    pub fn svg_path(&self) -> String {
        format!(
            "M{},{} C{},{} {},{} {},{}",
            self.from.x,
            self.from.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.to.x,
            self.to.y
        )
    }

    /// Whether either end is on `node_id`.
    pub fn touches(&self, node_id: NodeId) -> bool {
        self.output_node_id == node_id || self.input_node_id == node_id
    }
}

/// Anchors of every port plus the routes of every drawable link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortGeometry {
    anchors: IndexMap<PortId, PortAnchor>,
    routes: Vec<LinkRoute>,
}

impl PortGeometry {
    /// Compute anchors for all ports of laid-out nodes, then all link routes.
    pub fn compute(graph: &AudioGraph, layout: &Layout, config: &LayoutConfig) -> Self {
        let mut geometry = Self::default();
        for node in layout.nodes() {
            geometry.anchor_node(graph, layout, config, node.id);
        }
        geometry.routes = graph
            .links()
            .iter()
            .filter_map(|link| geometry.route(link))
            .collect();
        geometry
    }

    /// Anchor of one port.
    pub fn anchor(&self, port_id: PortId) -> Option<&PortAnchor> {
        self.anchors.get(&port_id)
    }

    /// All anchors, node by node in layout order.
    pub fn anchors(&self) -> impl Iterator<Item = &PortAnchor> {
        self.anchors.values()
    }

    /// Routes of links whose both ports are anchored.
    pub fn routes(&self) -> &[LinkRoute] {
        &self.routes
    }

    /// Recompute the anchors of one node and the routes of links touching it,
    /// leaving everything else untouched. Used while dragging.
    pub fn reroute_node(
        &mut self,
        graph: &AudioGraph,
        layout: &Layout,
        config: &LayoutConfig,
        node_id: NodeId,
    ) {
        self.anchor_node(graph, layout, config, node_id);

        for link in graph.links().iter().filter(|l| l.touches(node_id)) {
            let Some(fresh) = self.route(link) else {
                continue;
            };
            if let Some(existing) = self.routes.iter_mut().find(|r| {
                r.output_port_id == link.output_port_id && r.input_port_id == link.input_port_id
            }) {
                *existing = fresh;
            }
        }
    }

    fn anchor_node(&mut self, graph: &AudioGraph, layout: &Layout, config: &LayoutConfig, node_id: NodeId) {
        let Some(node) = layout.get(node_id) else {
            return;
        };

        for direction in [PortDirection::Input, PortDirection::Output] {
            let x = match direction {
                PortDirection::Input => node.x,
                PortDirection::Output => node.x + node.width,
            };
            for (slot, port) in graph.ports_of_direction(node_id, direction).enumerate() {
                self.anchors.insert(
                    port.id,
                    PortAnchor {
                        id: port.id,
                        node_id,
                        direction,
                        slot,
                        x,
                        y: node.y + config.port_offset(slot),
                        label: port.label(),
                    },
                );
            }
        }
    }

    fn route(&self, link: &Link) -> Option<LinkRoute> {
        let from = self.anchors.get(&link.output_port_id)?.point();
        let to = self.anchors.get(&link.input_port_id)?.point();
        let (control1, control2) = LinkRoute::between(from, to);
        Some(LinkRoute {
            output_node_id: link.output_node_id,
            output_port_id: link.output_port_id,
            input_node_id: link.input_node_id,
            input_port_id: link.input_port_id,
            state: link.state,
            from,
            control1,
            control2,
            to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::Node;
    use crate::core::port::Port;
    use crate::core::types::media_class;
    use crate::layout::engine::LayoutEngine;
    use crate::layout::positions::PositionCache;

    fn graph() -> AudioGraph {
        AudioGraph::from_parts(
            vec![
                Node::new(NodeId(1), "mic", media_class::AUDIO_SOURCE),
                Node::new(NodeId(2), "alsa_output.usb", media_class::AUDIO_SINK),
            ],
            vec![
                Port::new(PortId(10), NodeId(1), PortDirection::Output, "capture_FL").with_channel("FL"),
                Port::new(PortId(11), NodeId(1), PortDirection::Output, "capture_FR").with_channel("FR"),
                Port::new(PortId(20), NodeId(2), PortDirection::Input, "playback_FL"),
                Port::new(PortId(21), NodeId(2), PortDirection::Input, "playback_FR"),
            ],
            vec![
                Link::new(NodeId(1), PortId(10), NodeId(2), PortId(20)),
                Link::new(NodeId(1), PortId(11), NodeId(2), PortId(21)),
                Link::new(NodeId(1), PortId(11), NodeId(2), PortId(99)),
            ],
        )
    }

    fn geometry() -> (AudioGraph, Layout, PortGeometry) {
        let graph = graph();
        let config = LayoutConfig::default();
        let layout = LayoutEngine::new(config.clone()).layout(&graph, &mut PositionCache::new());
        let geometry = PortGeometry::compute(&graph, &layout, &config);
        (graph, layout, geometry)
    }

    #[test]
    fn test_anchor_positions() {
        let (_, layout, geometry) = geometry();
        let mic = layout.get(NodeId(1)).unwrap();

        let fr = geometry.anchor(PortId(11)).unwrap();
        assert_eq!(fr.slot, 1);
        assert_eq!(fr.x, mic.x + 220.0);
        assert_eq!(fr.y, mic.y + 44.0 + 18.0 + 9.0);
        assert_eq!(fr.label, "FR");

        let out = layout.get(NodeId(2)).unwrap();
        let fl_in = geometry.anchor(PortId(20)).unwrap();
        assert_eq!((fl_in.x, fl_in.y), (out.x, out.y + 53.0));
        assert_eq!(fl_in.label, "FL");
    }

    #[test]
    fn test_routes_skip_missing_anchors() {
        let (_, _, geometry) = geometry();
        assert_eq!(geometry.routes().len(), 2);

        let route = &geometry.routes()[0];
        let d = (route.to.x - route.from.x).abs() / 2.0;
        assert_eq!(route.control1, Point::new(route.from.x + d, route.from.y));
        assert_eq!(route.control2, Point::new(route.to.x - d, route.to.y));
        assert!(route.svg_path().starts_with("M280,"));
    }

    #[test]
    fn test_reroute_node() {
        let (graph, mut layout, mut geometry) = geometry();
        let config = LayoutConfig::default();
        let before = geometry.routes()[0].clone();

        layout.translate(NodeId(2), 0.0, 100.0);
        geometry.reroute_node(&graph, &layout, &config, NodeId(2));

        let after = &geometry.routes()[0];
        assert_eq!(after.from, before.from);
        assert_eq!(after.to.y, before.to.y + 100.0);
        assert_eq!(geometry.anchor(PortId(10)).unwrap().y, before.from.y);
    }
}
