//! # pwgraph - PipeWire graph consolidation and layered layout
//!
//! pwgraph turns raw snapshots of an audio server's processing graph into a
//! logical graph and a stable, left-to-right layout for interactive display.
//!
//! ## Features
//!
//! - **Consolidation**: Folds the server objects a routing configuration
//!   creates for one element (filter-chain halves, combine-stream members,
//!   loopback halves) back into a single node
//! - **Sanitisation**: Drops monitor ports, self links, duplicate links and
//!   duplicate channels so every port and link resolves
//! - **Layered Layout**: Five fixed stage columns, ordered by barycenter sweeps
//!   to reduce crossings
//! - **Sticky Positions**: Dragged nodes keep their place across refreshes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pwgraph::prelude::*;
//!
//! let mut view = GraphView::new(Config::default());
//! view.refresh(&FileSnapshotSource::new("graph.json"))?;
//!
//! // Move a node; its position survives the next refresh
//! view.drag_node(NodeId(42), 5.0, 5.0)?;
//!
//! let model = view.render_model().unwrap();
//! println!("{}", model.to_json()?);
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`core`]: Core types, naming conventions, configuration and errors
//! - [`graph`]: Snapshots, the consolidated graph and its topology
//! - [`consolidate`]: Merge rules and the consolidation pipeline
//! - [`validation`]: Invariant checks over consolidated graphs
//! - [`layout`]: Stage classification, layout engine, port geometry, view bounds
//! - [`session`]: Snapshot sources, the graph view session and the render model

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod consolidate;
pub mod core;
pub mod graph;
pub mod layout;
pub mod session;
pub mod validation;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use pwgraph::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{LinkState, NodeId, NodeState, PortId, PropertyValue};
    pub use crate::core::node::{Node, NodeRole};
    pub use crate::core::port::{Port, PortDirection};

    // Configuration
    pub use crate::core::config::{Config, LayoutConfig, RefreshConfig};

    // Errors
    pub use crate::core::error::{
        ConfigError, GraphError, PwGraphError, PwGraphResult, SnapshotError, ValidationError,
        ValidationReport, ValidationWarning,
    };

    // Graph
    pub use crate::graph::connection::Link;
    pub use crate::graph::snapshot::GraphSnapshot;
    pub use crate::graph::structure::{AudioGraph, PortCounts};
    pub use crate::graph::topology::NodeAdjacency;

    // Consolidation
    pub use crate::consolidate::{consolidate, ConsolidationReport, Consolidator, MergeRule};

    // Validation
    pub use crate::validation::pipeline::ValidationPipeline;
    pub use crate::validation::stages::ValidationStage;

    // Layout
    pub use crate::layout::{
        classify, column, Layout, LayoutBounds, LayoutEngine, LayoutNode, PortGeometry,
        PositionCache, Stage, ViewTransform,
    };

    // Session
    pub use crate::session::{
        source_for, FileSnapshotSource, GraphView, HttpSnapshotSource, RefreshOutcome,
        RenderModel, SnapshotSource,
    };
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "pwgraph");
    }

    #[test]
    fn test_snapshot_to_render_model() {
        let json = r#"{
            "nodes": [
                {"id": 1, "name": "fppd", "mediaClass": "Stream/Output/Audio", "state": "running"},
                {"id": 2, "name": "fpp_group_main", "description": "Main Speakers", "mediaClass": "Audio/Sink"},
                {"id": 3, "name": "output.fpp_group_main_usb", "mediaClass": "Stream/Output/Audio"},
                {"id": 4, "name": "alsa_output.usb", "mediaClass": "Audio/Sink"}
            ],
            "ports": [
                {"id": 10, "nodeId": 1, "direction": "output", "name": "output_FL", "channel": "FL"},
                {"id": 20, "nodeId": 2, "direction": "input", "name": "playback_FL", "channel": "FL"},
                {"id": 21, "nodeId": 2, "direction": "output", "name": "monitor_FL", "channel": "FL"},
                {"id": 30, "nodeId": 3, "direction": "output", "name": "output_FL", "channel": "FL"},
                {"id": 40, "nodeId": 4, "direction": "input", "name": "playback_FL", "channel": "FL"}
            ],
            "links": [
                {"outputNodeId": 1, "outputPortId": 10, "inputNodeId": 2, "inputPortId": 20},
                {"outputNodeId": 3, "outputPortId": 30, "inputNodeId": 4, "inputPortId": 40}
            ]
        }"#;

        let mut view = GraphView::default();
        view.load_snapshot(GraphSnapshot::from_json(json).unwrap());
        let model = view.render_model().unwrap();

        assert_eq!(model.node_count, 3);
        assert_eq!(model.link_count, 2);
        let group = model.node_by_name("fpp_group_main").unwrap();
        assert_eq!(group.column, Stage::OutputGroups.column());
        assert_eq!(group.ports_out, 1);
        assert_eq!(group.title, "Main Speakers");

        let report = ValidationPipeline::default().validate(&view.scene().unwrap().graph);
        assert!(report.success);
    }
}
