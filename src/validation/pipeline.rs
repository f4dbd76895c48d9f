//! Validation pipeline implementation.

use crate::core::error::ValidationReport;
use crate::graph::structure::AudioGraph;
use crate::validation::stages::{
    Connectivity, LinkIntegrity, PortHygiene, ReferentialIntegrity, ValidationStage,
};
use log::debug;
use std::time::Instant;

/// Multi-stage validation pipeline.
///
/// Runs a series of validation stages over a consolidated graph and collects
/// every violation and warning into one report.
pub struct ValidationPipeline {
    stages: Vec<Box<dyn ValidationStage>>,
}

impl ValidationPipeline {
    /// Create a new pipeline with the given stages.
    pub fn new(stages: Vec<Box<dyn ValidationStage>>) -> Self {
        Self { stages }
    }

    /// All invariant checks plus connectivity warnings.
    pub fn default_pipeline() -> Self {
        Self {
            stages: vec![
                Box::new(ReferentialIntegrity),
                Box::new(LinkIntegrity),
                Box::new(PortHygiene),
                Box::new(Connectivity),
            ],
        }
    }

    /// Invariant checks only.
    pub fn invariants_only() -> Self {
        Self {
            stages: vec![
                Box::new(ReferentialIntegrity),
                Box::new(LinkIntegrity),
                Box::new(PortHygiene),
            ],
        }
    }

    /// Add a custom validation stage.
    pub fn add_stage(&mut self, stage: Box<dyn ValidationStage>) {
        self.stages.push(stage);
    }

    /// Names of the stages, in run order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Validate a graph through all stages.
    pub fn validate(&self, graph: &AudioGraph) -> ValidationReport {
        let start = Instant::now();
        let mut report = ValidationReport::new();

        for stage in &self.stages {
            match stage.validate(graph) {
                Ok(warnings) => {
                    for warning in warnings {
                        report.add_warning(warning);
                    }
                }
                Err(errors) => {
                    debug!("{}: {} violation(s)", stage.name(), errors.len());
                    for error in errors {
                        report.add_error(error);
                    }
                }
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        report
    }

    /// Quick check: does the graph satisfy every invariant?
    pub fn is_valid(&self, graph: &AudioGraph) -> bool {
        self.validate(graph).success
    }
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::default_pipeline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidate::Consolidator;
    use crate::core::error::ValidationError;
    use crate::core::node::Node;
    use crate::core::port::{Port, PortDirection};
    use crate::core::types::{NodeId, PortId};
    use crate::graph::connection::Link;
    use crate::graph::snapshot::GraphSnapshot;

    fn messy_snapshot() -> GraphSnapshot {
        GraphSnapshot::new()
            .with_node(Node::new(NodeId(1), "fpp_fx_a", "Audio/Sink"))
            .with_node(Node::new(NodeId(2), "fpp_fx_a_out", "Stream/Output/Audio"))
            .with_node(Node::new(NodeId(3), "alsa_output.usb", "Audio/Sink"))
            .with_port(Port::new(PortId(10), NodeId(1), PortDirection::Input, "playback_FL"))
            .with_port(Port::new(PortId(11), NodeId(1), PortDirection::Output, "monitor_FL"))
            .with_port(Port::new(PortId(20), NodeId(2), PortDirection::Output, "output_FL"))
            .with_port(Port::new(PortId(21), NodeId(2), PortDirection::Input, "input_FL"))
            .with_port(Port::new(PortId(30), NodeId(3), PortDirection::Input, "playback_FL"))
            .with_link(Link::new(NodeId(1), PortId(11), NodeId(2), PortId(21)))
            .with_link(Link::new(NodeId(2), PortId(20), NodeId(3), PortId(30)))
            .with_link(Link::new(NodeId(2), PortId(20), NodeId(3), PortId(30)))
    }

    #[test]
    fn test_raw_snapshot_violates_invariants() {
        let s = messy_snapshot();
        let raw = AudioGraph::from_parts(s.nodes, s.ports, s.links);
        let report = ValidationPipeline::default_pipeline().validate(&raw);

        assert!(!report.success);
        assert!(report.errors.contains(&ValidationError::MonitorPort(PortId(11))));
        assert!(report.errors.contains(&ValidationError::DuplicateLink { output: PortId(20), input: PortId(30) }));
    }

    #[test]
    fn test_consolidated_graph_is_valid() {
        let graph = Consolidator::new().consolidate(&messy_snapshot());
        let report = ValidationPipeline::default_pipeline().validate(&graph);
        assert!(report.success, "{:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_empty_graph_only_warns() {
        let report = ValidationPipeline::default().validate(&AudioGraph::new());
        assert!(report.success);
        assert_eq!(report.warnings.len(), 1);
        assert!(ValidationPipeline::invariants_only().is_valid(&AudioGraph::new()));
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(
            ValidationPipeline::default_pipeline().stage_names(),
            vec!["Referential Integrity", "Link Integrity", "Port Hygiene", "Connectivity"]
        );
    }
}
