//! Error types for pwgraph.
//!
//! Uses thiserror for structured errors with context. Only fetching a snapshot,
//! loading configuration and addressing an unknown node can fail; consolidation
//! and layout are total over well-typed input.

use crate::core::types::{NodeId, PortId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for pwgraph.
#[derive(Error, Debug)]
pub enum PwGraphError {
    /// Fetching or parsing a snapshot failed.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// An operation addressed something missing from the graph.
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure to obtain a graph snapshot from its provider.
///
/// A failed fetch never clears the model that is currently displayed.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The HTTP request did not produce a response body.
    #[error("Request to {url} failed: {error}")]
    Http {
        /// Endpoint that was requested.
        url: String,
        /// Transport or status error.
        error: String,
    },

    /// The snapshot file could not be read.
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not a valid snapshot.
    #[error("Malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    /// No provider is configured or reachable.
    #[error("Snapshot provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors addressing entities of the current graph.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphError {
    /// No node with this id in the current graph.
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    /// No port with this id in the current graph.
    #[error("Port {0} not found")]
    PortNotFound(PortId),

    /// Nothing has been loaded yet.
    #[error("No graph has been loaded yet")]
    NoModel,
}

/// Errors loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for [`Config`](crate::core::config::Config).
    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("Invalid value for '{field}': {reason}")]
    Invalid {
        /// Dotted path of the offending key.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// A violated invariant of a consolidated graph.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationError {
    /// A port whose owner is not in the graph.
    #[error("Port {port} references missing node {node_id}")]
    OrphanPort {
        /// The orphaned port.
        port: PortId,
        /// Owner it claims.
        node_id: NodeId,
    },

    /// A link with an endpoint port that does not exist.
    #[error("Link {output} -> {input} references a missing port")]
    DanglingLink {
        /// Output end.
        output: PortId,
        /// Input end.
        input: PortId,
    },

    /// A link whose node ids disagree with its ports' owners.
    #[error("Link {output} -> {input} does not match the owners of its ports")]
    MismatchedLinkNodes {
        /// Output end.
        output: PortId,
        /// Input end.
        input: PortId,
    },

    /// A link from a node back into itself.
    #[error("Link {output} -> {input} connects node {node_id} to itself")]
    SelfLink {
        /// Output end.
        output: PortId,
        /// Input end.
        input: PortId,
        /// The node on both ends.
        node_id: NodeId,
    },

    /// Two links between the same pair of ports.
    #[error("Duplicate link {output} -> {input}")]
    DuplicateLink {
        /// Output end.
        output: PortId,
        /// Input end.
        input: PortId,
    },

    /// A `monitor_*` port was kept.
    #[error("Monitor port {0} survived consolidation")]
    MonitorPort(PortId),

    /// Two output ports of one node share a channel.
    #[error("Node {node_id} has more than one output port for channel '{channel}'")]
    DuplicateChannel {
        /// Owning node.
        node_id: NodeId,
        /// The shared channel key.
        channel: String,
    },

    /// Two nodes share a name, so cached positions would collide.
    #[error("Duplicate node name '{0}'")]
    DuplicateNodeName(String),
}

impl ValidationError {
    /// Get list of affected node IDs.
    pub fn affected_nodes(&self) -> Vec<NodeId> {
        match self {
            ValidationError::OrphanPort { node_id, .. }
            | ValidationError::SelfLink { node_id, .. }
            | ValidationError::DuplicateChannel { node_id, .. } => vec![*node_id],
            _ => vec![],
        }
    }
}

impl SnapshotError {
    /// Whether retrying the fetch later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, SnapshotError::Http { .. } | SnapshotError::Unavailable(_))
    }
}

/// Result type alias for pwgraph operations.
pub type PwGraphResult<T> = Result<T, PwGraphError>;

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Result type alias for snapshot fetches.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

// ============================================================================
// Validation Report
// ============================================================================

/// Outcome of running the validation pipeline over a consolidated graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether no invariant was violated.
    pub success: bool,
    /// Invariant violations.
    pub errors: Vec<ValidationError>,
    /// Observations that do not violate an invariant.
    pub warnings: Vec<ValidationWarning>,
    /// Time taken for validation in milliseconds.
    pub duration_ms: u64,
}

/// Non-fatal validation warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Warning message.
    pub message: String,
    /// Node that triggered the warning, if applicable.
    pub node_id: Option<NodeId>,
}

impl ValidationReport {
    /// Create a new empty report (success).
    pub fn new() -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Add an error to the report.
    pub fn add_error(&mut self, error: ValidationError) {
        self.success = false;
        self.errors.push(error);
    }

    /// Add a warning to the report.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        if self.success {
            if self.warnings.is_empty() {
                "✓ Graph satisfies all invariants".to_string()
            } else {
                format!(
                    "✓ Graph satisfies all invariants with {} warning(s)",
                    self.warnings.len()
                )
            }
        } else {
            format!("✗ {} invariant violation(s)", self.errors.len())
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}
