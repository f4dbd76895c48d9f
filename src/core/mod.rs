//! Core types of the audio routing graph.
//!
//! This module contains the foundational types shared by every stage:
//! - Identifiers, states and property values
//! - Nodes and ports
//! - Naming conventions of generated nodes
//! - Configuration
//! - Error types

pub mod types;
pub mod naming;
pub mod port;
pub mod node;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use types::{LinkState, NodeId, NodeState, PortId, PropertyValue};
pub use port::{Port, PortDirection};
pub use node::{Node, NodeRole};
pub use config::{Config, LayoutConfig, RefreshConfig};
pub use error::{ConfigError, GraphError, PwGraphError, SnapshotError, ValidationError};
