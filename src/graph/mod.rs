//! Graph module: snapshots, the consolidated graph and its topology.
//!
//! A snapshot is the raw document delivered by the provider. The consolidated
//! [`AudioGraph`] is the logical graph derived from it, where nodes represent
//! pipeline elements and links represent routed audio channels.

pub mod connection;
pub mod snapshot;
pub mod structure;
pub mod topology;

// Re-export commonly used types
pub use connection::Link;
pub use snapshot::GraphSnapshot;
pub use structure::{AudioGraph, PortCounts};
pub use topology::NodeAdjacency;
