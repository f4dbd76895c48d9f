//! Invariant checks for consolidated graphs.
//!
//! The consolidator establishes the invariants by construction; the pipeline
//! verifies them independently and adds connectivity observations for the
//! `check` command.

pub mod pipeline;
pub mod stages;

pub use pipeline::ValidationPipeline;
pub use stages::{Connectivity, LinkIntegrity, PortHygiene, ReferentialIntegrity, ValidationStage};
