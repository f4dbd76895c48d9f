//! Layered layout: stage columns, barycenter ordering, sticky coordinates,
//! port anchors and view fitting.
//!
//! Everything in here is a pure computation over an [`AudioGraph`](crate::graph::AudioGraph)
//! and a [`LayoutConfig`](crate::core::LayoutConfig); the only state carried
//! between runs is the [`PositionCache`] passed in by the caller.

pub mod bounds;
pub mod classify;
pub mod engine;
pub mod ports;
pub mod positions;

pub use bounds::{column_headers, ColumnHeader, LayoutBounds, ViewTransform};
pub use classify::{classify, column, stage_of, ClassifyRule, Stage, CLASSIFY_RULES, STAGE_COUNT};
pub use engine::{Layout, LayoutEngine, LayoutNode};
pub use ports::{LinkRoute, Point, PortAnchor, PortGeometry};
pub use positions::{CachedPosition, PositionCache};
