//! Graph view session: snapshot sources, refresh cycles, interaction and the
//! render model handed to a renderer.

pub mod render;
pub mod source;
pub mod view;

pub use render::{RenderModel, RenderNode};
pub use source::{source_for, FileSnapshotSource, HttpSnapshotSource, SnapshotSource};
pub use view::{GraphView, RefreshOutcome, RefreshTicket, Scene};
