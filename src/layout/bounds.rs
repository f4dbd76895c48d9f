//! View bounds, fit-to-viewport transform and column headers.

use crate::core::config::LayoutConfig;
use crate::layout::classify::Stage;
use crate::layout::engine::Layout;
use serde::{Deserialize, Serialize};

/// Horizontal margin added around the graph when fitting it into view.
pub const FIT_MARGIN_X: f64 = 60.0;
/// Vertical margin added around the graph when fitting it into view.
pub const FIT_MARGIN_Y: f64 = 20.0;
/// Fitting never zooms in further than this.
pub const MAX_FIT_SCALE: f64 = 1.5;
/// Share of the viewport the fitted graph occupies.
pub const FIT_FILL: f64 = 0.9;
/// Distance from the top margin to the column header baseline.
pub const HEADER_OFFSET: f64 = 10.0;

/// Bounding box of all nodes, including the fit margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBounds {
    /// Left edge.
    pub min_x: f64,
    /// Top edge.
    pub min_y: f64,
    /// Right edge.
    pub max_x: f64,
    /// Bottom edge.
    pub max_y: f64,
}

/// Scale-then-translate transform mapping canvas to viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTransform {
    /// Uniform scale factor, applied first.
    pub scale: f64,
    /// Horizontal offset after scaling.
    pub translate_x: f64,
    /// Vertical offset after scaling.
    pub translate_y: f64,
}

impl LayoutBounds {
    /// Bounds of `layout`, or `None` when it has no nodes.
    pub fn of(layout: &Layout) -> Option<Self> {
        let mut nodes = layout.nodes();
        let first = nodes.next()?;
        let mut bounds = Self {
            min_x: first.x - FIT_MARGIN_X,
            min_y: first.y - FIT_MARGIN_Y,
            max_x: first.x + first.width + FIT_MARGIN_X,
            max_y: first.y + first.height + FIT_MARGIN_Y,
        };
        for node in nodes {
            bounds.min_x = bounds.min_x.min(node.x - FIT_MARGIN_X);
            bounds.min_y = bounds.min_y.min(node.y - FIT_MARGIN_Y);
            bounds.max_x = bounds.max_x.max(node.x + node.width + FIT_MARGIN_X);
            bounds.max_y = bounds.max_y.max(node.y + node.height + FIT_MARGIN_Y);
        }
        Some(bounds)
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Transform that centres the bounds in a `viewport_width` × `viewport_height`
    /// viewport.
    pub fn fit(&self, viewport_width: f64, viewport_height: f64) -> ViewTransform {
        let scale = (viewport_width / self.width())
            .min(viewport_height / self.height())
            .min(MAX_FIT_SCALE)
            * FIT_FILL;
        ViewTransform {
            scale,
            translate_x: (viewport_width - self.width() * scale) / 2.0 - self.min_x * scale,
            translate_y: (viewport_height - self.height() * scale) / 2.0 - self.min_y * scale,
        }
    }
}

/// Label drawn above a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    /// Column index.
    pub column: usize,
    /// Stage label.
    pub label: String,
    /// Horizontal centre of the column.
    pub x: f64,
    /// Text baseline.
    pub y: f64,
}

/// Headers for all five stages.
pub fn column_headers(config: &LayoutConfig) -> Vec<ColumnHeader> {
    Stage::ALL
        .iter()
        .map(|stage| ColumnHeader {
            column: stage.column(),
            label: stage.label().to_string(),
            x: config.column_x(stage.column()) + config.node_width / 2.0,
            y: config.top_margin + HEADER_OFFSET,
        })
        .collect()
}
