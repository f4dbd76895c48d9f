//! Configuration for layout metrics and snapshot refresh.
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! yields the metrics the web UI has always used:
//!
//! ```toml
//! [layout]
//! node_width = 220.0
//! column_gap = 100.0
//! sweep_passes = 4
//!
//! [refresh]
//! interval_secs = 10
//! source = "http://fpp.local/api/pipewire/graph"
//! ```

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry of the layered layout, in canvas units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of every node box.
    pub node_width: f64,
    /// Minimum node height.
    pub base_height: f64,
    /// Offset from the node top to the first port row (below the three text lines).
    pub port_row_start: f64,
    /// Vertical distance between port rows.
    pub port_row_spacing: f64,
    /// Extra space below the last port row.
    pub height_margin: f64,
    /// Radius of the port dots.
    pub port_radius: f64,
    /// Canvas x of the first column.
    pub left_margin: f64,
    /// Canvas y of the column headers' band.
    pub top_margin: f64,
    /// Space reserved above the first node of a column for its header.
    pub header_height: f64,
    /// Horizontal gap between adjacent columns.
    pub column_gap: f64,
    /// Vertical gap between stacked nodes.
    pub row_gap: f64,
    /// Number of forward+backward barycenter passes.
    pub sweep_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 220.0,
            base_height: 52.0,
            port_row_start: 44.0,
            port_row_spacing: 18.0,
            height_margin: 4.0,
            port_radius: 5.0,
            left_margin: 60.0,
            top_margin: 40.0,
            header_height: 30.0,
            column_gap: 100.0,
            row_gap: 30.0,
            sweep_passes: 4,
        }
    }
}

impl LayoutConfig {
    /// Height of a node with the given port counts.
    pub fn node_height(&self, ports_in: usize, ports_out: usize) -> f64 {
        let rows = ports_in.max(ports_out).max(1) as f64;
        self.base_height
            .max(self.port_row_start + rows * self.port_row_spacing + self.height_margin)
    }

    /// Left edge of the nodes in `column`.
    pub fn column_x(&self, column: usize) -> f64 {
        self.left_margin + column as f64 * (self.node_width + self.column_gap)
    }

    /// Top of the first node of every column.
    pub fn column_top(&self) -> f64 {
        self.top_margin + self.header_height
    }

    /// Vertical offset of port slot `index` from the node's top edge.
    pub fn port_offset(&self, index: usize) -> f64 {
        self.port_row_start + index as f64 * self.port_row_spacing + self.port_row_spacing / 2.0
    }
}

/// Polling behaviour of the graph view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between automatic refreshes.
    pub interval_secs: u64,
    /// URL or file path of the snapshot provider.
    pub source: Option<String>,
    /// Viewport used when fitting the graph into view.
    pub viewport_width: f64,
    /// Height of that viewport.
    pub viewport_height: f64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            source: None,
            viewport_width: 900.0,
            viewport_height: 600.0,
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Node metrics and sweep settings.
    pub layout: LayoutConfig,
    /// Polling and viewport settings.
    pub refresh: RefreshConfig,
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject metrics that would produce a degenerate layout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        let positive = [
            ("layout.node_width", layout.node_width),
            ("layout.base_height", layout.base_height),
            ("layout.port_row_spacing", layout.port_row_spacing),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be positive, got {}", value)));
            }
        }

        let non_negative = [
            ("layout.port_row_start", layout.port_row_start),
            ("layout.height_margin", layout.height_margin),
            ("layout.port_radius", layout.port_radius),
            ("layout.left_margin", layout.left_margin),
            ("layout.top_margin", layout.top_margin),
            ("layout.header_height", layout.header_height),
            ("layout.column_gap", layout.column_gap),
            ("layout.row_gap", layout.row_gap),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("must not be negative, got {}", value)));
            }
        }

        if layout.sweep_passes == 0 {
            return Err(invalid("layout.sweep_passes", "must be at least 1".to_string()));
        }
        if self.refresh.interval_secs == 0 {
            return Err(invalid("refresh.interval_secs", "must be at least 1".to_string()));
        }
        if self.refresh.viewport_width <= 0.0 || self.refresh.viewport_height <= 0.0 {
            return Err(invalid("refresh.viewport", "must be positive".to_string()));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason,
    }
}
