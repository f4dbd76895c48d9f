//! Core value types of a graph snapshot.
//!
//! Identifiers are the numeric object ids assigned by the audio server. They are
//! unique within one snapshot but are not guaranteed to survive a server restart,
//! which is why view state is keyed by node name instead (see
//! [`PositionCache`](crate::layout::positions::PositionCache)).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a port in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortId(pub u32);

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port#{}", self.0)
    }
}

/// Processing state of a node as reported by the audio server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    /// Processing audio.
    Running,
    /// Ready but not processing.
    Idle,
    /// Suspended after being idle.
    Suspended,
    /// Failed.
    Error,
    /// Missing or unrecognised state.
    #[default]
    #[serde(other)]
    Unknown,
}

impl NodeState {
    /// Lowercase name, as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeState::Running => "running",
            NodeState::Idle => "idle",
            NodeState::Suspended => "suspended",
            NodeState::Error => "error",
            NodeState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a link between two ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    /// Carrying audio.
    Active,
    /// Negotiated but not running.
    Paused,
    /// Failed to negotiate.
    Error,
    /// Missing or unrecognised state.
    #[default]
    #[serde(other)]
    Unknown,
}

impl LinkState {
    /// Lowercase name, used as a CSS class by renderers.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkState::Active => "active",
            LinkState::Paused => "paused",
            LinkState::Error => "error",
            LinkState::Unknown => "unknown",
        }
    }
}

/// Well-known media class tags.
pub mod media_class {
    /// Sink device or virtual sink.
    pub const AUDIO_SINK: &str = "Audio/Sink";
    /// Capture device or virtual source.
    pub const AUDIO_SOURCE: &str = "Audio/Source";
    /// Playback stream.
    pub const STREAM_OUTPUT_AUDIO: &str = "Stream/Output/Audio";
    /// Capture stream.
    pub const STREAM_INPUT_AUDIO: &str = "Stream/Input/Audio";
}

/// Scalar value of a node property.
///
/// Properties arrive as a loosely typed JSON object; only scalars are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// JSON boolean.
    Bool(bool),
    /// JSON number without a fraction.
    Integer(i64),
    /// Any other JSON number.
    Float(f64),
    /// JSON string.
    String(String),
    /// JSON `null`.
    Null,
}

impl PropertyValue {
    /// JavaScript-style truthiness, which is how the server-side enrichment
    /// flags marker properties.
    pub fn is_truthy(&self) -> bool {
        match self {
            PropertyValue::Bool(b) => *b,
            PropertyValue::Integer(i) => *i != 0,
            PropertyValue::Float(f) => *f != 0.0 && !f.is_nan(),
            PropertyValue::String(s) => !s.is_empty(),
            PropertyValue::Null => false,
        }
    }

    /// Numeric view of the value. Numeric strings are parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Integer(i) => Some(*i as f64),
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::String(s) => s.trim().parse().ok(),
            PropertyValue::Bool(_) | PropertyValue::Null => None,
        }
    }

    /// Whether the value is an explicit `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Float(fl) => write!(f, "{}", fl),
            PropertyValue::String(s) => f.write_str(s),
            PropertyValue::Null => Ok(()),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}
