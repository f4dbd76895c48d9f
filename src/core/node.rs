//! Nodes of the audio graph and their presentation helpers.

use crate::core::naming::{self, COMBINE_SINK_PREFIX, EFFECT_PREFIX, HW_OUTPUT_PREFIX, MIX_BUS_PREFIX};
use crate::core::types::{media_class, NodeId, NodeState, PropertyValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Maximum number of characters of a node title before it is ellipsised.
pub const TITLE_MAX_CHARS: usize = 28;

/// A processing node as reported by the audio server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier within the snapshot.
    pub id: NodeId,
    /// Implementation identifier (`node.name`).
    pub name: String,
    /// Human label (`node.description`), may be empty.
    #[serde(default)]
    pub description: String,
    /// Media class tag such as `Audio/Sink`.
    #[serde(default)]
    pub media_class: String,
    /// Factory that created the node.
    #[serde(default)]
    pub factory: String,
    /// Processing state.
    #[serde(default)]
    pub state: NodeState,
    /// Scalar properties, including the `fpp.*` keys added by the graph API.
    #[serde(default)]
    pub properties: IndexMap<String, PropertyValue>,
}

impl Node {
    /// Create a node with empty description, factory and properties.
    pub fn new(id: NodeId, name: impl Into<String>, media_class: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            media_class: media_class.into(),
            factory: String::new(),
            state: NodeState::Unknown,
            properties: IndexMap::new(),
        }
    }

    /// Set the human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the processing state.
    pub fn with_state(mut self, state: NodeState) -> Self {
        self.state = state;
        self
    }

    /// Set the factory name.
    pub fn with_factory(mut self, factory: impl Into<String>) -> Self {
        self.factory = factory.into();
        self
    }

    /// Add or replace a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Get a property, treating an explicit `null` as absent.
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key).filter(|v| !v.is_null())
    }

    fn truthy(&self, key: &str) -> Option<&PropertyValue> {
        self.property(key).filter(|v| v.is_truthy())
    }

    /// Label used for sorting and titles: the description, or the name when the
    /// description is empty.
    pub fn display_label(&self) -> &str {
        if self.description.is_empty() {
            &self.name
        } else {
            &self.description
        }
    }

    /// Display label truncated to [`TITLE_MAX_CHARS`].
    pub fn title(&self) -> String {
        truncate(self.display_label(), TITLE_MAX_CHARS)
    }

    /// Role of the node in the routing pipeline.
    pub fn role(&self) -> NodeRole {
        NodeRole::of(&self.name, &self.media_class)
    }

    /// One-line summary of the properties relevant for the node's role.
    pub fn meta_text(&self) -> String {
        let name = self.name.as_str();
        let mut parts: Vec<String> = Vec::new();

        if name.starts_with(EFFECT_PREFIX) {
            if let Some(ms) = self.property(naming::DELAY_MS_KEY) {
                if ms.as_f64().unwrap_or(0.0) > 0.0 {
                    parts.push(format!("delay {} ms", ms));
                } else {
                    parts.push("no delay".to_string());
                }
            }
            if self.truthy(naming::EQ_ENABLED_KEY).is_some() {
                parts.push("EQ on".to_string());
            }
            return parts.join(" · ");
        }

        if name.starts_with(COMBINE_SINK_PREFIX) {
            if let Some(members) = self.truthy(naming::GROUP_MEMBERS_KEY) {
                parts.push(format!("{} members", members));
            }
            if self.truthy(naming::GROUP_LATENCY_KEY).is_some() {
                parts.push("latency comp".to_string());
            }
            return parts.join(" · ");
        }

        if name.starts_with(MIX_BUS_PREFIX) {
            if let Some(members) = self.truthy(naming::INPUT_GROUP_MEMBERS_KEY) {
                parts.push(format!("{} sources", members));
            }
            if let Some(outputs) = self.truthy(naming::INPUT_GROUP_OUTPUTS_KEY) {
                parts.push(format!("→ {} outputs", outputs));
            }
            if parts.is_empty() {
                return "mix bus".to_string();
            }
            return parts.join(" · ");
        }

        if self.media_class.starts_with("Audio/") && name.starts_with(HW_OUTPUT_PREFIX) {
            if let Some(format) = self.truthy("audio.format") {
                parts.push(format.to_string());
            }
            if let Some(rate) = self.truthy("audio.rate").and_then(PropertyValue::as_f64) {
                parts.push(format!("{:.1} kHz", rate / 1000.0));
            }
            if let Some(channels) = self.truthy("audio.channels") {
                parts.push(format!("{} ch", channels));
            }
            if let Some(headroom) = self.truthy("api.alsa.headroom") {
                parts.push(format!("headroom {}", headroom));
            }
            return parts.join(" · ");
        }

        if self.media_class.contains("Stream/") {
            if let Some(channels) = self.truthy("audio.channels") {
                parts.push(format!("{} ch", channels));
            }
            if let Some(app) = self.truthy("application.name") {
                parts.push(app.to_string());
            }
            return parts.join(" · ");
        }

        String::new()
    }
}

/// Role of a node, used by renderers to pick a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    /// Input-group combine-stream mix bus.
    MixBus,
    /// Loopback feeding an input group.
    InputRouting,
    /// Output-group combine-stream sink.
    CombineGroup,
    /// Filter-chain effect sink.
    Effect,
    /// Internal stream half of a combine-stream or filter-chain.
    InternalStream,
    /// ALSA hardware output.
    HardwareOutput,
    /// Hardware capture device.
    Source,
    /// Application capture stream (e.g. AES67 sender).
    CaptureStream,
    /// Playback stream.
    Stream,
    /// Any other sink.
    Sink,
    /// Anything unrecognised.
    Other,
}

impl NodeRole {
    /// Determine the role from the node's name and media class.
    pub fn of(name: &str, class: &str) -> Self {
        if name.starts_with(MIX_BUS_PREFIX) {
            return NodeRole::MixBus;
        }
        if name.starts_with(naming::LOOPBACK_PREFIX) || naming::is_loopback_half(name) {
            return NodeRole::InputRouting;
        }
        if name.starts_with(COMBINE_SINK_PREFIX) {
            return NodeRole::CombineGroup;
        }
        if name.starts_with(EFFECT_PREFIX) && !name.ends_with(naming::EFFECT_CHILD_SUFFIX) {
            return NodeRole::Effect;
        }
        if naming::is_namespaced_output(name, COMBINE_SINK_PREFIX) || naming::is_effect_child(name) {
            return NodeRole::InternalStream;
        }
        match class {
            media_class::AUDIO_SINK if name.starts_with(HW_OUTPUT_PREFIX) => NodeRole::HardwareOutput,
            media_class::AUDIO_SOURCE => NodeRole::Source,
            media_class::STREAM_INPUT_AUDIO => NodeRole::CaptureStream,
            media_class::STREAM_OUTPUT_AUDIO => NodeRole::Stream,
            media_class::AUDIO_SINK => NodeRole::Sink,
            _ => NodeRole::Other,
        }
    }

    /// Fill colour as a CSS hex string.
    pub fn color(&self) -> &'static str {
        match self {
            NodeRole::MixBus | NodeRole::InputRouting => "#e35d6a",
            NodeRole::CombineGroup => "#0d6efd",
            NodeRole::Effect => "#6f42c1",
            NodeRole::InternalStream | NodeRole::Stream => "#fd7e14",
            NodeRole::HardwareOutput | NodeRole::Sink => "#198754",
            NodeRole::Source => "#20c997",
            NodeRole::CaptureStream => "#dc3545",
            NodeRole::Other => "#6c757d",
        }
    }
}

/// Truncate `s` to at most `max` characters, ending with an ellipsis when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
