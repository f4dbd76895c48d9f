//! Stage classification: which of the five pipeline columns a node sits in.

use crate::core::naming::{
    COMBINE_SINK_PREFIX, EFFECT_PREFIX, EQ_PREFIX, HW_OUTPUT_PREFIX, INPUT_NAMESPACE,
    LOOPBACK_PREFIX, MIX_BUS_PREFIX, OUTPUT_NAMESPACE,
};
use crate::core::node::Node;
use crate::core::types::media_class;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of layout columns.
pub const STAGE_COUNT: usize = 5;

/// A pipeline stage, one per layout column, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    /// Capture devices and application streams.
    InputSources,
    /// Input-group mix buses.
    InputGroups,
    /// Combine-sink output groups.
    OutputGroups,
    /// Filter-chain effects.
    Effects,
    /// Hardware outputs and anything unclassified.
    HwOutputs,
}

impl Stage {
    /// All stages in column order.
    pub const ALL: [Stage; STAGE_COUNT] = [
        Stage::InputSources,
        Stage::InputGroups,
        Stage::OutputGroups,
        Stage::Effects,
        Stage::HwOutputs,
    ];

    /// Zero-based column index.
    pub fn column(self) -> usize {
        self as usize
    }

    /// Stage for a column index, `None` past the last column.
    pub fn from_column(column: usize) -> Option<Self> {
        Self::ALL.get(column).copied()
    }

    /// Header label drawn above the column.
    pub fn label(self) -> &'static str {
        match self {
            Stage::InputSources => "Input Sources",
            Stage::InputGroups => "Input Groups",
            Stage::OutputGroups => "Output Groups",
            Stage::Effects => "Effects",
            Stage::HwOutputs => "HW Outputs",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One classification rule: a predicate over `(name, media class)`.
pub struct ClassifyRule {
    /// Short name, used in trace logs.
    pub name: &'static str,
    /// Stage assigned on a match.
    pub stage: Stage,
    /// Predicate over `(name, media_class)`.
    pub matches: fn(&str, &str) -> bool,
}

fn is_input_routing(name: &str, _class: &str) -> bool {
    name.starts_with(MIX_BUS_PREFIX)
        || name.starts_with(LOOPBACK_PREFIX)
        || [INPUT_NAMESPACE, OUTPUT_NAMESPACE].iter().any(|ns| {
            name.strip_prefix(ns)
                .is_some_and(|rest| rest.starts_with(LOOPBACK_PREFIX))
        })
}

fn is_output_group(name: &str, _class: &str) -> bool {
    name.starts_with(COMBINE_SINK_PREFIX)
}

fn is_effect(name: &str, _class: &str) -> bool {
    name.starts_with(EFFECT_PREFIX) || name.starts_with(EQ_PREFIX)
}

fn is_hardware_or_capture(name: &str, class: &str) -> bool {
    (class == media_class::AUDIO_SINK && name.starts_with(HW_OUTPUT_PREFIX))
        || class == media_class::STREAM_INPUT_AUDIO
}

fn is_source(_name: &str, class: &str) -> bool {
    class == media_class::AUDIO_SOURCE || class == media_class::STREAM_OUTPUT_AUDIO
}

fn is_other_sink(_name: &str, class: &str) -> bool {
    class == media_class::AUDIO_SINK
}

/// Classification rules, evaluated top to bottom. Unmatched nodes are sources.
pub static CLASSIFY_RULES: &[ClassifyRule] = &[
    ClassifyRule { name: "input routing", stage: Stage::InputGroups, matches: is_input_routing },
    ClassifyRule { name: "output group", stage: Stage::OutputGroups, matches: is_output_group },
    ClassifyRule { name: "effect", stage: Stage::Effects, matches: is_effect },
    ClassifyRule { name: "hardware output", stage: Stage::HwOutputs, matches: is_hardware_or_capture },
    ClassifyRule { name: "source", stage: Stage::InputSources, matches: is_source },
    ClassifyRule { name: "sink", stage: Stage::HwOutputs, matches: is_other_sink },
];

/// Stage of a node given its name and media class.
pub fn classify(name: &str, class: &str) -> Stage {
    CLASSIFY_RULES
        .iter()
        .find(|rule| (rule.matches)(name, class))
        .map_or(Stage::InputSources, |rule| rule.stage)
}

/// Stage of a node.
pub fn stage_of(node: &Node) -> Stage {
    classify(&node.name, &node.media_class)
}

/// Column index (`0..STAGE_COUNT`) of a node.
pub fn column(node: &Node) -> usize {
    stage_of(node).column()
}
