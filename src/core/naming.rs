//! Naming conventions of the nodes generated by the routing configuration.
//!
//! The configuration generator names every PipeWire object it creates with a
//! fixed prefix, and both the consolidator and the stage classifier dispatch on
//! those prefixes. Nodes that follow none of these conventions are perfectly
//! normal (hardware cards, application streams) and simply stay unmerged.

/// Filter-chain sink created per effect slot (delay, EQ).
pub const EFFECT_PREFIX: &str = "fpp_fx_";

/// Suffix of the stream-output half of a filter-chain.
pub const EFFECT_CHILD_SUFFIX: &str = "_out";

/// Standalone EQ node.
pub const EQ_PREFIX: &str = "fpp_eq_";

/// Combine-stream sink of an output group.
pub const COMBINE_SINK_PREFIX: &str = "fpp_group_";

/// Combine-stream mix bus of an input group.
pub const MIX_BUS_PREFIX: &str = "fpp_input_";

/// Loopback module feeding an input group.
pub const LOOPBACK_PREFIX: &str = "fpp_loopback_ig";

/// Namespace of combine-stream member outputs and loopback playback halves.
pub const OUTPUT_NAMESPACE: &str = "output.";

/// Namespace of loopback capture halves.
pub const INPUT_NAMESPACE: &str = "input.";

/// ALSA hardware sinks.
pub const HW_OUTPUT_PREFIX: &str = "alsa_";

/// Monitor ports mirror a sink's input and never carry routed audio.
pub const MONITOR_PORT_PREFIX: &str = "monitor_";

/// Property shared by a loopback pair and the mix bus it feeds.
pub const INPUT_GROUP_ID_KEY: &str = "fpp.inputGroup.id";

/// Truthy on the mix-bus node of an input group.
pub const INPUT_GROUP_MARKER_KEY: &str = "fpp.inputGroup";

/// Output delay in milliseconds, shown in a node's meta line.
pub const DELAY_MS_KEY: &str = "fpp.delay.ms";
/// Truthy when the output EQ is active.
pub const EQ_ENABLED_KEY: &str = "fpp.eq.enabled";
/// Member count of a combine group.
pub const GROUP_MEMBERS_KEY: &str = "fpp.group.members";
/// Truthy when a combine group compensates member latency.
pub const GROUP_LATENCY_KEY: &str = "fpp.group.latencyCompensate";
/// Number of sources mixed by an input group.
pub const INPUT_GROUP_MEMBERS_KEY: &str = "fpp.inputGroup.members";
/// Number of outputs an input group feeds.
pub const INPUT_GROUP_OUTPUTS_KEY: &str = "fpp.inputGroup.outputs";

/// True for a filter-chain stream output such as `fpp_fx_g1_s3_out`.
pub fn is_effect_child(name: &str) -> bool {
    name.starts_with(EFFECT_PREFIX) && name.ends_with(EFFECT_CHILD_SUFFIX)
}

/// Name of the filter-chain sink that owns `child`, if `child` is a stream output.
pub fn effect_parent_name(child: &str) -> Option<&str> {
    if is_effect_child(child) {
        child.strip_suffix(EFFECT_CHILD_SUFFIX)
    } else {
        None
    }
}

/// True for either half of an input-group loopback.
pub fn is_loopback_half(name: &str) -> bool {
    [INPUT_NAMESPACE, OUTPUT_NAMESPACE].iter().any(|ns| {
        name.strip_prefix(ns)
            .is_some_and(|rest| rest.starts_with(LOOPBACK_PREFIX))
    })
}

/// True when `name` is a combine-stream member output over `parent_prefix`,
/// e.g. `output.fpp_group_main_card0` over `fpp_group_`.
pub fn is_namespaced_output(name: &str, parent_prefix: &str) -> bool {
    name.strip_prefix(OUTPUT_NAMESPACE)
        .is_some_and(|rest| rest.starts_with(parent_prefix))
}
