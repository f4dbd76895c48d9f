//! Graph consolidation.
//!
//! The routing configuration realises one logical element as several server
//! objects: a filter-chain is a sink plus a stream output, a combine sink has
//! one stream per member, an input group has loopback halves and per-output
//! streams. Consolidation folds those back into one node each and leaves a
//! graph where every port and link resolves.

pub mod pipeline;
pub mod rules;
pub mod sanitize;

pub use pipeline::{consolidate, ConsolidationReport, Consolidator, MergeRecord};
pub use rules::{default_rules, FilterChainPair, LoopbackPair, MergeContext, MergeRule, NamespacedOutputs};
