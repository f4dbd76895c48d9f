//! Sticky node positions.
//!
//! Positions survive refreshes through this cache rather than through the
//! nodes themselves: each refresh builds a brand new graph, and node ids are
//! not stable across server restarts, so the cache is keyed by node name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A remembered top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedPosition {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
}

/// Node name → last known position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionCache {
    entries: IndexMap<String, CachedPosition>,
}

impl PositionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached position of `name`.
    pub fn get(&self, name: &str) -> Option<CachedPosition> {
        self.entries.get(name).copied()
    }

    /// Whether `name` has a cached position.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Record (or overwrite) the position of `name`.
    pub fn insert(&mut self, name: impl Into<String>, x: f64, y: f64) {
        self.entries.insert(name.into(), CachedPosition { x, y });
    }

    /// Move a cached position by `(dx, dy)`. Returns the new position, or
    /// `None` when `name` has no entry.
    pub fn nudge(&mut self, name: &str, dx: f64, dy: f64) -> Option<CachedPosition> {
        let entry = self.entries.get_mut(name)?;
        entry.x += dx;
        entry.y += dy;
        Some(*entry)
    }

    /// Forget one position.
    pub fn remove(&mut self, name: &str) -> Option<CachedPosition> {
        self.entries.shift_remove(name)
    }

    /// Forget every position (layout reset).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop entries whose name is not in `live`. Returns how many were dropped.
    pub fn prune<'a>(&mut self, live: impl IntoIterator<Item = &'a str>) -> usize {
        let live: std::collections::HashSet<&str> = live.into_iter().collect();
        let before = self.entries.len();
        self.entries.retain(|name, _| live.contains(name.as_str()));
        before - self.entries.len()
    }

    /// Number of cached positions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, CachedPosition)> {
        self.entries.iter().map(|(name, pos)| (name.as_str(), *pos))
    }
}
