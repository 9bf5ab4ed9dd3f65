//! Bounded undo history.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::adjustment_set::AdjustmentSet;
use crate::filters::FilterSelection;
use crate::transform::Geometry;

/// Edit parameters at one point in time. Images are never stored; they are
/// recomputed from the source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub filter: FilterSelection,
    pub adjustments: AdjustmentSet,
    #[serde(default)]
    pub geometry: Geometry,
}

/// Most recent snapshots, newest last, holding at most `depth` entries.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Snapshot>,
    depth: usize,
}

impl History {
    /// Empty history keeping at most `depth` snapshots (at least one).
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            entries: VecDeque::with_capacity(depth),
            depth,
        }
    }

    /// Append a snapshot, evicting the oldest one when full.
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.entries.len() == self.depth {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// Remove and return the newest snapshot.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop_back()
    }

    /// Newest snapshot.
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
