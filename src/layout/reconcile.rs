//! Keyed reconciliation between successive datasets.

use std::collections::VecDeque;

use serde::Serialize;

use super::types::Point;

/// Outcome of matching a new dataset against the nodes already simulated
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    /// Keys that entered the simulation
    pub added: Vec<String>,
    /// Keys that left the simulation
    pub removed: Vec<String>,
    /// Keys present before and after
    pub retained: Vec<String>,
    /// Retained keys whose measured size changed
    pub resized: Vec<String>,
    /// Retained keys whose lane or pairing changed
    pub moved: Vec<String>,
    /// Entering keys whose position came back from the retired cache
    pub restored: Vec<String>,
    /// Keys dropped because an earlier datum already used them
    pub duplicates: Vec<String>,
    /// Whether the number of lanes changed
    pub lanes_changed: bool,
}

impl Reconciliation {
    /// Whether the simulation has anything new to settle
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty()
            || !self.removed.is_empty()
            || !self.resized.is_empty()
            || !self.moved.is_empty()
            || self.lanes_changed
    }
}

/// Last positions of recently removed nodes, oldest evicted first
#[derive(Debug, Clone)]
pub struct RetiredCache {
    capacity: usize,
    entries: VecDeque<(String, Point)>,
}

impl RetiredCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remember `id` at `position`, replacing an older entry for the same key
    pub fn retire(&mut self, id: String, position: Point) {
        if self.capacity == 0 {
            return;
        }
        self.entries.retain(|(k, _)| *k != id);
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((id, position));
    }

    /// Take the remembered position for `id`, if still cached
    pub fn revive(&mut self, id: &str) -> Option<Point> {
        let at = self.entries.iter().position(|(k, _)| k == id)?;
        self.entries.remove(at).map(|(_, p)| p)
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.entries.len() > capacity {
            self.entries.pop_front();
        }
    }
}

/// Lane assignment for a list of group keys, in first-seen order.
///
/// Returns the lane of every key and the number of distinct lanes (at least 1).
pub fn assign_lanes(groups: &[Option<String>]) -> (Vec<usize>, usize) {
    let mut seen: Vec<&Option<String>> = Vec::new();
    let lanes: Vec<usize> = groups
        .iter()
        .map(|g| match seen.iter().position(|s| *s == g) {
            Some(lane) => lane,
            None => {
                seen.push(g);
                seen.len() - 1
            }
        })
        .collect();
    (lanes, seen.len().max(1))
}
