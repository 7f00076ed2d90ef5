//! Per-element release deadlines.
//!
//! When a target is released its morphed marker must outlive the eased
//! release so the element does not visibly snap. The registry holds one
//! deadline per element; scheduling again for the same element keeps the
//! existing deadline, and re-entering the element cancels it. Hovering A, B,
//! then A again therefore never leaves two deadlines racing over A.

#[cfg(test)]
#[path = "cleanup_test.rs"]
mod cleanup_test;

use std::collections::HashMap;

use crate::host::ElementId;

/// Identifier of a scheduled cleanup. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingCleanup {
    pub id: TimerId,
    pub due_ms: f64,
    /// The element's inline transition was overridden and must be restored.
    pub restore_transition: bool,
}

#[derive(Debug, Default)]
pub struct CleanupRegistry {
    pending: HashMap<ElementId, PendingCleanup>,
    next_id: u64,
}

impl CleanupRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule cleanup of `el` at `due_ms`.
    ///
    /// If `el` already has a pending cleanup, that one is kept and returned.
    pub fn schedule(&mut self, el: ElementId, due_ms: f64, restore_transition: bool) -> TimerId {
        if let Some(existing) = self.get(el) {
            return existing.id;
        }
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.insert(el, PendingCleanup { id, due_ms, restore_transition });
        id
    }

    /// Cancel the pending cleanup of `el`. Cancelling nothing is a no-op.
    pub fn cancel(&mut self, el: ElementId) -> Option<TimerId> {
        self.pending.remove(&el).map(|p| p.id)
    }

    /// Remove and return every entry whose deadline is at or before `now_ms`,
    /// oldest timer first.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<(ElementId, PendingCleanup)> {
        let due: Vec<ElementId> = self
            .pending
            .iter()
            .filter(|(_, p)| p.due_ms <= now_ms)
            .map(|(el, _)| *el)
            .collect();
        let mut taken: Vec<(ElementId, PendingCleanup)> = due
            .into_iter()
            .filter_map(|el| self.pending.remove(&el).map(|p| (el, p)))
            .collect();
        taken.sort_by_key(|(_, p)| p.id);
        taken
    }

    /// Remove and return every pending entry regardless of deadline.
    pub fn drain(&mut self) -> Vec<(ElementId, PendingCleanup)> {
        let mut all: Vec<(ElementId, PendingCleanup)> = self.pending.drain().collect();
        all.sort_by_key(|(_, p)| p.id);
        all
    }

    #[must_use]
    pub fn get(&self, el: ElementId) -> Option<PendingCleanup> {
        self.pending.get(&el).copied()
    }

    #[cfg(test)]
    #[must_use]
    pub fn is_pending(&self, el: ElementId) -> bool {
        self.pending.contains_key(&el)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Elements with a pending cleanup, in no particular order.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.pending.keys().copied()
    }
}
