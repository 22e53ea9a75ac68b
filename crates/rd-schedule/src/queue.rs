//! `ArrivalQueue` — sparse per-cycle incident arrival queue.
//!
//! Most cycles in a long run have no arrivals, so the queue is keyed by
//! cycle in a `BTreeMap` and the driver only pays for cycles that have
//! something in them.

use std::collections::BTreeMap;

use rd_core::{Cycle, IncidentKind};

/// Maps simulation cycles → incident kinds arriving at that cycle.
#[derive(Default)]
pub struct ArrivalQueue {
    inner: BTreeMap<Cycle, Vec<IncidentKind>>,
    /// Cached total arrival count for O(1) `len()`.
    total: usize,
}

impl ArrivalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an arrival of `kind` at `cycle`.
    pub fn push(&mut self, cycle: Cycle, kind: IncidentKind) {
        self.inner.entry(cycle).or_default().push(kind);
        self.total += 1;
    }

    /// Remove and return every arrival scheduled at or before `now`, in
    /// cycle order then insertion order.
    ///
    /// Arrivals for past cycles are still delivered (late) rather than
    /// silently kept in the queue forever.
    pub fn drain_due(&mut self, now: Cycle) -> Vec<IncidentKind> {
        let later = self.inner.split_off(&now.offset(1));
        let due = std::mem::replace(&mut self.inner, later);
        let kinds: Vec<IncidentKind> = due.into_values().flatten().collect();
        self.total -= kinds.len();
        kinds
    }

    /// The earliest cycle with at least one queued arrival.
    pub fn next_cycle(&self) -> Option<Cycle> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
