//! Arrival events and the time-ordered schedule that holds them.

use rd_core::{Cycle, IncidentKind};

use crate::ArrivalQueue;

/// One scheduled incident arrival.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScheduledArrival {
    pub cycle: Cycle,
    pub kind:  IncidentKind,
}

/// A sequence of arrivals, non-decreasing in cycle.
///
/// Arrivals sharing a cycle keep the order they were supplied in; the driver
/// admits them in that order, which decides incident ids and which of them
/// gets the nearest responders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArrivalSchedule {
    arrivals: Vec<ScheduledArrival>,
}

impl ArrivalSchedule {
    /// Build a schedule, stably sorting `arrivals` by cycle.
    pub fn new(mut arrivals: Vec<ScheduledArrival>) -> Self {
        arrivals.sort_by_key(|a| a.cycle);
        Self { arrivals }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn arrivals(&self) -> &[ScheduledArrival] {
        &self.arrivals
    }

    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    /// Last cycle with a scheduled arrival.
    pub fn last_cycle(&self) -> Option<Cycle> {
        self.arrivals.last().map(|a| a.cycle)
    }

    /// Number of arrivals of each kind, indexed by `IncidentKind::index`.
    pub fn kind_counts(&self) -> [usize; 5] {
        let mut counts = [0; 5];
        for a in &self.arrivals {
            counts[a.kind.index()] += 1;
        }
        counts
    }

    /// Convert into the cycle-keyed queue consumed by the driver.
    pub fn into_queue(self) -> ArrivalQueue {
        let mut queue = ArrivalQueue::new();
        for a in self.arrivals {
            queue.push(a.cycle, a.kind);
        }
        queue
    }
}
