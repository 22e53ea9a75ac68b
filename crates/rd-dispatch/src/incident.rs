//! The incident lifecycle and its resource accounting.

use rd_core::{Cycle, IncidentId, IncidentKind, NodeId, SimRng};

/// One active incident.
///
/// `remaining` starts at the sampled need and only decreases: each cycle,
/// every responder selected to operate takes one unit off it.  The incident
/// resolves when it reaches zero.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Incident {
    pub id:            IncidentId,
    pub location:      NodeId,
    pub kind:          IncidentKind,
    /// Cycle the incident was admitted in.
    pub admitted:      Cycle,
    /// Need drawn at creation.
    pub original_need: u32,
    /// Units of work still outstanding.
    pub remaining:     u32,
    /// Cycles since creation, counting the current one.
    pub longevity:     u64,
    /// Longevity at which the first responder operated.  Set once.
    pub response_time: Option<u64>,
}

impl Incident {
    pub fn new(id: IncidentId, location: NodeId, kind: IncidentKind, need: u32, admitted: Cycle) -> Self {
        Self {
            id,
            location,
            kind,
            admitted,
            original_need: need,
            remaining:     need,
            longevity:     0,
            response_time: None,
        }
    }

    /// Draw an initial need uniformly (inclusive) from the kind's range.
    pub fn sample_need(kind: IncidentKind, rng: &mut SimRng) -> u32 {
        rng.gen_range(kind.need_range())
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.remaining == 0
    }

    /// Start a cycle: the incident has now lived one cycle longer.
    #[inline]
    pub fn age(&mut self) {
        self.longevity += 1;
    }

    /// Record that `operated` responders worked this cycle.  The caller caps
    /// `operated` at `remaining`.
    pub fn record_work(&mut self, operated: u32) {
        debug_assert!(operated <= self.remaining);
        self.remaining = self.remaining.saturating_sub(operated);
        if operated > 0 && self.response_time.is_none() {
            self.response_time = Some(self.longevity);
        }
    }

    /// Cycles from first response to now.
    pub fn resolution_time(&self) -> u64 {
        self.longevity - self.response_time.unwrap_or(self.longevity)
    }
}
