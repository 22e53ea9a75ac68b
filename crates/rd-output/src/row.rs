//! Plain data row types written by output backends.

use rd_agent::Responder;
use rd_core::Cycle;
use rd_dispatch::Resolution;
use rd_sim::CycleSummary;

/// Sentinel for "no incident" / "no target" columns.
pub const NONE_ID: u32 = u32::MAX;

/// One responder's state at a snapshot cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponderSnapshotRow {
    pub cycle:        u64,
    pub responder_id: u32,
    pub location:     u32,
    pub behavior:     &'static str,
    /// Assigned incident; [`NONE_ID`] when available.
    pub incident_id:  u32,
    /// Incident location; [`NONE_ID`] when available.
    pub target:       u32,
    pub on_scene:     bool,
}

impl ResponderSnapshotRow {
    pub fn new(cycle: Cycle, responder: &Responder) -> Self {
        let assignment = responder.assignment();
        Self {
            cycle:        cycle.0,
            responder_id: responder.id.0,
            location:     responder.location.0,
            behavior:     responder.behavior.name(),
            incident_id:  assignment.map_or(NONE_ID, |a| a.incident.0),
            target:       assignment.map_or(NONE_ID, |a| a.target.0),
            on_scene:     responder.is_on_scene(),
        }
    }
}

/// Registry counts at the end of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummaryRow {
    pub cycle:       u64,
    pub admitted:    u64,
    pub dropped:     u64,
    pub resolved:    u64,
    pub reconciled:  u64,
    pub moved:       u64,
    pub active:      u64,
    pub backlogged:  u64,
    pub available:   u64,
    pub unavailable: u64,
}

impl From<&CycleSummary> for CycleSummaryRow {
    fn from(s: &CycleSummary) -> Self {
        Self {
            cycle:       s.cycle.0,
            admitted:    s.admitted as u64,
            dropped:     s.dropped as u64,
            resolved:    s.resolved as u64,
            reconciled:  s.reconciled as u64,
            moved:       s.moved as u64,
            active:      s.active as u64,
            backlogged:  s.backlogged as u64,
            available:   s.available as u64,
            unavailable: s.unavailable as u64,
        }
    }
}

/// One resolved incident.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionRow {
    pub incident_id:     u32,
    /// Numeric incident type, `1..=5`.
    pub kind:            u32,
    pub location:        u32,
    pub admitted:        u64,
    pub resolved:        u64,
    pub original_need:   u32,
    pub response_time:   u64,
    pub resolution_time: u64,
    pub responders:      u64,
    pub severity:        Option<f64>,
    pub success:         bool,
}

impl From<&Resolution> for ResolutionRow {
    fn from(r: &Resolution) -> Self {
        Self {
            incident_id:     r.incident.0,
            kind:            r.kind.type_number(),
            location:        r.location.0,
            admitted:        r.admitted.0,
            resolved:        r.resolved.0,
            original_need:   r.original_need,
            response_time:   r.response_time,
            resolution_time: r.resolution_time,
            responders:      r.responders as u64,
            severity:        r.severity,
            success:         r.is_success(),
        }
    }
}
