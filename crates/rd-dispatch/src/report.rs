//! Resolution records and the success-rate report.

use std::collections::BTreeMap;
use std::fmt;

use rd_core::{Cycle, IncidentId, IncidentKind, NodeId};

// ── Resolution ────────────────────────────────────────────────────────────────

/// What happened to one incident, emitted when it resolves.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Resolution {
    pub incident:        IncidentId,
    pub kind:            IncidentKind,
    pub location:        NodeId,
    pub admitted:        Cycle,
    /// Cycle during which the last unit of work was done.
    pub resolved:        Cycle,
    pub original_need:   u32,
    /// Cycles from admission to resolution, the admission cycle excluded.
    pub longevity:       u64,
    pub response_time:   u64,
    /// `longevity - response_time`.
    pub resolution_time: u64,
    /// Responders released by the resolution.
    pub responders:      usize,
    /// Mean responder severity; `None` if no responder was collected.
    pub severity:        Option<f64>,
}

impl Resolution {
    #[inline]
    pub fn is_success(&self) -> bool {
        self.kind.is_success(self.response_time, self.resolution_time)
    }
}

// ── SuccessReport ─────────────────────────────────────────────────────────────

/// Resolved and successful counts for one kind, or for all kinds together.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SuccessRate {
    pub resolved:   usize,
    pub successful: usize,
}

impl SuccessRate {
    /// Fraction of resolutions that met both ceilings, in `[0, 1]`.
    pub fn rate(&self) -> f64 {
        if self.resolved == 0 {
            0.0
        } else {
            self.successful as f64 / self.resolved as f64
        }
    }

    fn add(&mut self, other: SuccessRate) {
        self.resolved += other.resolved;
        self.successful += other.successful;
    }
}

/// Success rates per kind plus the aggregate.
///
/// Kinds with no resolutions are absent; `overall` is `None` when nothing
/// resolved at all.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SuccessReport {
    pub by_kind: BTreeMap<IncidentKind, SuccessRate>,
    pub overall: Option<SuccessRate>,
}

impl SuccessReport {
    /// Build from a per-kind `(response_time, resolution_time)` log.
    pub fn from_log(log: &BTreeMap<IncidentKind, Vec<(u64, u64)>>) -> Self {
        let mut by_kind = BTreeMap::new();
        let mut overall: Option<SuccessRate> = None;
        for (&kind, times) in log {
            if times.is_empty() {
                continue;
            }
            let rate = SuccessRate {
                resolved:   times.len(),
                successful: times.iter().filter(|&&(resp, res)| kind.is_success(resp, res)).count(),
            };
            overall.get_or_insert_with(SuccessRate::default).add(rate);
            by_kind.insert(kind, rate);
        }
        Self { by_kind, overall }
    }
}

impl fmt::Display for SuccessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(overall) = self.overall else {
            return writeln!(f, "no incidents resolved");
        };
        for (kind, rate) in &self.by_kind {
            writeln!(
                f,
                "{kind}: {:>6.2}% ({}/{})",
                rate.rate() * 100.0,
                rate.successful,
                rate.resolved
            )?;
        }
        writeln!(
            f,
            "total:  {:>6.2}% ({}/{})",
            overall.rate() * 100.0,
            overall.successful,
            overall.resolved
        )
    }
}
