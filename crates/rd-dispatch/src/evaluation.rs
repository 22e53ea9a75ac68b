//! Adaptive estimate of how many responders each incident kind needs.

use std::collections::BTreeMap;

use rd_core::IncidentKind;

/// Per-kind severity history and the rolling estimate derived from it.
///
/// The estimate is the truncated mean of every severity ever recorded for
/// the kind, starting at 0.  New incidents request `max(1, estimate)`
/// responders.
#[derive(Clone, Debug, Default)]
pub struct EvaluationModel {
    history:   [Vec<f64>; 5],
    estimates: [i64; 5],
}

impl EvaluationModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed estimates from a previous run.  Seeded values hold until the
    /// kind's first resolution in this run replaces them with the history
    /// mean.
    pub fn with_estimates(estimates: &BTreeMap<IncidentKind, i64>) -> Self {
        let mut model = Self::default();
        for (&kind, &estimate) in estimates {
            model.estimates[kind.index()] = estimate;
        }
        model
    }

    /// Responders to send to a newly arriving incident of `kind`.
    #[inline]
    pub fn requested(&self, kind: IncidentKind) -> u32 {
        self.estimates[kind.index()].max(1) as u32
    }

    pub fn estimate(&self, kind: IncidentKind) -> i64 {
        self.estimates[kind.index()]
    }

    pub fn history(&self, kind: IncidentKind) -> &[f64] {
        &self.history[kind.index()]
    }

    /// Append an incident severity and recompute the kind's estimate.
    pub fn record(&mut self, kind: IncidentKind, severity: f64) {
        let history = &mut self.history[kind.index()];
        history.push(severity);
        let mean = history.iter().sum::<f64>() / history.len() as f64;
        self.estimates[kind.index()] = mean.trunc() as i64;
    }

    /// Current estimate for every kind.
    pub fn estimates(&self) -> BTreeMap<IncidentKind, i64> {
        IncidentKind::ALL.iter().map(|&k| (k, self.estimate(k))).collect()
    }
}
