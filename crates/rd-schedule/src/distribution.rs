//! Arrival-time distributions and the schedule generator.
//!
//! Every distribution draws arrival cycles on `[0, cycles - 1]` and rounds to
//! the nearest integer cycle:
//!
//! | Variant       | Shape                                                     |
//! |---------------|-----------------------------------------------------------|
//! | `Uniform`     | integer-uniform                                           |
//! | `Normal`      | mean `cycles/2`, sd `cycles/3`, truncated by rejection    |
//! | `Linear`      | triangular with the mode at the last cycle (ramp up)      |
//! | `Exponential` | scale `cycles/32`, truncated, reflected to cluster late   |
//!
//! Normal and exponential draws come from `rand_distr`; truncation is by
//! rejection.
//!
//! Incident kinds are drawn independently with [`KindSampler`].

use std::fmt;
use std::str::FromStr;

use log::debug;
use rand::distributions::{Distribution, WeightedIndex};

use rd_core::{Cycle, IncidentKind, SimRng};

use crate::{ArrivalSchedule, ScheduleError, ScheduleResult, ScheduledArrival};

/// How arrival cycles are spread over the run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ArrivalDistribution {
    #[default]
    Uniform,
    Normal,
    Linear,
    Exponential,
}

impl ArrivalDistribution {
    pub const ALL: [ArrivalDistribution; 4] = [
        ArrivalDistribution::Uniform,
        ArrivalDistribution::Normal,
        ArrivalDistribution::Linear,
        ArrivalDistribution::Exponential,
    ];

    /// Draw one arrival cycle in `[0, cycles - 1]`.
    ///
    /// Building the sampler is cheap; [`ArrivalSchedule::generate`] builds it
    /// once per schedule instead.
    pub fn sample_cycle(self, rng: &mut SimRng, cycles: u64) -> ScheduleResult<Cycle> {
        Ok(CycleSampler::new(self, cycles)?.sample(rng))
    }
}

// ── Samplers ──────────────────────────────────────────────────────────────────

/// An [`ArrivalDistribution`] bound to a run length.
enum CycleSampler {
    /// Runs of at most one cycle.
    Zero,
    Uniform     { cycles: u64 },
    Normal      { dist: rand_distr::Normal<f64>, hi: f64 },
    Linear      { hi: f64 },
    Exponential { dist: rand_distr::Exp<f64>, hi: f64 },
}

impl CycleSampler {
    fn new(distribution: ArrivalDistribution, cycles: u64) -> ScheduleResult<Self> {
        if cycles <= 1 {
            return Ok(CycleSampler::Zero);
        }
        let span = cycles as f64;
        let hi = span - 1.0;
        Ok(match distribution {
            ArrivalDistribution::Uniform => CycleSampler::Uniform { cycles },
            ArrivalDistribution::Normal => CycleSampler::Normal {
                dist: rand_distr::Normal::new(span / 2.0, span / 3.0)
                    .map_err(|e| ScheduleError::Distribution(e.to_string()))?,
                hi,
            },
            ArrivalDistribution::Linear => CycleSampler::Linear { hi },
            ArrivalDistribution::Exponential => CycleSampler::Exponential {
                // scale cycles/32
                dist: rand_distr::Exp::new(32.0 / span)
                    .map_err(|e| ScheduleError::Distribution(e.to_string()))?,
                hi,
            },
        })
    }

    fn sample(&self, rng: &mut SimRng) -> Cycle {
        let (x, hi) = match self {
            CycleSampler::Zero => return Cycle::ZERO,
            CycleSampler::Uniform { cycles } => return Cycle(rng.gen_range(0..*cycles)),
            CycleSampler::Normal { dist, hi } => (truncated(dist, rng, *hi), *hi),
            // Inverse CDF of the triangle with its mode at `hi`.
            CycleSampler::Linear { hi } => (hi * rng.random::<f64>().sqrt(), *hi),
            // Reflected so arrivals cluster late.
            CycleSampler::Exponential { dist, hi } => (hi - truncated(dist, rng, *hi), *hi),
        };
        Cycle(x.round().clamp(0.0, hi) as u64)
    }
}

/// Rejection-sample `dist` onto `[0, hi]`.
fn truncated<D: Distribution<f64>>(dist: &D, rng: &mut SimRng, hi: f64) -> f64 {
    loop {
        let x = dist.sample(rng.inner());
        if (0.0..=hi).contains(&x) {
            return x;
        }
    }
}

/// Categorical draw of incident kinds with [`IncidentKind::WEIGHTS`].
pub struct KindSampler(WeightedIndex<f64>);

impl KindSampler {
    pub fn new() -> ScheduleResult<Self> {
        WeightedIndex::new(IncidentKind::WEIGHTS)
            .map(KindSampler)
            .map_err(|e| ScheduleError::Distribution(e.to_string()))
    }

    pub fn sample(&self, rng: &mut SimRng) -> IncidentKind {
        IncidentKind::ALL[self.0.sample(rng.inner())]
    }
}

impl ArrivalSchedule {
    /// Generate `incidents` arrivals over `cycles` cycles.
    pub fn generate(
        distribution: ArrivalDistribution,
        incidents:    usize,
        cycles:       u64,
        rng:          &mut SimRng,
    ) -> ScheduleResult<ArrivalSchedule> {
        let cycle_sampler = CycleSampler::new(distribution, cycles)?;
        let kind_sampler = KindSampler::new()?;
        let arrivals: Vec<ScheduledArrival> = (0..incidents)
            .map(|_| ScheduledArrival {
                cycle: cycle_sampler.sample(rng),
                kind:  kind_sampler.sample(rng),
            })
            .collect();
        let schedule = ArrivalSchedule::new(arrivals);
        debug!(
            "generated {} {} arrivals over {} cycles (per kind {:?})",
            schedule.len(),
            distribution,
            cycles,
            schedule.kind_counts(),
        );
        Ok(schedule)
    }
}

impl fmt::Display for ArrivalDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArrivalDistribution::Uniform     => "uniform",
            ArrivalDistribution::Normal      => "normal",
            ArrivalDistribution::Linear      => "linear",
            ArrivalDistribution::Exponential => "exponential",
        };
        f.write_str(name)
    }
}

impl FromStr for ArrivalDistribution {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform"     => Ok(ArrivalDistribution::Uniform),
            "normal"      => Ok(ArrivalDistribution::Normal),
            "linear"      => Ok(ArrivalDistribution::Linear),
            "exponential" => Ok(ArrivalDistribution::Exponential),
            _ => Err(ScheduleError::UnknownDistribution(s.to_string())),
        }
    }
}
