//! Whole-run scenario description: topology, fleet, arrivals, run length.

use std::collections::BTreeMap;

use rd_agent::BehaviorMode;
use rd_core::{IncidentKind, SimConfig, SimRng};
use rd_schedule::{ArrivalDistribution, ArrivalSchedule};
use rd_spatial::{BfsRouter, Network, NetworkBuilder};

use crate::{Sim, SimBuilder, SimError, SimResult};

/// Offset of the schedule generator's seed from the run seed, so the
/// schedule does not share a stream with the run itself.
const SCHEDULE_SEED_OFFSET: u64 = 0x5c4e_d01e;

/// Everything needed to build a grid simulation.
///
/// Loadable from JSON with the `serde` feature; missing fields take their
/// [`Default`] values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScenarioConfig {
    /// Grid width in locations.
    pub width:                    u32,
    /// Grid height in locations.
    pub height:                   u32,
    pub responders:               usize,
    /// Scheduled incident arrivals.
    pub incidents:                usize,
    pub behavior:                 BehaviorMode,
    pub distribution:             ArrivalDistribution,
    /// Cycles during which incidents arrive.
    pub cycles:                   u64,
    pub seed:                     u64,
    /// Keep cycling after `cycles` until every incident is resolved.
    pub drain_incidents:          bool,
    /// Responder snapshot interval; 0 disables snapshots.
    pub snapshot_interval_cycles: u64,
    /// Warm-start estimates from a previous run.
    pub estimates:                Option<BTreeMap<IncidentKind, i64>>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            width:                    10,
            height:                   10,
            responders:               20,
            incidents:                200,
            behavior:                 BehaviorMode::Idle,
            distribution:             ArrivalDistribution::Uniform,
            cycles:                   200,
            seed:                     42,
            drain_incidents:          true,
            snapshot_interval_cycles: 0,
            estimates:                None,
        }
    }
}

impl ScenarioConfig {
    /// The reference simulation: 15×15 grid, 100 responders, 1500 incidents
    /// over 1000 cycles.
    pub fn simulation_preset() -> Self {
        Self {
            width:      15,
            height:     15,
            responders: 100,
            incidents:  1_500,
            cycles:     1_000,
            ..Self::default()
        }
    }

    /// Fail fast on values that cannot produce a run.
    pub fn validate(&self) -> SimResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::Config(format!(
                "grid must be at least 1×1, got {}×{}",
                self.width, self.height
            )));
        }
        if self.responders == 0 {
            return Err(SimError::Config("at least one responder is required".into()));
        }
        if self.cycles == 0 {
            return Err(SimError::Config("cycles must be positive".into()));
        }
        Ok(())
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            total_cycles:             self.cycles,
            seed:                     self.seed,
            drain_incidents:          self.drain_incidents,
            snapshot_interval_cycles: self.snapshot_interval_cycles,
        }
    }

    pub fn network(&self) -> Network {
        NetworkBuilder::grid(self.width, self.height).build()
    }

    /// Generate the arrival schedule from `distribution`.
    pub fn generate_schedule(&self) -> SimResult<ArrivalSchedule> {
        let mut rng = SimRng::new(self.seed ^ SCHEDULE_SEED_OFFSET);
        Ok(ArrivalSchedule::generate(self.distribution, self.incidents, self.cycles, &mut rng)?)
    }

    /// Builder for this scenario with the generated schedule.
    pub fn builder(&self) -> SimResult<SimBuilder<BfsRouter>> {
        self.builder_with_schedule(self.generate_schedule()?)
    }

    /// Builder for this scenario with an externally supplied schedule (the
    /// `incidents` and `distribution` fields are ignored).
    pub fn builder_with_schedule(&self, schedule: ArrivalSchedule) -> SimResult<SimBuilder<BfsRouter>> {
        self.validate()?;
        let mut builder = SimBuilder::new(self.sim_config(), self.network(), BfsRouter)
            .fleet(self.responders, self.behavior)
            .schedule(schedule);
        if let Some(estimates) = &self.estimates {
            builder = builder.estimates(estimates.clone());
        }
        Ok(builder)
    }

    /// Build a ready-to-run simulation.
    pub fn build(&self) -> SimResult<Sim<BfsRouter>> {
        self.builder()?.build()
    }
}
