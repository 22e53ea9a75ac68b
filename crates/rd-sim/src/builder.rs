//! Fluent builder for constructing a [`Sim`].

use std::collections::BTreeMap;

use log::info;

use rd_agent::{AgentRngs, BehaviorMode, FleetBuilder, Responder, StationRegistry};
use rd_core::{IncidentKind, SimClock, SimConfig, SimRng};
use rd_dispatch::{Coordinator, EvaluationModel};
use rd_schedule::ArrivalSchedule;
use rd_spatial::{Network, Router};

use crate::{Sim, SimError, SimResult};

/// Offsets for the [`SimRng`] children, one per global concern.  Children
/// are derived in this order, so adding a concern must append.
const STATION_STREAM:  u64 = 1;
const FLEET_STREAM:    u64 = 2;
const INCIDENT_STREAM: u64 = 3;

/// How the responder table is obtained.
enum Fleet {
    /// Spawn `count` responders under `mode`.
    Spawn { count: usize, mode: BehaviorMode },
    /// Use a prepared table and its RNGs.
    Prepared { responders: Vec<Responder>, rngs: AgentRngs },
}

/// Fluent builder for [`Sim<R>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: total cycles, seed, drain flag, snapshot interval
/// - [`Network`]: the location graph (non-empty and connected)
/// - `R: Router`: the routing algorithm (e.g. [`rd_spatial::BfsRouter`])
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                                       |
/// |----------------------|-----------------------------------------------|
/// | `.fleet(n, mode)`    | 1 Idle responder                              |
/// | `.responders(v, r)`  | (overrides `.fleet`)                          |
/// | `.stations(s)`       | placed randomly when the mode needs stations  |
/// | `.schedule(s)`       | no arrivals                                   |
/// | `.estimates(m)`      | all estimates 0                               |
///
/// # Example
///
/// ```rust,ignore
/// let network = NetworkBuilder::grid(15, 15).build();
/// let mut sim = SimBuilder::new(config, network, BfsRouter)
///     .fleet(100, BehaviorMode::Patrol)
///     .schedule(schedule)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<R: Router> {
    config:    SimConfig,
    network:   Network,
    router:    R,
    fleet:     Fleet,
    stations:  Option<StationRegistry>,
    schedule:  ArrivalSchedule,
    estimates: BTreeMap<IncidentKind, i64>,
}

impl<R: Router> SimBuilder<R> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, network: Network, router: R) -> Self {
        Self {
            config,
            network,
            router,
            fleet:     Fleet::Spawn { count: 1, mode: BehaviorMode::Idle },
            stations:  None,
            schedule:  ArrivalSchedule::empty(),
            estimates: BTreeMap::new(),
        }
    }

    /// Spawn `count` responders whose behavior follows `mode`.
    pub fn fleet(mut self, count: usize, mode: BehaviorMode) -> Self {
        self.fleet = Fleet::Spawn { count, mode };
        self
    }

    /// Supply a prepared responder table.  `rngs` must have one entry per
    /// responder and responder ids must be `0..n` in order.
    pub fn responders(mut self, responders: Vec<Responder>, rngs: AgentRngs) -> Self {
        self.fleet = Fleet::Prepared { responders, rngs };
        self
    }

    /// Use these stations instead of placing them randomly.
    pub fn stations(mut self, stations: StationRegistry) -> Self {
        self.stations = Some(stations);
        self
    }

    pub fn schedule(mut self, schedule: ArrivalSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Warm-start the evaluation model from a previous run's estimates.
    pub fn estimates(mut self, estimates: BTreeMap<IncidentKind, i64>) -> Self {
        self.estimates = estimates;
        self
    }

    /// Validate inputs, place stations, spawn the fleet, and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<R>> {
        // ── Validate the network ──────────────────────────────────────────
        if self.network.is_empty() {
            return Err(SimError::Config("network has no locations".into()));
        }
        self.network.ensure_connected()?;

        let mut rng = SimRng::new(self.config.seed);
        let mut station_rng  = rng.child(STATION_STREAM);
        let mut fleet_rng    = rng.child(FLEET_STREAM);
        let incident_rng     = rng.child(INCIDENT_STREAM);

        // ── Stations ──────────────────────────────────────────────────────
        let needs_stations = match &self.fleet {
            Fleet::Spawn { mode, .. } => mode.uses_stations(),
            Fleet::Prepared { responders, .. } => responders.iter().any(|r| r.home_station.is_some()),
        };
        let stations = match self.stations {
            Some(s) => s,
            None if needs_stations => StationRegistry::place(&self.network, &mut station_rng),
            None => StationRegistry::empty(),
        };

        // ── Responders ────────────────────────────────────────────────────
        let (responders, rngs) = match self.fleet {
            Fleet::Spawn { count, mode } => FleetBuilder::new(count, self.config.seed)
                .mode(mode)
                .build(&self.network, &self.router, &stations, &mut fleet_rng)?,
            Fleet::Prepared { responders, rngs } => {
                if rngs.len() != responders.len() {
                    return Err(SimError::AgentCountMismatch {
                        expected: responders.len(),
                        got:      rngs.len(),
                        what:     "agent RNGs",
                    });
                }
                if let Some((pos, r)) = responders.iter().enumerate().find(|(i, r)| r.id.index() != *i) {
                    return Err(SimError::Config(format!("responder at position {pos} has id {}", r.id)));
                }
                if let Some(r) = responders.iter().find(|r| !self.network.contains(r.location)) {
                    return Err(SimError::Config(format!("{} starts off the network at {}", r.id, r.location)));
                }
                (responders, rngs)
            }
        };
        if responders.is_empty() {
            return Err(SimError::Config("at least one responder is required".into()));
        }

        info!(
            "built network of {} locations / {} links, {} stations, {} responders",
            self.network.node_count(),
            self.network.link_count(),
            stations.len(),
            responders.len(),
        );

        let evaluation = EvaluationModel::with_estimates(&self.estimates);
        let coordinator = Coordinator::new(self.network, self.router, responders, stations, evaluation);

        Ok(Sim {
            clock:        SimClock::new(),
            config:       self.config,
            coordinator,
            rngs,
            arrivals:     self.schedule.into_queue(),
            incident_rng,
        })
    }
}
