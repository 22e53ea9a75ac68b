//! Fluent builder for constructing the responder table and `AgentRngs` in
//! one step.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rd_agent::{BehaviorMode, FleetBuilder, StationRegistry};
//!
//! let (responders, rngs) = FleetBuilder::new(100, /*seed=*/ 42)
//!     .mode(BehaviorMode::Mix)
//!     .build(&network, &BfsRouter, &stations, &mut placement_rng)?;
//! ```

use log::debug;

use rd_core::{AgentId, SimRng};
use rd_spatial::{Network, Router};

use crate::{AgentError, AgentResult, AgentRngs, Behavior, BehaviorMode, Responder, StationRegistry};

/// Fluent builder for the responder table plus [`AgentRngs`].
///
/// Spawn rules:
///
/// | Behavior  | Spawn location          | Home station                  |
/// |-----------|-------------------------|-------------------------------|
/// | `Idle`    | uniformly random node   | none                          |
/// | `Patrol`  | uniformly random node   | none                          |
/// | `Station` | uniformly random station| nearest station to the spawn  |
pub struct FleetBuilder {
    count: usize,
    seed:  u64,
    mode:  BehaviorMode,
}

impl FleetBuilder {
    /// Create a builder for `count` responders; `seed` seeds their RNGs.
    pub fn new(count: usize, seed: u64) -> Self {
        Self { count, seed, mode: BehaviorMode::default() }
    }

    pub fn mode(mut self, mode: BehaviorMode) -> Self {
        self.mode = mode;
        self
    }

    /// Draw each responder's behavior and spawn point, in ascending id order.
    ///
    /// Fails with [`AgentError::NoStations`] if a Station responder is drawn
    /// while the registry is empty.
    pub fn build<R: Router>(
        self,
        network:  &Network,
        router:   &R,
        stations: &StationRegistry,
        rng:      &mut SimRng,
    ) -> AgentResult<(Vec<Responder>, AgentRngs)> {
        let mut responders = Vec::with_capacity(self.count);
        for i in 0..self.count {
            let id = AgentId(i as u32);
            let behavior = self.mode.pick(rng);

            let (location, home) = match behavior {
                Behavior::Station => {
                    let spawn = stations.random(rng).ok_or(AgentError::NoStations)?;
                    (spawn, stations.nearest(network, router, spawn)?)
                }
                Behavior::Idle | Behavior::Patrol => {
                    let spawn = network.random_node(rng).ok_or(AgentError::EmptyNetwork)?;
                    (spawn, None)
                }
            };
            responders.push(Responder::new(id, location, behavior, home));
        }
        debug!("spawned {} responders ({} mode)", responders.len(), self.mode);

        let rngs = AgentRngs::new(self.count, self.seed);
        Ok((responders, rngs))
    }
}
