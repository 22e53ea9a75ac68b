//! The responder and its dispatch state machine.

use log::trace;

use rd_core::{AgentId, AgentRng, IncidentId, NodeId};
use rd_spatial::{Network, Router};

use crate::{AgentResult, Behavior, StationRegistry};

/// An active assignment: which incident, where, and the two timers that
/// make up the responder's severity when the incident resolves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub incident: IncidentId,
    /// Location of the incident.
    pub target: NodeId,
    /// Cycles spent on scene operating on the incident.
    pub dispatch_time: u64,
    /// Cycles spent moving toward `target`.
    pub travel_time: u64,
}

impl Assignment {
    /// `dispatch_time + travel_time`, or `-1` if the responder never operated.
    pub fn severity(&self) -> i64 {
        if self.dispatch_time > 0 {
            (self.dispatch_time + self.travel_time) as i64
        } else {
            -1
        }
    }
}

/// Observable state of a responder, derived from its location, behavior and
/// assignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    AvailableIdle,
    AvailablePatrolling,
    AvailableReturningToStation,
    DispatchedEnRoute,
    DispatchedOnScene,
}

impl Phase {
    pub fn is_available(self) -> bool {
        matches!(
            self,
            Phase::AvailableIdle | Phase::AvailablePatrolling | Phase::AvailableReturningToStation
        )
    }
}

/// One dispatchable unit.
///
/// Invariant: `assignment.is_some()` exactly when the responder is
/// dispatched.  The coordinator mirrors this in its available/unavailable
/// sets.
#[derive(Clone, Debug)]
pub struct Responder {
    pub id:           AgentId,
    pub location:     NodeId,
    pub behavior:     Behavior,
    /// Home station for Station behavior; `None` otherwise.
    pub home_station: Option<NodeId>,
    assignment:       Option<Assignment>,
}

impl Responder {
    pub fn new(id: AgentId, location: NodeId, behavior: Behavior, home_station: Option<NodeId>) -> Self {
        Self { id, location, behavior, home_station, assignment: None }
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.assignment.is_none()
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    /// The incident this responder is working on, if any.
    pub fn incident(&self) -> Option<IncidentId> {
        self.assignment.as_ref().map(|a| a.incident)
    }

    /// `true` when dispatched and standing at the incident location.
    #[inline]
    pub fn is_on_scene(&self) -> bool {
        self.assignment.as_ref().is_some_and(|a| a.target == self.location)
    }

    pub fn phase(&self, stations: &StationRegistry) -> Phase {
        match (&self.assignment, self.behavior) {
            (Some(a), _) if a.target == self.location => Phase::DispatchedOnScene,
            (Some(_), _) => Phase::DispatchedEnRoute,
            (None, Behavior::Idle) => Phase::AvailableIdle,
            (None, Behavior::Patrol) => Phase::AvailablePatrolling,
            (None, Behavior::Station) if stations.contains(self.location) => Phase::AvailableIdle,
            (None, Behavior::Station) => Phase::AvailableReturningToStation,
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Accept an incident at `target`.
    ///
    /// Returns `false` and leaves the current assignment untouched if the
    /// responder is already dispatched.
    pub fn receive(&mut self, incident: IncidentId, target: NodeId) -> bool {
        if let Some(current) = &self.assignment {
            trace!(
                "{} ignored {incident}: already assigned to {}",
                self.id, current.incident
            );
            return false;
        }
        self.assignment = Some(Assignment {
            incident,
            target,
            dispatch_time: 0,
            travel_time:   0,
        });
        true
    }

    /// Release the responder, returning the finished assignment.
    pub fn end(&mut self) -> Option<Assignment> {
        self.assignment.take()
    }

    /// Count one cycle of on-scene work.  Returns `false` (and does nothing)
    /// unless the responder is on scene.
    pub fn operate(&mut self) -> bool {
        match &mut self.assignment {
            Some(a) if a.target == self.location => {
                a.dispatch_time += 1;
                true
            }
            _ => false,
        }
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Take this cycle's movement step.  Returns `true` if the location
    /// changed.
    ///
    /// Dispatched responders advance one location toward their target.
    /// Available responders follow their [`Behavior`].
    pub fn step<R: Router>(
        &mut self,
        network:  &Network,
        router:   &R,
        stations: &StationRegistry,
        rng:      &mut AgentRng,
    ) -> AgentResult<bool> {
        let next = match (&mut self.assignment, self.behavior) {
            (Some(a), _) => {
                if a.target == self.location {
                    return Ok(false);
                }
                let path = router.shortest_path(network, self.location, a.target)?;
                a.travel_time += 1;
                path.next_step()
            }
            (None, Behavior::Idle) => None,
            (None, Behavior::Patrol) => rng.choose(network.neighbors(self.location)).copied(),
            (None, Behavior::Station) => {
                match self.home_station {
                    Some(home) if !stations.contains(self.location) => {
                        router.shortest_path(network, self.location, home)?.next_step()
                    }
                    _ => None,
                }
            }
        };

        match next {
            Some(node) if node != self.location => {
                self.location = node;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
