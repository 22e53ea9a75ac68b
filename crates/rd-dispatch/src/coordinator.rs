//! The `Coordinator`: owner of every registry and the dispatch policy.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace, warn};

use rd_agent::{AgentRngs, Responder, StationRegistry};
use rd_core::{AgentId, Cycle, IncidentId, IncidentKind, NodeId, RdError, SimRng};
use rd_spatial::{Network, Router, SpatialError};

use crate::{DispatchError, DispatchResult, EvaluationModel, Incident, Resolution, SuccessReport};

#[cfg(feature = "fx-hash")]
type SceneIndex = rustc_hash::FxHashMap<NodeId, Vec<AgentId>>;
#[cfg(not(feature = "fx-hash"))]
type SceneIndex = std::collections::HashMap<NodeId, Vec<AgentId>>;

// ── Coordinator ───────────────────────────────────────────────────────────────

/// Central dispatcher.
///
/// Registry invariants, checked by [`check_invariants`](Self::check_invariants):
///
/// - `available ∩ unavailable = ∅`, and their union is every responder.
/// - A responder is in `unavailable` exactly when it has an assignment, and
///   that assignment names an active incident.
/// - Backlog entries refer to active incidents.
///
/// All registries are ordered collections, so iteration (and therefore every
/// tie-break) is by ascending id.
pub struct Coordinator<R: Router> {
    network:       Network,
    router:        R,
    responders:    Vec<Responder>,
    available:     BTreeSet<AgentId>,
    unavailable:   BTreeSet<AgentId>,
    /// Released this cycle while the backlog was non-empty; new incidents
    /// may not take them until the next reconcile.
    reserved:      BTreeSet<AgentId>,
    active:        BTreeMap<IncidentId, Incident>,
    /// Incident → responders still owed to it.
    backlog:       BTreeMap<IncidentId, u32>,
    evaluation:    EvaluationModel,
    /// Per-kind `(response_time, resolution_time)` of every resolution.
    time_log:      BTreeMap<IncidentKind, Vec<(u64, u64)>>,
    stations:      StationRegistry,
    next_incident: IncidentId,
}

impl<R: Router> Coordinator<R> {
    /// Take ownership of the network, fleet and stations.  Responders that
    /// already carry an assignment start out unavailable.
    pub fn new(
        network:    Network,
        router:     R,
        responders: Vec<Responder>,
        stations:   StationRegistry,
        evaluation: EvaluationModel,
    ) -> Self {
        let (unavailable, available): (BTreeSet<AgentId>, BTreeSet<AgentId>) =
            responders.iter().map(|r| r.id).partition(|id| !responders[id.index()].is_available());
        Self {
            network,
            router,
            responders,
            available,
            unavailable,
            reserved: BTreeSet::new(),
            active: BTreeMap::new(),
            backlog: BTreeMap::new(),
            evaluation,
            time_log: BTreeMap::new(),
            stations,
            next_incident: IncidentId(0),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn responders(&self) -> &[Responder] {
        &self.responders
    }

    pub fn responder(&self, agent: AgentId) -> Option<&Responder> {
        self.responders.get(agent.index())
    }

    pub fn stations(&self) -> &StationRegistry {
        &self.stations
    }

    pub fn evaluation(&self) -> &EvaluationModel {
        &self.evaluation
    }

    pub fn available(&self) -> &BTreeSet<AgentId> {
        &self.available
    }

    pub fn unavailable(&self) -> &BTreeSet<AgentId> {
        &self.unavailable
    }

    pub fn backlog(&self) -> &BTreeMap<IncidentId, u32> {
        &self.backlog
    }

    pub fn incident(&self, id: IncidentId) -> Option<&Incident> {
        self.active.get(&id)
    }

    /// Active incidents in ascending id order.
    pub fn incidents(&self) -> impl Iterator<Item = &Incident> + '_ {
        self.active.values()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn has_active_incidents(&self) -> bool {
        !self.active.is_empty()
    }

    // ── Admission ─────────────────────────────────────────────────────────

    /// Admit a newly arrived incident of `kind` at a random location with no
    /// active incident, draw its need, and dispatch to it.
    ///
    /// Returns `None` (and logs a warning) when every location is occupied.
    pub fn admit(&mut self, kind: IncidentKind, now: Cycle, rng: &mut SimRng) -> DispatchResult<Option<IncidentId>> {
        let occupied: BTreeSet<NodeId> = self.active.values().map(|i| i.location).collect();
        let Some(location) = self.network.random_node_where(rng, |n| !occupied.contains(&n)) else {
            warn!("{now}: dropped {kind} arrival, no free location");
            return Ok(None);
        };
        let need = Incident::sample_need(kind, rng);
        self.open_incident(kind, location, need, now).map(Some)
    }

    /// Create an incident at a known location with a known need, then
    /// dispatch `max(1, estimate)` responders to it.
    pub fn open_incident(
        &mut self,
        kind:     IncidentKind,
        location: NodeId,
        need:     u32,
        now:      Cycle,
    ) -> DispatchResult<IncidentId> {
        if !self.network.contains(location) {
            return Err(SpatialError::NodeNotFound(location).into());
        }
        let id = self.next_incident;
        self.next_incident = id.next();
        self.active.insert(id, Incident::new(id, location, kind, need, now));

        let requested = self.evaluation.requested(kind);
        debug!("{now}: {id} ({kind}, need {need}) at {location}, requesting {requested}");
        self.dispatch(id, requested)?;
        Ok(id)
    }

    // ── Dispatch policy ───────────────────────────────────────────────────

    /// Assign up to `needed` available responders to `incident`, nearest
    /// first (ties to the lowest `AgentId`).  Whatever cannot be covered is
    /// added to the backlog.  Returns how many responders were assigned.
    ///
    /// Responders reserved for the backlog this cycle are not considered.
    pub fn dispatch(&mut self, incident: IncidentId, needed: u32) -> DispatchResult<u32> {
        let target = self
            .active
            .get(&incident)
            .map(|i| i.location)
            .ok_or(RdError::IncidentNotFound(incident))?;

        let candidates: Vec<AgentId> = self.available.difference(&self.reserved).copied().collect();
        let mut ranked = self.plan(&candidates, target)?;
        ranked.sort_unstable();

        let mut assigned = 0;
        for (_, agent) in ranked.into_iter().take(needed as usize) {
            self.assign(agent, incident, target);
            assigned += 1;
        }

        let missing = needed - assigned;
        if missing > 0 {
            *self.backlog.entry(incident).or_insert(0) += missing;
            debug!("{incident}: {missing} responders short, backlogged");
        }
        Ok(assigned)
    }

    /// Serve the backlog with available responders in ascending id order.
    /// Each one goes to the backlogged incident nearest to it (ties to the
    /// lowest `IncidentId`).  Returns how many responders were assigned.
    pub fn reconcile_backlog(&mut self) -> DispatchResult<usize> {
        self.reserved.clear();
        if self.backlog.is_empty() {
            return Ok(0);
        }

        let agents: Vec<AgentId> = self.available.iter().copied().collect();
        let mut assigned = 0;
        for agent in agents {
            if self.backlog.is_empty() {
                break;
            }
            let from = self.responders[agent.index()].location;

            let mut best: Option<(usize, IncidentId, NodeId)> = None;
            for &incident in self.backlog.keys() {
                let target = self
                    .active
                    .get(&incident)
                    .map(|i| i.location)
                    .ok_or(DispatchError::DanglingBacklog(incident))?;
                let len = self.router.path_len(&self.network, from, target)?;
                if best.is_none_or(|(best_len, _, _)| len < best_len) {
                    best = Some((len, incident, target));
                }
            }

            let Some((_, incident, target)) = best else { break };
            self.assign(agent, incident, target);
            assigned += 1;
            if let Some(owed) = self.backlog.get_mut(&incident) {
                *owed -= 1;
                if *owed == 0 {
                    self.backlog.remove(&incident);
                }
            }
            debug!("backlog: {agent} → {incident}");
        }
        Ok(assigned)
    }

    /// Path length from each candidate to `target`, as `(len, agent)` pairs
    /// in candidate order.
    fn plan(&self, candidates: &[AgentId], target: NodeId) -> DispatchResult<Vec<(usize, AgentId)>> {
        let len_of = |agent: &AgentId| -> DispatchResult<(usize, AgentId)> {
            let from = self.responders[agent.index()].location;
            Ok((self.router.path_len(&self.network, from, target)?, *agent))
        };

        #[cfg(not(feature = "parallel"))]
        {
            candidates.iter().map(len_of).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            candidates.par_iter().map(len_of).collect()
        }
    }

    fn assign(&mut self, agent: AgentId, incident: IncidentId, target: NodeId) {
        if self.responders[agent.index()].receive(incident, target) {
            self.available.remove(&agent);
            self.unavailable.insert(agent);
            trace!("{agent} → {incident} at {target}");
        }
    }

    // ── Incident lifecycle ────────────────────────────────────────────────

    /// Age every active incident by one cycle and let on-scene responders
    /// work on it, then resolve the incidents whose need reached zero.
    ///
    /// Per incident, on-scene responders are selected in ascending id order,
    /// at most `remaining` of them.
    pub fn advance_incidents(&mut self, now: Cycle) -> DispatchResult<Vec<Resolution>> {
        let scenes = self.scene_index();

        let mut finished = Vec::new();
        for incident in self.active.values_mut() {
            incident.age();
            let on_scene = scenes.get(&incident.location).map(Vec::as_slice).unwrap_or_default();
            let mut operated = 0;
            for &agent in on_scene {
                if operated == incident.remaining {
                    break;
                }
                let responder = &mut self.responders[agent.index()];
                if responder.incident() == Some(incident.id) && responder.operate() {
                    operated += 1;
                }
            }
            incident.record_work(operated);
            if incident.is_resolved() {
                finished.push(incident.id);
            }
        }

        finished.into_iter().map(|id| self.resolve(id, now)).collect()
    }

    /// Dispatched responders standing at their target, grouped by location.
    fn scene_index(&self) -> SceneIndex {
        let mut index = SceneIndex::default();
        for &agent in &self.unavailable {
            let responder = &self.responders[agent.index()];
            if responder.is_on_scene() {
                index.entry(responder.location).or_default().push(agent);
            }
        }
        index
    }

    /// Close `id`: release its responders, feed the evaluation model and the
    /// time log, and drop it from the active and backlog maps.
    ///
    /// Released responders stay where they are.  If the backlog is still
    /// non-empty they are reserved for it until the next reconcile.
    pub fn resolve(&mut self, id: IncidentId, now: Cycle) -> DispatchResult<Resolution> {
        let incident = self.active.remove(&id).ok_or(RdError::IncidentNotFound(id))?;
        self.backlog.remove(&id);
        // Reservations only hold for the backlog's benefit.
        if self.backlog.is_empty() {
            self.reserved.clear();
        }

        let assigned: Vec<AgentId> = self
            .unavailable
            .iter()
            .copied()
            .filter(|a| self.responders[a.index()].incident() == Some(id))
            .collect();

        let mut severities = Vec::with_capacity(assigned.len());
        for agent in &assigned {
            if let Some(done) = self.responders[agent.index()].end() {
                severities.push(done.severity());
            }
            self.unavailable.remove(agent);
            self.available.insert(*agent);
            if !self.backlog.is_empty() {
                self.reserved.insert(*agent);
            }
        }

        let severity = (!severities.is_empty())
            .then(|| severities.iter().sum::<i64>() as f64 / severities.len() as f64);
        if let Some(severity) = severity {
            self.evaluation.record(incident.kind, severity);
        }

        let response_time = incident.response_time.unwrap_or(incident.longevity);
        let resolution_time = incident.resolution_time();
        self.time_log.entry(incident.kind).or_default().push((response_time, resolution_time));

        debug!(
            "{now}: {id} ({}) resolved, response {response_time}, resolution {resolution_time}, \
             {} responders released",
            incident.kind,
            assigned.len()
        );

        Ok(Resolution {
            incident: id,
            kind: incident.kind,
            location: incident.location,
            admitted: incident.admitted,
            resolved: now,
            original_need: incident.original_need,
            longevity: incident.longevity,
            response_time,
            resolution_time,
            responders: assigned.len(),
            severity,
        })
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Every responder takes its movement step, in ascending id order.
    /// Returns how many changed location.
    pub fn move_responders(&mut self, rngs: &mut AgentRngs) -> DispatchResult<usize> {
        let mut moved = 0;
        for responder in &mut self.responders {
            let rng = rngs.get_mut(responder.id);
            if responder.step(&self.network, &self.router, &self.stations, rng)? {
                moved += 1;
            }
        }
        Ok(moved)
    }

    // ── Reporting ─────────────────────────────────────────────────────────

    /// Number of responders at each occupied location.
    pub fn resource_locations(&self) -> BTreeMap<NodeId, usize> {
        let mut counts = BTreeMap::new();
        for responder in &self.responders {
            *counts.entry(responder.location).or_insert(0) += 1;
        }
        counts
    }

    pub fn success_rate(&self) -> SuccessReport {
        SuccessReport::from_log(&self.time_log)
    }

    pub fn estimates(&self) -> BTreeMap<IncidentKind, i64> {
        self.evaluation.estimates()
    }

    /// The raw per-kind `(response_time, resolution_time)` log.
    pub fn time_log(&self) -> &BTreeMap<IncidentKind, Vec<(u64, u64)>> {
        &self.time_log
    }

    /// Verify the registry invariants; the error names the first violation.
    pub fn check_invariants(&self) -> DispatchResult<()> {
        let mut worked: BTreeMap<IncidentId, u64> = BTreeMap::new();

        for responder in &self.responders {
            let agent = responder.id;
            let in_available = self.available.contains(&agent);
            let in_unavailable = self.unavailable.contains(&agent);
            match (in_available, in_unavailable) {
                (true, true) => return Err(DispatchError::DoubleRegistered { agent }),
                (false, false) => return Err(DispatchError::Unregistered { agent }),
                _ => {}
            }
            let assigned = responder.assignment().is_some();
            if assigned != in_unavailable {
                return Err(DispatchError::AssignmentMismatch { agent, assigned });
            }
            if let Some(a) = responder.assignment() {
                if !self.active.contains_key(&a.incident) {
                    return Err(DispatchError::DanglingAssignment { agent, incident: a.incident });
                }
                *worked.entry(a.incident).or_insert(0) += a.dispatch_time;
            }
        }

        for incident in self.active.values() {
            let done = incident.original_need - incident.remaining;
            let recorded = worked.get(&incident.id).copied().unwrap_or(0);
            if recorded != done as u64 {
                return Err(DispatchError::WorkMismatch { incident: incident.id, recorded, done });
            }
        }

        if let Some(&incident) = self.backlog.keys().find(|id| !self.active.contains_key(id)) {
            return Err(DispatchError::DanglingBacklog(incident));
        }
        Ok(())
    }
}
