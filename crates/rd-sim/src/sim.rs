//! The `Sim` struct and its cycle loop.

use log::{debug, info};

use rd_agent::AgentRngs;
use rd_core::{Cycle, SimClock, SimConfig, SimRng};
use rd_dispatch::Coordinator;
use rd_schedule::ArrivalQueue;
use rd_spatial::Router;

use crate::{CycleSummary, SimObserver, SimResult};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<R>` holds all simulation state and drives the four-phase cycle:
///
/// 1. **Reconcile**: free responders serve the backlog.
/// 2. **Advance**: incidents age, on-scene responders work, finished
///    incidents resolve and release their responders.
/// 3. **Admit**: arrivals due this cycle become incidents and get their
///    requested responders (or a backlog entry).
/// 4. **Move**: every responder takes one movement step.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<R: Router> {
    /// Run length, seed, drain and snapshot settings.
    pub config: SimConfig,

    /// Simulation clock; tracks the current cycle.
    pub clock: SimClock,

    /// Owns the network, responders, incidents and every registry.
    pub coordinator: Coordinator<R>,

    /// Per-responder deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    /// Arrivals not yet admitted, keyed by cycle.
    pub arrivals: ArrivalQueue,

    /// Incident placement and need draws.
    pub(crate) incident_rng: SimRng,
}

impl<R: Router> Sim<R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until [`is_finished`](Self::is_finished).
    ///
    /// Calls observer hooks at every cycle boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            "starting run: {} responders, {} queued arrivals, {} cycles (drain: {})",
            self.coordinator.responders().len(),
            self.arrivals.len(),
            self.config.total_cycles,
            self.config.drain_incidents,
        );
        while !self.is_finished() {
            self.step(observer)?;
        }
        let end = self.clock.current;
        observer.on_sim_end(end);

        let report = self.coordinator.success_rate();
        info!(
            "run finished at {end}: {} resolved, {} still active",
            report.overall.map_or(0, |r| r.resolved),
            self.coordinator.active_count(),
        );
        Ok(())
    }

    /// Run exactly `n` cycles from the current position (ignores
    /// `total_cycles` and the drain flag).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_cycles<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// `true` once `total_cycles` have run and, when draining, no incident
    /// is active any more.
    pub fn is_finished(&self) -> bool {
        self.clock.current >= self.config.end_cycle()
            && !(self.config.drain_incidents && self.coordinator.has_active_incidents())
    }

    /// Advance one cycle.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<CycleSummary> {
        let now = self.clock.current;
        observer.on_cycle_start(now);

        let summary = self.process_cycle(now, observer)?;
        observer.on_cycle_end(&summary);

        let interval = self.config.snapshot_interval_cycles;
        if interval > 0 && now.0.is_multiple_of(interval) {
            observer.on_snapshot(now, self.coordinator.responders());
        }

        self.clock.advance();
        Ok(summary)
    }

    // ── Core cycle processing ─────────────────────────────────────────────

    fn process_cycle<O: SimObserver>(&mut self, now: Cycle, observer: &mut O) -> SimResult<CycleSummary> {
        // ── Phase 1: backlog ──────────────────────────────────────────────
        let reconciled = self.coordinator.reconcile_backlog()?;

        // ── Phase 2: incident lifecycle ───────────────────────────────────
        //
        // Responders released here keep their location and take their free
        // step in phase 4.
        let resolutions = self.coordinator.advance_incidents(now)?;
        for resolution in &resolutions {
            observer.on_resolution(resolution);
        }

        // ── Phase 3: admit arrivals ───────────────────────────────────────
        let due = self.arrivals.drain_due(now);
        let mut admitted = 0;
        for kind in &due {
            if self.coordinator.admit(*kind, now, &mut self.incident_rng)?.is_some() {
                admitted += 1;
            }
        }

        // ── Phase 4: movement ─────────────────────────────────────────────
        let moved = self.coordinator.move_responders(&mut self.rngs)?;

        #[cfg(debug_assertions)]
        self.coordinator.check_invariants()?;

        let summary = CycleSummary {
            cycle: now,
            admitted,
            dropped: due.len() - admitted,
            resolved: resolutions.len(),
            reconciled,
            moved,
            active: self.coordinator.active_count(),
            backlogged: self.coordinator.backlog().len(),
            available: self.coordinator.available().len(),
            unavailable: self.coordinator.unavailable().len(),
        };
        debug!(
            "{now}: +{admitted} incidents, {} resolved, {} active, {} backlogged",
            summary.resolved, summary.active, summary.backlogged
        );
        Ok(summary)
    }
}
