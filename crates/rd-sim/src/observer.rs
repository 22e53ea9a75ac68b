//! Simulation observer trait for progress reporting and data collection.

use rd_agent::Responder;
use rd_core::Cycle;
use rd_dispatch::Resolution;

/// What one cycle did, reported to [`SimObserver::on_cycle_end`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CycleSummary {
    pub cycle:       Cycle,
    /// Arrivals admitted as incidents this cycle.
    pub admitted:    usize,
    /// Arrivals dropped for lack of a free location.
    pub dropped:     usize,
    /// Incidents resolved this cycle.
    pub resolved:    usize,
    /// Responders assigned from the backlog this cycle.
    pub reconciled:  usize,
    /// Responders that changed location this cycle.
    pub moved:       usize,
    /// Active incidents at the end of the cycle.
    pub active:      usize,
    /// Backlogged incidents at the end of the cycle.
    pub backlogged:  usize,
    pub available:   usize,
    pub unavailable: usize,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// cycle loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_cycle_end(&mut self, summary: &CycleSummary) {
///         if summary.cycle.0 % self.interval == 0 {
///             println!("{}: {} active", summary.cycle, summary.active);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each cycle, before any processing.
    fn on_cycle_start(&mut self, _cycle: Cycle) {}

    /// Called once per incident resolved, in incident id order.
    fn on_resolution(&mut self, _resolution: &Resolution) {}

    /// Called at the end of each cycle.
    fn on_cycle_end(&mut self, _summary: &CycleSummary) {}

    /// Called at snapshot intervals (every `config.snapshot_interval_cycles`
    /// cycles), after movement.
    fn on_snapshot(&mut self, _cycle: Cycle, _responders: &[Responder]) {}

    /// Called once after the final cycle completes.
    fn on_sim_end(&mut self, _final_cycle: Cycle) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
