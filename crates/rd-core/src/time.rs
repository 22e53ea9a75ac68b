//! Simulation time model.
//!
//! Time is a monotonically increasing [`Cycle`] counter.  One cycle is one
//! full pass of the dispatch loop (backlog, incidents, arrivals, movement);
//! there is no mapping to wall-clock time.

use std::fmt;

// ── Cycle ─────────────────────────────────────────────────────────────────────

/// An absolute simulation cycle index.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cycle(pub u64);

impl Cycle {
    pub const ZERO: Cycle = Cycle(0);

    /// The cycle `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Cycle {
        Cycle(self.0 + n)
    }

    /// Cycles elapsed from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: Cycle) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Cycle {
    type Output = Cycle;
    #[inline]
    fn add(self, rhs: u64) -> Cycle {
        Cycle(self.0 + rhs)
    }
}

impl std::ops::Sub for Cycle {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Cycle) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current cycle.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    pub current: Cycle,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current = self.current + 1;
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.current)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Run-length and reproducibility settings for one simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Cycles during which scheduled incidents may arrive.
    pub total_cycles: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Keep cycling past `total_cycles` until no incident is active.
    pub drain_incidents: bool,

    /// Emit a responder snapshot every N cycles.  0 disables snapshots.
    pub snapshot_interval_cycles: u64,
}

impl SimConfig {
    /// First cycle at which no new arrivals are admitted.
    #[inline]
    pub fn end_cycle(&self) -> Cycle {
        Cycle(self.total_cycles)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_cycles:             1_000,
            seed:                     42,
            drain_incidents:          true,
            snapshot_interval_cycles: 0,
        }
    }
}
