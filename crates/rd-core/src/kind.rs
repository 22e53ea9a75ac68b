//! The five ordinal incident severity classes.

use std::fmt;
use std::ops::RangeInclusive;

use crate::{RdError, RdResult};

/// Incident severity class.  The numeric type (`1..=5`) is what schedules,
/// CSV files and reports use.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub enum IncidentKind {
    Minor,
    Moderate,
    Serious,
    Severe,
    Critical,
}

impl IncidentKind {
    /// All kinds in ascending severity order.
    pub const ALL: [IncidentKind; 5] = [
        IncidentKind::Minor,
        IncidentKind::Moderate,
        IncidentKind::Serious,
        IncidentKind::Severe,
        IncidentKind::Critical,
    ];

    /// Arrival probability of each kind, indexed like [`ALL`](Self::ALL).
    pub const WEIGHTS: [f64; 5] = [0.30, 0.25, 0.20, 0.15, 0.10];

    /// Parse the numeric incident type (`1..=5`).
    pub fn from_type(n: u32) -> RdResult<Self> {
        match n {
            1 => Ok(IncidentKind::Minor),
            2 => Ok(IncidentKind::Moderate),
            3 => Ok(IncidentKind::Serious),
            4 => Ok(IncidentKind::Severe),
            5 => Ok(IncidentKind::Critical),
            other => Err(RdError::InvalidIncidentKind(other)),
        }
    }

    /// Numeric incident type, `1..=5`.
    #[inline]
    pub fn type_number(self) -> u32 {
        self.index() as u32 + 1
    }

    /// Zero-based index for per-kind arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inclusive range the initial resource need is drawn from.
    pub fn need_range(self) -> RangeInclusive<u32> {
        match self {
            IncidentKind::Minor    => 4..=8,
            IncidentKind::Moderate => 10..=15,
            IncidentKind::Serious  => 25..=35,
            IncidentKind::Severe   => 55..=70,
            IncidentKind::Critical => 100..=150,
        }
    }

    /// Maximum cycles until first response that still counts as a success.
    pub fn first_response_ceiling(self) -> u64 {
        [12, 10, 8, 7, 5][self.index()]
    }

    /// Maximum cycles from first response to resolution that still counts as
    /// a success.
    pub fn resolution_ceiling(self) -> u64 {
        [5, 6, 8, 12, 16][self.index()]
    }

    /// `true` if a `(response_time, resolution_time)` pair met both ceilings.
    #[inline]
    pub fn is_success(self, response_time: u64, resolution_time: u64) -> bool {
        response_time <= self.first_response_ceiling()
            && resolution_time <= self.resolution_ceiling()
    }
}

impl TryFrom<u32> for IncidentKind {
    type Error = RdError;
    fn try_from(n: u32) -> RdResult<Self> {
        IncidentKind::from_type(n)
    }
}

impl From<IncidentKind> for u32 {
    fn from(kind: IncidentKind) -> u32 {
        kind.type_number()
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type {}", self.type_number())
    }
}
