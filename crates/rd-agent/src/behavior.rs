//! Free-time movement behaviors.

use std::fmt;
use std::str::FromStr;

use rd_core::SimRng;

use crate::AgentError;

/// What a responder does while it has no incident.  Fixed at creation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Behavior {
    /// Never moves on its own.
    Idle,
    /// Moves to a uniformly random neighbor every free cycle.
    Patrol,
    /// Walks back to its home station and waits there.
    Station,
}

impl Behavior {
    pub const ALL: [Behavior; 3] = [Behavior::Idle, Behavior::Patrol, Behavior::Station];

    pub fn name(self) -> &'static str {
        match self {
            Behavior::Idle    => "idle",
            Behavior::Patrol  => "patrol",
            Behavior::Station => "station",
        }
    }
}

/// Run-level behavior setting.  `Mix` assigns each responder one of the
/// three behaviors uniformly at random when the fleet is created.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BehaviorMode {
    #[default]
    Idle,
    Patrol,
    Station,
    Mix,
}

impl BehaviorMode {
    /// `true` if the run needs a station registry.
    pub fn uses_stations(self) -> bool {
        matches!(self, BehaviorMode::Station | BehaviorMode::Mix)
    }

    /// Behavior for the next responder created under this mode.
    pub fn pick(self, rng: &mut SimRng) -> Behavior {
        match self {
            BehaviorMode::Idle    => Behavior::Idle,
            BehaviorMode::Patrol  => Behavior::Patrol,
            BehaviorMode::Station => Behavior::Station,
            BehaviorMode::Mix     => Behavior::ALL[rng.gen_range(0..Behavior::ALL.len())],
        }
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for BehaviorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BehaviorMode::Idle    => "idle",
            BehaviorMode::Patrol  => "patrol",
            BehaviorMode::Station => "station",
            BehaviorMode::Mix     => "mix",
        })
    }
}

impl FromStr for BehaviorMode {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle"    => Ok(BehaviorMode::Idle),
            "patrol"  => Ok(BehaviorMode::Patrol),
            "station" => Ok(BehaviorMode::Station),
            "mix"     => Ok(BehaviorMode::Mix),
            _ => Err(AgentError::UnknownBehavior(s.to_string())),
        }
    }
}
