//! `rd-agent` — responders and how they move.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                       |
//! |---------------|----------------------------------------------------------------|
//! | [`fleet`]     | `FleetBuilder` — spawns the responder table and its RNGs       |
//! | [`behavior`]  | `Behavior` (per responder), `BehaviorMode` (per run, incl. Mix)|
//! | [`responder`] | `Responder`, `Assignment`, `Phase` — the dispatch state machine|
//! | [`stations`]  | `StationRegistry` — home locations for Station behavior        |
//! | [`rngs`]      | `AgentRngs` — one deterministic RNG per responder              |
//! | [`error`]     | `AgentError`, `AgentResult<T>`                                 |
//!
//! # State machine
//!
//! ```text
//!            receive()                 location == target
//! Available ──────────► DispatchedEnRoute ─────────────► DispatchedOnScene
//!     ▲                        │                               │
//!     └────────── end() ───────┴───────────────────────────────┘
//! ```
//!
//! While available, a responder's [`Behavior`] decides its movement: Idle
//! stays put, Patrol wanders to a random neighbor, Station heads back to its
//! home station.

pub mod behavior;
pub mod error;
pub mod fleet;
pub mod responder;
pub mod rngs;
pub mod stations;


pub use behavior::{Behavior, BehaviorMode};
pub use error::{AgentError, AgentResult};
pub use fleet::FleetBuilder;
pub use responder::{Assignment, Phase, Responder};
pub use rngs::AgentRngs;
pub use stations::StationRegistry;
