//! `rd-core` — foundational types for the `rust_dispatch` simulator.
//!
//! Every other `rd-*` crate depends on this one.  It has no `rd-*`
//! dependencies and only `rand` and `thiserror` externally (plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                 |
//! |------------|----------------------------------------------------------|
//! | [`ids`]    | `AgentId`, `NodeId`, `IncidentId`                        |
//! | [`kind`]   | `IncidentKind` — the five ordinal severity classes       |
//! | [`time`]   | `Cycle`, `SimClock`, `SimConfig`                         |
//! | [`rng`]    | `AgentRng` (per-responder), `SimRng` (global)            |
//! | [`error`]  | `RdError`, `RdResult`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, kinds and configs.  |

pub mod error;
pub mod ids;
pub mod kind;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{RdError, RdResult};
pub use ids::{AgentId, IncidentId, NodeId};
pub use kind::IncidentKind;
pub use rng::{AgentRng, SimRng};
pub use time::{Cycle, SimClock, SimConfig};
