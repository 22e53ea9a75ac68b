//! `rd-dispatch` — the dispatch engine.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`coordinator`] | `Coordinator` — registries, dispatch, backlog, resolution   |
//! | [`incident`]    | `Incident` — need, longevity, response time                 |
//! | [`evaluation`]  | `EvaluationModel` — per-kind rolling responder estimate     |
//! | [`report`]      | `Resolution`, `SuccessRate`, `SuccessReport`                |
//! | [`error`]       | `DispatchError`, `DispatchResult<T>`                        |
//!
//! # Cycle protocol
//!
//! The driver calls the coordinator in a fixed order every cycle:
//!
//! ```text
//! ① reconcile_backlog()   — free responders serve backlogged incidents
//! ② advance_incidents()   — age, operate, resolve, release responders
//! ③ admit() per arrival   — place incident, dispatch max(1, estimate)
//! ④ move_responders()     — en-route step or free behavior
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | Path lengths for a dispatch are computed on Rayon.          |
//! | `fx-hash`  | FxHash for the per-cycle on-scene index.                    |
//! | `serde`    | `Serialize` on incidents and reports.                       |

pub mod coordinator;
pub mod error;
pub mod evaluation;
pub mod incident;
pub mod report;

#[cfg(test)]
mod tests;

pub use coordinator::Coordinator;
pub use error::{DispatchError, DispatchResult};
pub use evaluation::EvaluationModel;
pub use incident::Incident;
pub use report::{Resolution, SuccessRate, SuccessReport};
