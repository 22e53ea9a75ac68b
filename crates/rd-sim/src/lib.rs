//! `rd-sim` — cycle loop driver for the rust_dispatch simulator.
//!
//! # Cycle loop
//!
//! ```text
//! while !finished:
//!   ① Reconcile — free responders serve backlogged incidents.
//!   ② Advance   — incidents age; on-scene responders work; incidents whose
//!                 need reached zero resolve and release their responders.
//!   ③ Admit     — arrivals due this cycle are placed on a free location
//!                 and dispatched max(1, estimate) responders.
//!   ④ Move      — each responder steps toward its target, or follows its
//!                 free behavior.
//! ```
//!
//! `finished` means `total_cycles` cycles have run and, when
//! `drain_incidents` is set, no incident is still active.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Rayon path-length planning in each dispatch.           |
//! | `fx-hash`  | FxHash for the on-scene index.                         |
//! | `serde`    | `ScenarioConfig` round-trips through JSON.             |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rd_sim::{NoopObserver, ScenarioConfig};
//!
//! let mut sim = ScenarioConfig::simulation_preset().build()?;
//! sim.run(&mut NoopObserver)?;
//! println!("{}", sim.coordinator.success_rate());
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod scenario;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{CycleSummary, NoopObserver, SimObserver};
pub use scenario::ScenarioConfig;
pub use sim::Sim;
