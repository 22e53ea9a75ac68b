//! `rd-schedule` — incident arrival schedules.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                  |
//! |------------------|-----------------------------------------------------------|
//! | [`arrival`]      | `ScheduledArrival`, `ArrivalSchedule`                     |
//! | [`distribution`] | `ArrivalDistribution`, `KindSampler`, schedule generator  |
//! | [`queue`]        | `ArrivalQueue` (`BTreeMap<Cycle, Vec<IncidentKind>>`)     |
//! | [`loader`]       | `load_schedule_csv`, `load_schedule_reader`               |
//! | [`error`]        | `ScheduleError`, `ScheduleResult<T>`                      |
//!
//! A schedule is produced once before the run starts, either generated from
//! a distribution or loaded from CSV, then converted into an `ArrivalQueue`
//! that the driver drains one cycle at a time.

pub mod arrival;
pub mod distribution;
pub mod error;
pub mod loader;
pub mod queue;

#[cfg(test)]
mod tests;

pub use arrival::{ArrivalSchedule, ScheduledArrival};
pub use distribution::{ArrivalDistribution, KindSampler};
pub use error::{ScheduleError, ScheduleResult};
pub use loader::{load_schedule_csv, load_schedule_reader};
pub use queue::ArrivalQueue;
