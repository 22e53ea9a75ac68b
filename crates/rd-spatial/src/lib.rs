//! `rd-spatial` — location graph and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `Network` (CSR adjacency), `NetworkBuilder`, grid builder   |
//! | [`router`]  | `Router` trait, `Path`, `BfsRouter`                         |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! The dispatch engine only ever asks three things of this crate: an ordered
//! path between two locations (source first), the neighbors of a location,
//! and a random location, optionally filtered.

pub mod error;
pub mod network;
pub mod router;


pub use error::{SpatialError, SpatialResult};
pub use network::{Network, NetworkBuilder};
pub use router::{BfsRouter, Path, Router};
