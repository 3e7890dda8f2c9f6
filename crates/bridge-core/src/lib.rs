//! `bridge-core` — foundational types for the single-lane bridge simulator.
//!
//! This crate is a dependency of every other `bridge-*` crate.  It has no
//! `bridge-*` dependencies and only `thiserror` plus optional `serde`.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`direction`]   | `Direction`, `DirectionMap<T>`                        |
//! | [`ids`]         | `VehicleId`                                           |
//! | [`vehicle`]     | `Vehicle`                                             |
//! | [`time`]        | `TimeScale` (abstract time units ↔ wall clock)        |
//! | [`config`]      | `BridgeConfig`                                        |
//! | [`error`]       | `BridgeError`, `BridgeResult`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod direction;
pub mod error;
pub mod ids;
pub mod time;
pub mod vehicle;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{BridgeConfig, DEFAULT_CROSSING_DURATION, DEFAULT_MAX_CONSECUTIVE};
pub use direction::{Direction, DirectionMap};
pub use error::{BridgeError, BridgeResult};
pub use ids::VehicleId;
pub use time::TimeScale;
pub use vehicle::{Vehicle, sort_by_arrival};
