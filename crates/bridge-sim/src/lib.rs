//! `bridge-sim` — the bridge arbiter and the two engines that drive it.
//!
//! # Components
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`arbiter`]    | `BridgeArbiter`: mutex + condvar, blocking `cross`         |
//! | [`concurrent`] | `ConcurrentEngine`: one thread per vehicle, `RunReport`    |
//! | [`sequential`] | `SequentialEngine`: virtual-clock replay, `SequentialRun`  |
//! | [`stats`]      | `Statistics` accumulators, `StatsSnapshot` report          |
//! | [`crossing`]   | `Crossing` record produced for each admission              |
//! | [`observer`]   | `CrossingObserver` hooks, `NoopObserver`                   |
//! | [`error`]      | `SimError`, `SimResult<T>`                                 |
//!
//! Both engines consult the same [`bridge_policy::decide`] and apply the
//! same ledger transitions, so for a given input they agree on how many
//! vehicles crossed in each direction.  Waiting times differ in value: the
//! concurrent engine measures wall-clock delay, the sequential engine
//! computes it from a virtual clock.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use bridge_core::{BridgeConfig, Direction, Vehicle};
//! use bridge_sim::{ConcurrentEngine, SequentialEngine};
//!
//! let input = vec![
//!     Vehicle::new(1, 0.0, Direction::AToB),
//!     Vehicle::new(2, 0.0, Direction::BToA),
//! ];
//! let oracle = SequentialEngine::new(BridgeConfig::default())?.simulate(&input)?;
//! let report = ConcurrentEngine::new(BridgeConfig::default())?.run(&input)?;
//! assert_eq!(oracle.statistics.total_crossed, report.statistics.total_crossed);
//! ```

pub mod arbiter;
pub mod concurrent;
pub mod crossing;
pub mod error;
pub mod observer;
pub mod sequential;
pub mod stats;

#[cfg(test)]
mod tests;

pub use arbiter::BridgeArbiter;
pub use concurrent::{ConcurrentEngine, RunReport, DEFAULT_RUN_TIMEOUT};
pub use crossing::Crossing;
pub use error::{SimError, SimResult};
pub use observer::{CrossingObserver, NoopObserver};
pub use sequential::{SequentialEngine, SequentialRun};
pub use stats::{DirectionSummary, DirectionTotals, Statistics, StatsSnapshot};
