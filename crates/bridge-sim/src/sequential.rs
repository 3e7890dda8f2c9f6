//! `SequentialEngine` — deterministic single-threaded replay of the policy.
//!
//! # Event loop
//!
//! ```text
//! clock = 0
//! loop:
//!   enqueue every pending vehicle with arrival_time ≤ clock
//!   if both queues are empty:
//!       stop if nothing is pending, else jump clock to the next arrival
//!   decide() → admit head, wait = clock − arrival_time
//!   clock += crossing_duration → release
//! ```
//!
//! The clock only ever jumps to the next event, so the run costs the
//! initial sort plus O(1) per vehicle.  The same [`decide`] function and
//! ledger transitions as the threaded arbiter are used, which makes this
//! engine the reference the concurrent one is checked against.

use std::collections::VecDeque;

use tracing::{debug, info};

use bridge_core::{sort_by_arrival, BridgeConfig, Vehicle};
use bridge_policy::decide;

use crate::arbiter::Ledger;
use crate::{Crossing, CrossingObserver, NoopObserver, SimResult, Statistics, StatsSnapshot};

/// Result of one sequential replay.
#[derive(Clone, Debug)]
pub struct SequentialRun {
    pub statistics: StatsSnapshot,
    pub raw:        Statistics,
    /// Crossings in admission order.
    pub crossings:  Vec<Crossing>,
    /// Virtual time at which the last vehicle left the bridge.
    pub end_time:   f64,
}

/// Virtual-clock engine over a complete arrival list.
pub struct SequentialEngine<O: CrossingObserver = NoopObserver> {
    config:   BridgeConfig,
    observer: O,
}

impl SequentialEngine<NoopObserver> {
    pub fn new(config: BridgeConfig) -> SimResult<Self> {
        Self::with_observer(config, NoopObserver)
    }
}

impl<O: CrossingObserver> SequentialEngine<O> {
    pub fn with_observer(config: BridgeConfig, observer: O) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config, observer })
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Replay `vehicles` from an empty bridge at time zero.
    ///
    /// Fails only if two vehicles share an id while both wait in the same
    /// direction.
    pub fn simulate(&self, vehicles: &[Vehicle]) -> SimResult<SequentialRun> {
        let mut pending: Vec<Vehicle> = vehicles.to_vec();
        sort_by_arrival(&mut pending);
        let mut pending = VecDeque::from(pending);

        let crossing_time = self.config.crossing_duration;
        let mut ledger = Ledger::new(&self.config);
        let mut crossings = Vec::with_capacity(pending.len());
        let mut clock = 0.0_f64;

        loop {
            while let Some(v) = pending.front().filter(|v| v.arrival_time <= clock).copied() {
                pending.pop_front();
                ledger.enqueue(v)?;
                self.observer.on_arrival(&v);
            }

            let Some(decision) = decide(&ledger.state, &ledger.queues) else {
                match pending.front() {
                    Some(next) => {
                        clock = next.arrival_time;
                        continue;
                    }
                    None => break,
                }
            };

            let Some(head) = ledger.queues.head(decision.direction).copied() else {
                unreachable!("decided direction {} has an empty queue", decision.direction);
            };
            let waiting_time = (clock - head.arrival_time).max(0.0);
            let Some(crossing) = ledger.admit(decision, clock, waiting_time, crossing_time) else {
                unreachable!("decided vehicle {} missing from its queue", decision.vehicle);
            };
            self.observer.on_admit(&crossing);

            clock += crossing_time;
            ledger.release(&crossing);
            self.observer.on_exit(&crossing);
            debug!(
                vehicle = %crossing.vehicle.id,
                direction = %crossing.vehicle.direction,
                reason = %crossing.reason,
                wait = waiting_time,
                at = crossing.admitted_at,
                "vehicle crossed"
            );
            crossings.push(crossing);
        }

        info!(crossed = crossings.len(), end_time = clock, "sequential run finished");
        Ok(SequentialRun {
            statistics: ledger.stats.snapshot(),
            raw: ledger.stats,
            crossings,
            end_time: clock,
        })
    }
}
