//! `BridgeArbiter` — the shared, lock-protected bridge used by vehicle agents.
//!
//! # Critical-section discipline
//!
//! All mutable state (`BridgeState`, both wait queues, statistics) lives in
//! one [`Ledger`] behind one `Mutex`.  Nothing reads or writes it outside
//! that lock.  A vehicle passing through [`BridgeArbiter::cross`]:
//!
//! ```text
//! lock → enqueue (with every vehicle arriving at the same instant) → broadcast → unlock
//! lock → while decide() does not name me: wait on `changed`
//!      → pop, begin_crossing → broadcast → unlock
//! sleep(crossing_duration)
//! lock → end_crossing, record stats → broadcast → unlock
//! ```
//!
//! Every state change is followed by `notify_all`: one exit or one
//! direction flip can make a whole queue eligible, so waking a single
//! waiter is not enough.  Waiters block without a timeout; there is no
//! polling.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Instant;

use tracing::{debug, warn};

use bridge_core::{BridgeConfig, DirectionMap, Vehicle, VehicleId};
use bridge_policy::{decide, BridgeState, Decision};
use bridge_queue::{QueueResult, WaitQueues};

use crate::{Crossing, CrossingObserver, NoopObserver, SimError, SimResult, Statistics, StatsSnapshot};

// ── Ledger ────────────────────────────────────────────────────────────────────

/// Bridge state, wait queues, and statistics for one run.
///
/// Shared by both engines: the arbiter keeps it behind its mutex, the
/// sequential engine owns one directly.  Every transition goes through the
/// methods below so the engines cannot drift apart.
#[derive(Debug)]
pub(crate) struct Ledger {
    pub(crate) state:  BridgeState,
    pub(crate) queues: WaitQueues,
    pub(crate) stats:  Statistics,
    next_order:        u64,
}

impl Ledger {
    pub(crate) fn new(config: &BridgeConfig) -> Self {
        Self {
            state:      BridgeState::new(config),
            queues:     WaitQueues::new(),
            stats:      Statistics::new(),
            next_order: 0,
        }
    }

    pub(crate) fn enqueue(&mut self, vehicle: Vehicle) -> QueueResult<()> {
        self.queues.enqueue(vehicle)
    }

    /// Move the decided vehicle from its queue onto the bridge.
    pub(crate) fn admit(
        &mut self,
        decision:      Decision,
        admitted_at:   f64,
        waiting_time:  f64,
        crossing_time: f64,
    ) -> Option<Crossing> {
        let queued = self.queues.lengths();
        let vehicle = self.queues.pop(decision.direction)?;
        debug_assert_eq!(vehicle.id, decision.vehicle);
        self.state.begin_crossing(decision.direction);

        let order = self.next_order;
        self.next_order += 1;
        Some(Crossing {
            order,
            vehicle,
            admitted_at,
            waiting_time,
            crossing_time,
            consecutive: self.state.consecutive_count(),
            reason: decision.reason,
            queued,
        })
    }

    /// Drop a vehicle from its queue without admitting it.
    pub(crate) fn withdraw(&mut self, vehicle: &Vehicle) -> bool {
        self.queues[vehicle.direction].remove(vehicle.id).is_some()
    }

    /// Free the bridge without recording the crossing.
    pub(crate) fn abandon(&mut self) {
        if self.state.occupied() {
            self.state.end_crossing();
        }
    }

    /// Take the vehicle off the bridge and record its statistics.
    pub(crate) fn release(&mut self, crossing: &Crossing) {
        self.state.end_crossing();
        self.stats.record(
            crossing.vehicle.direction,
            crossing.crossing_time,
            crossing.waiting_time,
        );
    }
}

// ── Claim ─────────────────────────────────────────────────────────────────────

/// Vehicles queued together by one [`BridgeArbiter::arrive`] call.
#[derive(Debug)]
pub(crate) struct Arrival {
    pub(crate) at:       Instant,
    pub(crate) queued:   Vec<Vehicle>,
    pub(crate) rejected: Vec<(VehicleId, SimError)>,
}

/// What a call has put into the ledger and not yet handed back.
#[derive(Debug)]
enum Held {
    Nothing,
    Queued(Vec<Vehicle>),
    Bridge,
}

/// Undoes an unwinding call's queue entries or bridge occupancy, so a
/// panicking observer cannot leave other vehicles waiting for a vehicle
/// that will never move.
///
/// Must be declared before the ledger guard it protects: locals drop in
/// reverse order, so the mutex is released before `drop` locks it again.
struct Claim<'a, O: CrossingObserver> {
    arbiter: &'a BridgeArbiter<O>,
    held:    Held,
}

impl<O: CrossingObserver> Claim<'_, O> {
    fn queue(&mut self, vehicle: Vehicle) {
        if let Held::Queued(vehicles) = &mut self.held {
            vehicles.push(vehicle);
        }
    }

    fn queued(&self) -> &[Vehicle] {
        match &self.held {
            Held::Queued(vehicles) => vehicles,
            _ => &[],
        }
    }

    fn take_queued(&mut self) -> Vec<Vehicle> {
        match std::mem::replace(&mut self.held, Held::Nothing) {
            Held::Queued(vehicles) => vehicles,
            other => {
                self.held = other;
                Vec::new()
            }
        }
    }
}

impl<O: CrossingObserver> Drop for Claim<'_, O> {
    fn drop(&mut self) {
        let held = std::mem::replace(&mut self.held, Held::Nothing);
        if matches!(held, Held::Nothing) {
            return;
        }
        let mut ledger = self.arbiter.lock();
        match held {
            Held::Queued(vehicles) => {
                for vehicle in &vehicles {
                    ledger.withdraw(vehicle);
                }
                warn!(vehicles = vehicles.len(), "vehicle call unwound; queued vehicles withdrawn");
            }
            Held::Bridge => {
                ledger.abandon();
                warn!("vehicle call unwound; bridge released");
            }
            Held::Nothing => {}
        }
        self.arbiter.changed.notify_all();
    }
}

// ── BridgeArbiter ─────────────────────────────────────────────────────────────

/// Thread-safe single-lane bridge.
///
/// Share it between vehicle agents with an `Arc`; each agent calls
/// [`cross`](Self::cross) exactly once.
pub struct BridgeArbiter<O: CrossingObserver = NoopObserver> {
    config:   BridgeConfig,
    ledger:   Mutex<Ledger>,
    /// Broadcast after every enqueue, admission, and exit.
    changed:  Condvar,
    /// Time zero for `admitted_at` values.
    epoch:    Instant,
    observer: O,
}

impl BridgeArbiter<NoopObserver> {
    /// Build an arbiter without an observer.  Fails on invalid `config`.
    pub fn new(config: BridgeConfig) -> SimResult<Self> {
        Self::with_observer(config, NoopObserver)
    }
}

impl<O: CrossingObserver> BridgeArbiter<O> {
    /// Build an arbiter reporting transitions to `observer`.
    pub fn with_observer(config: BridgeConfig, observer: O) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            ledger: Mutex::new(Ledger::new(&config)),
            config,
            changed: Condvar::new(),
            epoch: Instant::now(),
            observer,
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Queue `vehicle`, block until the policy admits it, hold the bridge
    /// for the crossing duration, then release it.
    ///
    /// The returned waiting time is the wall-clock delay between this call
    /// and admission, in time units.  Fails without queueing if a vehicle
    /// with the same id is already waiting in the same direction.
    pub fn cross(&self, vehicle: Vehicle) -> SimResult<Crossing> {
        let mut arrival = self.arrive(&[vehicle]);
        if let Some((_, err)) = arrival.rejected.pop() {
            return Err(err);
        }
        Ok(self.cross_queued(vehicle, arrival.at))
    }

    /// Queue every vehicle of `group` under one lock acquisition.
    ///
    /// Vehicles sharing an arrival time must all be queued before any of
    /// them can be admitted; otherwise the first thread to reach the lock
    /// takes an empty bridge before priority and tie-break see its rivals.
    pub(crate) fn arrive(&self, group: &[Vehicle]) -> Arrival {
        let at = Instant::now();
        let mut claim = Claim { arbiter: self, held: Held::Queued(Vec::with_capacity(group.len())) };
        let mut rejected = Vec::new();

        let mut ledger = self.lock();
        for &vehicle in group {
            match ledger.enqueue(vehicle) {
                Ok(()) => claim.queue(vehicle),
                Err(err) => rejected.push((vehicle.id, err.into())),
            }
        }
        for vehicle in claim.queued() {
            self.observer.on_arrival(vehicle);
            debug!(vehicle = %vehicle.id, direction = %vehicle.direction, "vehicle approaching bridge");
        }
        let queued = claim.take_queued();
        self.changed.notify_all();

        Arrival { at, queued, rejected }
    }

    /// Wait for a vehicle already queued by [`arrive`](Self::arrive) to be
    /// admitted, then hold the bridge and release it.
    ///
    /// `arrived` is the instant the vehicle was queued; waiting time is
    /// measured from it.
    pub(crate) fn cross_queued(&self, vehicle: Vehicle, arrived: Instant) -> Crossing {
        let scale = self.config.time_scale;
        let crossing_time = self.config.crossing_duration;
        let mut claim = Claim { arbiter: self, held: Held::Queued(vec![vehicle]) };

        let mut ledger = self.lock();
        let decision = loop {
            match decide(&ledger.state, &ledger.queues) {
                Some(d) if d.vehicle == vehicle.id && d.direction == vehicle.direction => break d,
                _ => {
                    ledger = self
                        .changed
                        .wait(ledger)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        };

        let admitted_at = scale.to_units(self.epoch.elapsed());
        let waiting_time = scale.to_units(arrived.elapsed());
        let Some(crossing) = ledger.admit(decision, admitted_at, waiting_time, crossing_time) else {
            unreachable!("decided vehicle {} missing from its queue", decision.vehicle);
        };
        claim.held = Held::Bridge;
        self.observer.on_admit(&crossing);
        debug!(
            vehicle = %vehicle.id,
            direction = %vehicle.direction,
            reason = %decision.reason,
            wait = waiting_time,
            "vehicle admitted"
        );
        self.changed.notify_all();
        drop(ledger);

        thread::sleep(scale.to_duration(crossing_time));

        let mut ledger = self.lock();
        ledger.release(&crossing);
        claim.held = Held::Nothing;
        self.observer.on_exit(&crossing);
        debug!(vehicle = %vehicle.id, direction = %vehicle.direction, "vehicle left bridge");
        self.changed.notify_all();

        crossing
    }

    /// Take back vehicles queued by [`arrive`](Self::arrive) that will
    /// never get an agent.
    pub(crate) fn withdraw(&self, vehicles: &[Vehicle]) {
        let mut ledger = self.lock();
        for vehicle in vehicles {
            ledger.withdraw(vehicle);
        }
        self.changed.notify_all();
    }

    /// Derived statistics over every completed crossing so far.
    ///
    /// Takes the lock only long enough to copy the accumulators; it never
    /// waits for an in-flight crossing to finish.
    pub fn statistics(&self) -> StatsSnapshot {
        self.lock().stats.snapshot()
    }

    /// Copy of the raw accumulators.
    pub fn raw_statistics(&self) -> Statistics {
        self.lock().stats.clone()
    }

    /// Vehicles still waiting per direction.
    pub fn queued(&self) -> DirectionMap<usize> {
        self.lock().queues.lengths()
    }

    pub fn is_occupied(&self) -> bool {
        self.lock().state.occupied()
    }

    /// The lock is poisoned only by a panic inside an observer callback.
    /// Callbacks run after the ledger transition they report has finished,
    /// and the panicking call's [`Claim`] then takes back its queue entries
    /// or its place on the bridge, so the state behind a poisoned lock is
    /// still consistent.
    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
