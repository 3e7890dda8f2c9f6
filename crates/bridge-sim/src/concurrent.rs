//! `ConcurrentEngine` — one thread per vehicle against a shared arbiter.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use bridge_core::{sort_by_arrival, BridgeConfig, DirectionMap, Vehicle, VehicleId};

use crate::{BridgeArbiter, Crossing, CrossingObserver, NoopObserver, SimError, SimResult, StatsSnapshot};

/// Floor for the run-wide timeout derived by [`ConcurrentEngine::timeout_for`].
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(120);

/// Outcome of one concurrent run.
///
/// A run that hits its timeout still produces a report: `statistics` covers
/// every crossing that finished, and `completed < submitted` tells the
/// caller the run was short.
#[derive(Debug)]
pub struct RunReport {
    pub submitted:  usize,
    pub completed:  usize,
    /// Vehicles refused on arrival (duplicate ids).
    pub rejected:   Vec<(VehicleId, SimError)>,
    /// Completed crossings in admission order.
    pub crossings:  Vec<Crossing>,
    pub statistics: StatsSnapshot,
    /// Vehicles still queued when the engine stopped waiting.
    pub stranded:   DirectionMap<usize>,
    pub elapsed:    Duration,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.completed == self.submitted
    }

    /// Turn a short or failed run into an error.
    ///
    /// A rejected vehicle is reported first since it points at bad input;
    /// otherwise a run with missing crossings becomes [`SimError::Incomplete`].
    pub fn into_result(mut self) -> SimResult<Self> {
        if !self.rejected.is_empty() {
            let (_, err) = self.rejected.swap_remove(0);
            return Err(err);
        }
        if !self.is_complete() {
            return Err(SimError::Incomplete {
                completed: self.completed,
                submitted: self.submitted,
            });
        }
        Ok(self)
    }
}

/// Drives one vehicle agent thread per vehicle.
///
/// Vehicles are released in arrival groups at their scheduled offset
/// (scaled through the config's [`TimeScale`](bridge_core::TimeScale)).
/// Every vehicle of a group is queued in one step before any of them can be
/// admitted, then each gets its own agent thread that waits for its turn
/// and crosses.  A single run-wide timeout bounds the wait for all agents.
pub struct ConcurrentEngine<O: CrossingObserver + 'static = NoopObserver> {
    config:   BridgeConfig,
    /// Fixed run timeout; `None` derives one from the schedule.
    timeout:  Option<Duration>,
    observer: Arc<O>,
}

impl ConcurrentEngine<NoopObserver> {
    pub fn new(config: BridgeConfig) -> SimResult<Self> {
        Self::with_observer(config, NoopObserver)
    }
}

impl<O: CrossingObserver + 'static> ConcurrentEngine<O> {
    pub fn with_observer(config: BridgeConfig, observer: O) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            timeout: None,
            observer: Arc::new(observer),
        })
    }

    /// Bound the whole run (spawning included) by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run-wide timeout used for `vehicles`.
    ///
    /// Without an explicit timeout this is twice the time a fully serialized
    /// run needs (last arrival plus every crossing back to back), scaled to
    /// wall-clock time and never below [`DEFAULT_RUN_TIMEOUT`].
    pub fn timeout_for(&self, vehicles: &[Vehicle]) -> Duration {
        if let Some(timeout) = self.timeout {
            return timeout;
        }
        let last_arrival = vehicles.iter().map(|v| v.arrival_time).fold(0.0, f64::max);
        let busy = last_arrival + vehicles.len() as f64 * self.config.crossing_duration;
        self.config.time_scale.to_duration(2.0 * busy).max(DEFAULT_RUN_TIMEOUT)
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Run every vehicle in `vehicles` against a fresh arbiter.
    ///
    /// Returns `Err` only for configuration or thread-spawn failures; a
    /// timeout or rejected vehicle is reported in the [`RunReport`].  If an
    /// agent panics (an invariant violation inside the arbiter or a failing
    /// observer) the remaining agents still run to completion and the first
    /// panic is then re-raised here.
    pub fn run(&self, vehicles: &[Vehicle]) -> SimResult<RunReport> {
        let start = Instant::now();
        let timeout = self.timeout_for(vehicles);
        let deadline = start + timeout;
        let scale = self.config.time_scale;

        let mut schedule = vehicles.to_vec();
        sort_by_arrival(&mut schedule);

        let arbiter = Arc::new(BridgeArbiter::with_observer(
            self.config.clone(),
            Arc::clone(&self.observer),
        )?);
        let (tx, rx) = mpsc::channel::<thread::Result<Crossing>>();
        info!(vehicles = schedule.len(), timeout = ?timeout, "starting concurrent run");

        // ── Release arrival groups on the timeline ────────────────────────
        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(schedule.len());
        let mut rejected = Vec::new();
        for group in schedule.chunk_by(|a, b| a.arrival_time == b.arrival_time) {
            let due = start + scale.to_duration(group[0].arrival_time);
            if due > deadline {
                break;
            }
            let now = Instant::now();
            if due > now {
                thread::sleep(due - now);
            }

            let arrival = arbiter.arrive(group);
            let arrived = arrival.at;
            for (id, err) in arrival.rejected {
                warn!(vehicle = %id, error = %err, "vehicle rejected");
                rejected.push((id, err));
            }

            for (i, &vehicle) in arrival.queued.iter().enumerate() {
                let agent = Arc::clone(&arbiter);
                let tx = tx.clone();
                let spawned = thread::Builder::new()
                    .name(format!("vehicle-{}", vehicle.id.0))
                    .spawn(move || {
                        let result = panic::catch_unwind(AssertUnwindSafe(|| {
                            agent.cross_queued(vehicle, arrived)
                        }));
                        let _ = tx.send(result);
                    });
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        // Nobody would ever admit the rest of this group.
                        arbiter.withdraw(&arrival.queued[i..]);
                        return Err(err.into());
                    }
                }
            }
        }
        drop(tx);

        // ── Collect results until done or out of time ─────────────────────
        let mut crossings = Vec::with_capacity(handles.len());
        let mut first_panic = None;
        let mut finished = 0;
        while finished < handles.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(Ok(crossing)) => crossings.push(crossing),
                Ok(Err(payload)) => {
                    warn!("vehicle agent panicked");
                    first_panic.get_or_insert(payload);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
            finished += 1;
        }

        // Agents still blocked are left detached.
        for handle in handles {
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
        if let Some(payload) = first_panic {
            panic::resume_unwind(payload);
        }

        crossings.sort_by_key(|c| c.order);
        let report = RunReport {
            submitted:  vehicles.len(),
            completed:  crossings.len(),
            rejected,
            crossings,
            statistics: arbiter.statistics(),
            stranded:   arbiter.queued(),
            elapsed:    start.elapsed(),
        };

        if report.is_complete() {
            info!(crossed = report.completed, elapsed = ?report.elapsed, "concurrent run finished");
        } else {
            warn!(
                completed = report.completed,
                submitted = report.submitted,
                stranded_a_to_b = report.stranded.a_to_b,
                stranded_b_to_a = report.stranded.b_to_a,
                "concurrent run incomplete"
            );
        }
        Ok(report)
    }
}
