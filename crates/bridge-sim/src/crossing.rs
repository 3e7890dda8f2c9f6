//! Per-vehicle crossing record.

use serde::Serialize;

use bridge_core::{DirectionMap, Vehicle};
use bridge_policy::Reason;

/// Everything known about one admission, produced by both engines.
///
/// Times are in abstract units from the start of the run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Crossing {
    /// 0-based admission order across both directions.
    pub order:         u64,
    pub vehicle:       Vehicle,
    pub admitted_at:   f64,
    pub waiting_time:  f64,
    pub crossing_time: f64,
    /// Same-direction admissions in a row, including this one.
    pub consecutive:   u32,
    #[serde(skip)]
    pub reason:        Reason,
    /// Queue lengths at the moment of the decision, this vehicle included.
    pub queued:        DirectionMap<usize>,
}

impl Crossing {
    /// `(crossing_duration, waiting_duration)`.
    pub fn durations(&self) -> (f64, f64) {
        (self.crossing_time, self.waiting_time)
    }

    pub fn exited_at(&self) -> f64 {
        self.admitted_at + self.crossing_time
    }
}
