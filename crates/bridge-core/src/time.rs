//! Mapping between abstract time units and wall-clock time.
//!
//! # Design
//!
//! Arrival times, waits, and the crossing duration are all expressed in
//! abstract *units* (`f64`).  The sequential engine never leaves unit space:
//! its clock is a plain `f64` that jumps between events.  The concurrent
//! engine sleeps and measures in real time, so it needs a scale:
//!
//!   wall_time = units * unit
//!
//! The default unit is one second.  Tests shrink it to a few milliseconds.

use std::fmt;
use std::time::Duration;

/// How long one abstract time unit lasts on the wall clock.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeScale {
    pub unit: Duration,
}

impl TimeScale {
    pub const fn new(unit: Duration) -> Self {
        Self { unit }
    }

    pub const fn from_millis(ms: u64) -> Self {
        Self { unit: Duration::from_millis(ms) }
    }

    /// Wall-clock duration of `units`.  Negative or non-finite inputs clamp to zero.
    #[inline]
    pub fn to_duration(&self, units: f64) -> Duration {
        if !units.is_finite() || units <= 0.0 {
            return Duration::ZERO;
        }
        self.unit.mul_f64(units)
    }

    /// Number of units spanned by the wall-clock duration `d`.
    #[inline]
    pub fn to_units(&self, d: Duration) -> f64 {
        if self.unit.is_zero() {
            return 0.0;
        }
        d.as_secs_f64() / self.unit.as_secs_f64()
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self { unit: Duration::from_secs(1) }
    }
}

impl fmt::Display for TimeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1 unit = {:?}", self.unit)
    }
}
