//! Arbiter configuration, fixed for the lifetime of a run.

use crate::{BridgeError, BridgeResult, Direction, TimeScale};

/// Consecutive same-direction crossings allowed while the other side waits.
pub const DEFAULT_MAX_CONSECUTIVE: u32 = 3;

/// How long one vehicle occupies the bridge, in time units.
pub const DEFAULT_CROSSING_DURATION: f64 = 1.0;

/// Policy parameters and timing for one bridge.
///
/// Supplied once at arbiter construction; both engines validate it before
/// doing any work, so an invalid configuration never reaches the policy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BridgeConfig {
    /// Direction that wins the empty-bridge decision when both sides wait.
    pub priority: Option<Direction>,

    /// Cap on consecutive same-direction admissions while the opposite queue
    /// is non-empty.  Must be at least 1.
    pub max_consecutive: u32,

    /// Fixed time a vehicle holds the bridge, in units.  Must be positive.
    pub crossing_duration: f64,

    /// Wall-clock length of one unit (concurrent engine only).
    pub time_scale: TimeScale,
}

impl BridgeConfig {
    pub fn with_priority(mut self, priority: Option<Direction>) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_max_consecutive(mut self, n: u32) -> Self {
        self.max_consecutive = n;
        self
    }

    pub fn with_crossing_duration(mut self, units: f64) -> Self {
        self.crossing_duration = units;
        self
    }

    pub fn with_time_scale(mut self, scale: TimeScale) -> Self {
        self.time_scale = scale;
        self
    }

    /// Reject configurations under which the policy cannot make progress.
    pub fn validate(&self) -> BridgeResult<()> {
        if self.max_consecutive == 0 {
            return Err(BridgeError::Config(
                "max_consecutive must be a positive integer".into(),
            ));
        }
        if !self.crossing_duration.is_finite() || self.crossing_duration <= 0.0 {
            return Err(BridgeError::Config(format!(
                "crossing_duration must be positive and finite, got {}",
                self.crossing_duration
            )));
        }
        Ok(())
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            priority:          None,
            max_consecutive:   DEFAULT_MAX_CONSECUTIVE,
            crossing_duration: DEFAULT_CROSSING_DURATION,
            time_scale:        TimeScale::default(),
        }
    }
}
