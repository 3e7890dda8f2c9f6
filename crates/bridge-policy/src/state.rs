//! Mutable bridge state owned by an arbiter.

use bridge_core::{BridgeConfig, Direction};
use bridge_queue::WaitQueues;

/// Occupancy, direction history, and the fixed policy parameters.
///
/// Invariants:
/// - `occupied ⇒ current_direction.is_some()`
/// - `consecutive_count > 0 ⇒ current_direction.is_some()`
///
/// Fields are private; the owning engine changes state only through
/// [`begin_crossing`](Self::begin_crossing) and
/// [`end_crossing`](Self::end_crossing).
#[derive(Clone, Debug)]
pub struct BridgeState {
    occupied:          bool,
    current_direction: Option<Direction>,
    consecutive_count: u32,
    priority:          Option<Direction>,
    max_consecutive:   u32,
}

impl BridgeState {
    /// Fresh, empty bridge.  `config` is assumed validated.
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            occupied:          false,
            current_direction: None,
            consecutive_count: 0,
            priority:          config.priority,
            max_consecutive:   config.max_consecutive,
        }
    }

    pub fn occupied(&self) -> bool {
        self.occupied
    }

    pub fn current_direction(&self) -> Option<Direction> {
        self.current_direction
    }

    pub fn consecutive_count(&self) -> u32 {
        self.consecutive_count
    }

    pub fn priority(&self) -> Option<Direction> {
        self.priority
    }

    pub fn max_consecutive(&self) -> u32 {
        self.max_consecutive
    }

    /// True when `direction` has used up its consecutive allowance and the
    /// other side has someone waiting.
    pub fn is_capped(&self, direction: Direction, queues: &WaitQueues) -> bool {
        self.current_direction == Some(direction)
            && self.consecutive_count >= self.max_consecutive
            && !queues[direction.opposite()].is_empty()
    }

    /// Record that a vehicle travelling `direction` now holds the bridge.
    ///
    /// # Panics
    /// Panics if the bridge is already occupied.  That would break mutual
    /// exclusion and can only come from a defect in the calling engine.
    pub fn begin_crossing(&mut self, direction: Direction) {
        assert!(
            !self.occupied,
            "exclusion violated: {direction} admitted while bridge is occupied"
        );
        if self.current_direction == Some(direction) {
            self.consecutive_count += 1;
        } else {
            self.current_direction = Some(direction);
            self.consecutive_count = 1;
        }
        self.occupied = true;
    }

    /// Record that the vehicle on the bridge has left.
    ///
    /// # Panics
    /// Panics if the bridge was empty.
    pub fn end_crossing(&mut self) {
        assert!(self.occupied, "end_crossing on an empty bridge");
        self.occupied = false;
    }
}
