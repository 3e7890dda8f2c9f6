//! `WaitQueue` — vehicles waiting on one side of the bridge.
//!
//! # Why sorted insertion
//!
//! Callers of `BridgeArbiter::cross` enqueue from their own threads, so two
//! vehicles with close arrival times can reach the lock in either order.
//! Inserting by `(arrival_time, sequence)` keeps the head equal to the
//! earliest scheduled arrival regardless of which thread won the race.  In
//! the common case the new vehicle is the latest arrival and the insert is
//! a push to the back.

use std::collections::VecDeque;
use std::ops::{Index, IndexMut};

use rustc_hash::FxHashSet;

use bridge_core::{Direction, DirectionMap, Vehicle, VehicleId};

use crate::{QueueError, QueueResult};

/// FIFO of vehicles waiting to cross in one direction.
#[derive(Debug)]
pub struct WaitQueue {
    direction: Direction,
    inner:     VecDeque<Vehicle>,
    /// Ids currently queued, for O(1) duplicate detection.
    ids:       FxHashSet<VehicleId>,
}

impl WaitQueue {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            inner: VecDeque::new(),
            ids:   FxHashSet::default(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Insert `vehicle` behind every queued vehicle that arrived no later.
    ///
    /// Fails if a vehicle with the same id is already waiting here.
    pub fn push(&mut self, vehicle: Vehicle) -> QueueResult<()> {
        debug_assert_eq!(vehicle.direction, self.direction);
        if !self.ids.insert(vehicle.id) {
            return Err(QueueError::DuplicateVehicle {
                id:        vehicle.id,
                direction: self.direction,
            });
        }
        let pos = self
            .inner
            .partition_point(|q| q.arrival_time <= vehicle.arrival_time);
        self.inner.insert(pos, vehicle);
        Ok(())
    }

    /// The vehicle that must be admitted next from this side, if any.
    #[inline]
    pub fn head(&self) -> Option<&Vehicle> {
        self.inner.front()
    }

    /// Remove and return the head.
    pub fn pop_front(&mut self) -> Option<Vehicle> {
        let v = self.inner.pop_front()?;
        self.ids.remove(&v.id);
        Some(v)
    }

    /// Remove the vehicle with `id` wherever it sits in the queue.
    pub fn remove(&mut self, id: VehicleId) -> Option<Vehicle> {
        if !self.ids.remove(&id) {
            return None;
        }
        let pos = self.inner.iter().position(|v| v.id == id)?;
        self.inner.remove(pos)
    }

    /// True if `id` is the head of this queue.
    #[inline]
    pub fn is_head(&self, id: VehicleId) -> bool {
        self.head().is_some_and(|v| v.id == id)
    }

    pub fn contains(&self, id: VehicleId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.inner.iter()
    }
}

// ── WaitQueues ────────────────────────────────────────────────────────────────

/// The pair of wait queues, one per direction.
#[derive(Debug)]
pub struct WaitQueues {
    queues: DirectionMap<WaitQueue>,
}

impl WaitQueues {
    pub fn new() -> Self {
        Self { queues: DirectionMap::from_fn(WaitQueue::new) }
    }

    /// Route `vehicle` to the queue for its direction.
    pub fn enqueue(&mut self, vehicle: Vehicle) -> QueueResult<()> {
        self.queues[vehicle.direction].push(vehicle)
    }

    pub fn head(&self, direction: Direction) -> Option<&Vehicle> {
        self.queues[direction].head()
    }

    pub fn pop(&mut self, direction: Direction) -> Option<Vehicle> {
        self.queues[direction].pop_front()
    }

    /// Total vehicles waiting across both sides.
    pub fn len(&self) -> usize {
        self.queues.a_to_b.len() + self.queues.b_to_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queue lengths per direction, for logging and snapshots.
    pub fn lengths(&self) -> DirectionMap<usize> {
        self.queues.map(|_, q| q.len())
    }
}

impl Default for WaitQueues {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<Direction> for WaitQueues {
    type Output = WaitQueue;

    fn index(&self, d: Direction) -> &WaitQueue {
        &self.queues[d]
    }
}

impl IndexMut<Direction> for WaitQueues {
    fn index_mut(&mut self, d: Direction) -> &mut WaitQueue {
        &mut self.queues[d]
    }
}
