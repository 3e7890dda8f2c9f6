//! The vehicle record fed to both engines.

use std::cmp::Ordering;
use std::fmt;

use crate::{Direction, VehicleId};

/// One vehicle wanting to cross.  Immutable once created.
///
/// `arrival_time` is in abstract time units measured from the start of the
/// run; the concurrent engine converts it to a wall-clock offset through
/// [`TimeScale`][crate::TimeScale].
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    pub id:           VehicleId,
    pub arrival_time: f64,
    pub direction:    Direction,
}

impl Vehicle {
    pub fn new(id: impl Into<VehicleId>, arrival_time: f64, direction: Direction) -> Self {
        Self { id: id.into(), arrival_time, direction }
    }

    /// Total order on arrival time; NaN never reaches here because the input
    /// reader rejects non-finite times.
    #[inline]
    pub fn cmp_arrival(&self, other: &Vehicle) -> Ordering {
        self.arrival_time.total_cmp(&other.arrival_time)
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} @ {:.2})", self.id, self.direction, self.arrival_time)
    }
}

/// Sort vehicles by arrival time, keeping input order among equal times.
pub fn sort_by_arrival(vehicles: &mut [Vehicle]) {
    vehicles.sort_by(Vehicle::cmp_arrival);
}
