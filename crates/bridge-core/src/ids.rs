//! Strongly typed vehicle identifier.
//!
//! Ids come from the input feed, so they are arbitrary integers rather than
//! dense indices.  `VehicleId` is `Copy + Ord + Hash` so it can key maps and
//! break ties in the arbitration policy without ceremony.

use std::fmt;
use std::str::FromStr;

/// Identifier of one vehicle, unique within a run.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

impl From<u64> for VehicleId {
    #[inline(always)]
    fn from(n: u64) -> Self {
        VehicleId(n)
    }
}

impl FromStr for VehicleId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(VehicleId)
    }
}
