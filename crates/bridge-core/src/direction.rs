//! Travel direction across the bridge.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::BridgeError;

/// One of the two travel orientations across the single-lane bridge.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    AToB,
    BToA,
}

impl Direction {
    /// Both directions, in tie-break order.
    pub const ALL: [Direction; 2] = [Direction::AToB, Direction::BToA];

    /// The direction travelling the other way.
    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::AToB => Direction::BToA,
            Direction::BToA => Direction::AToB,
        }
    }

    /// Canonical token used in input files, reports, and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::AToB => "a_to_b",
            Direction::BToA => "b_to_a",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = BridgeError;

    /// Accepts the canonical tokens plus the `left_to_right` / `right_to_left`
    /// spelling found in older arrival files.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a_to_b" | "atob" | "left_to_right" => Ok(Direction::AToB),
            "b_to_a" | "btoa" | "right_to_left" => Ok(Direction::BToA),
            _ => Err(BridgeError::UnknownDirection(s.to_owned())),
        }
    }
}

// ── DirectionMap ──────────────────────────────────────────────────────────────

/// A total mapping `Direction → T`, stored inline.
///
/// Indexing with a `Direction` never fails, so per-direction queues and
/// counters need no `HashMap` lookups or `Option` handling.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionMap<T> {
    pub a_to_b: T,
    pub b_to_a: T,
}

impl<T> DirectionMap<T> {
    pub fn new(a_to_b: T, b_to_a: T) -> Self {
        Self { a_to_b, b_to_a }
    }

    /// Build a map by evaluating `f` once per direction.
    pub fn from_fn(mut f: impl FnMut(Direction) -> T) -> Self {
        Self { a_to_b: f(Direction::AToB), b_to_a: f(Direction::BToA) }
    }

    /// Iterate `(direction, &value)` pairs in `Direction::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &T)> {
        [(Direction::AToB, &self.a_to_b), (Direction::BToA, &self.b_to_a)].into_iter()
    }

    pub fn map<U>(&self, mut f: impl FnMut(Direction, &T) -> U) -> DirectionMap<U> {
        DirectionMap {
            a_to_b: f(Direction::AToB, &self.a_to_b),
            b_to_a: f(Direction::BToA, &self.b_to_a),
        }
    }
}

impl<T> Index<Direction> for DirectionMap<T> {
    type Output = T;

    #[inline]
    fn index(&self, d: Direction) -> &T {
        match d {
            Direction::AToB => &self.a_to_b,
            Direction::BToA => &self.b_to_a,
        }
    }
}

impl<T> IndexMut<Direction> for DirectionMap<T> {
    #[inline]
    fn index_mut(&mut self, d: Direction) -> &mut T {
        match d {
            Direction::AToB => &mut self.a_to_b,
            Direction::BToA => &mut self.b_to_a,
        }
    }
}
