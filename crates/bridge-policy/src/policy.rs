//! The arbitration decision.

use std::fmt;

use bridge_core::{Direction, VehicleId};
use bridge_queue::WaitQueues;

use crate::BridgeState;

/// Why a direction won the empty-bridge decision.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Reason {
    /// Only this side had an eligible vehicle.
    OnlyWaiting,
    /// The other side hit `max_consecutive`; the turn is forced over.
    AntiStarvation,
    /// Both sides waiting; this is the configured priority direction.
    Priority,
    /// Both sides waiting; this side's head arrived first (or tied with a
    /// lower id).
    EarliestArrival,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Reason::OnlyWaiting => "only waiting",
            Reason::AntiStarvation => "anti-starvation",
            Reason::Priority => "priority",
            Reason::EarliestArrival => "earliest arrival",
        })
    }
}

/// Outcome of one empty-bridge decision: who goes next, and why.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Decision {
    pub direction: Direction,
    /// Head of `direction`'s queue, the only vehicle that may go.
    pub vehicle:   VehicleId,
    pub reason:    Reason,
}

/// Decide which vehicle takes the bridge next.
///
/// Returns `None` while the bridge is occupied or when nobody is waiting.
/// With a validated configuration it never returns `None` while a queue is
/// non-empty and the bridge is free: a capped direction implies the
/// opposite queue is non-empty and not capped.
pub fn decide(state: &BridgeState, queues: &WaitQueues) -> Option<Decision> {
    if state.occupied() {
        return None;
    }

    let eligible = |d: Direction| !queues[d].is_empty() && !state.is_capped(d, queues);
    let capped = |d: Direction| state.is_capped(d, queues);

    let (direction, reason) = match (eligible(Direction::AToB), eligible(Direction::BToA)) {
        (false, false) => return None,
        (true, false) => (Direction::AToB, only_or_forced(capped(Direction::BToA))),
        (false, true) => (Direction::BToA, only_or_forced(capped(Direction::AToB))),
        (true, true) => match state.priority() {
            Some(p) => (p, Reason::Priority),
            None => (earliest_head(queues), Reason::EarliestArrival),
        },
    };

    let vehicle = queues.head(direction)?.id;
    Some(Decision { direction, vehicle, reason })
}

/// The direction that may take the bridge next, if any.
pub fn next_direction(state: &BridgeState, queues: &WaitQueues) -> Option<Direction> {
    decide(state, queues).map(|d| d.direction)
}

/// May the head of `candidate`'s queue take the bridge right now?
///
/// False whenever the bridge is occupied, whatever the direction: capacity
/// is one vehicle, so no admission (same side or not) happens until the
/// current vehicle exits.
pub fn admit(state: &BridgeState, queues: &WaitQueues, candidate: Direction) -> bool {
    next_direction(state, queues) == Some(candidate)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn only_or_forced(other_capped: bool) -> Reason {
    if other_capped { Reason::AntiStarvation } else { Reason::OnlyWaiting }
}

/// Direction whose head arrived first; equal times go to the lower id.
/// Both queues must be non-empty.
fn earliest_head(queues: &WaitQueues) -> Direction {
    match (queues.head(Direction::AToB), queues.head(Direction::BToA)) {
        (Some(a), Some(b)) => {
            let by_time = a.cmp_arrival(b).then(a.id.cmp(&b.id));
            if by_time.is_le() { Direction::AToB } else { Direction::BToA }
        }
        (Some(_), None) => Direction::AToB,
        _ => Direction::BToA,
    }
}
