//! `bridge-policy` — bridge state and the arbitration decision.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`state`]  | `BridgeState` (occupancy, direction, consecutive counter) |
//! | [`policy`] | `decide`, `next_direction`, `admit`, `Decision`, `Reason` |
//!
//! The policy functions take shared references only and have no side
//! effects.  The threaded arbiter and the sequential replay both call them,
//! which is what lets the two engines agree on aggregate results.
//!
//! # Rules (in evaluation order)
//!
//! ```text
//! occupied                        → nobody is admitted (capacity is one)
//! d has no waiting vehicle        → d is not eligible
//! d == current and count ≥ max
//!   and opposite(d) is waiting    → d is capped (anti-starvation)
//! one eligible direction          → that direction
//! both eligible, priority set     → priority direction
//! both eligible, no priority      → earliest queue head (tie → lower id)
//! ```

pub mod policy;
pub mod state;


pub use policy::{admit, decide, next_direction, Decision, Reason};
pub use state::BridgeState;
