//! `bridge-queue` — per-direction wait queues and arrival-file loading.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`wait_queue`] | `WaitQueue` (one direction), `WaitQueues` (both)         |
//! | [`loader`]     | `load_arrivals_csv`, `load_arrivals_reader`              |
//! | [`error`]      | `QueueError`, `QueueResult<T>`                           |
//!
//! # Ordering model
//!
//! A `WaitQueue` is ordered by `(arrival_time, insertion sequence)`.  The
//! vehicle at its head is the only one its direction may admit next, which
//! gives FIFO-within-direction for free.  Admission across directions is
//! decided elsewhere (`bridge-policy`).

pub mod error;
pub mod loader;
pub mod wait_queue;


pub use error::{QueueError, QueueResult};
pub use loader::{load_arrivals_csv, load_arrivals_reader};
pub use wait_queue::{WaitQueue, WaitQueues};
