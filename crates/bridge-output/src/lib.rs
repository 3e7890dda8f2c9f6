//! `bridge-output` — report writers for bridge simulation runs.
//!
//! | Backend | Files created                        |
//! |---------|--------------------------------------|
//! | CSV     | `crossings.csv`, `summary.csv`       |
//!
//! Backends implement [`OutputWriter`] and are driven by [`OutputObserver`],
//! which implements `bridge_sim::CrossingObserver` and writes one row per
//! vehicle as it leaves the bridge.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bridge_output::{CsvWriter, OutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let engine = SequentialEngine::with_observer(config, OutputObserver::new(writer))?;
//! let run = engine.simulate(&vehicles)?;
//! engine.observer().write_summary(&run.statistics);
//! engine.observer().finish();
//! if let Some(e) = engine.observer().take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::OutputObserver;
pub use row::{CrossingRow, SummaryRow};
pub use writer::OutputWriter;
