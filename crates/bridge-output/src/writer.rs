//! The `OutputWriter` trait implemented by report backends.

use crate::{CrossingRow, OutputResult, SummaryRow};

/// A sink for crossing records and the end-of-run summary.
///
/// Errors surface through [`OutputObserver::take_error`](crate::OutputObserver::take_error)
/// when the writer is driven by the observer.
pub trait OutputWriter {
    /// Write one completed crossing.
    fn write_crossing(&mut self, row: &CrossingRow) -> OutputResult<()>;

    /// Write the summary table (one row per direction plus the total).
    fn write_summary(&mut self, rows: &[SummaryRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
