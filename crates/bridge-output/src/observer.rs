//! `OutputObserver<W>` — bridges `CrossingObserver` to an `OutputWriter`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use bridge_sim::{Crossing, CrossingObserver, StatsSnapshot};

use crate::row::{CrossingRow, SummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

struct Sink<W> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> Sink<W> {
    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

/// A [`CrossingObserver`] that writes one row per completed crossing to any
/// [`OutputWriter`] backend.
///
/// Observer callbacks have no return value, so write errors are stored and
/// retrieved with [`take_error`](Self::take_error) once the run returns.
/// The writer sits behind a mutex because the concurrent engine calls the
/// observer from every vehicle thread.
pub struct OutputObserver<W: OutputWriter> {
    sink: Mutex<Sink<W>>,
}

impl<W: OutputWriter> OutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            sink: Mutex::new(Sink { writer, last_error: None }),
        }
    }

    /// Write the end-of-run summary table.
    pub fn write_summary(&self, snapshot: &StatsSnapshot) {
        let mut sink = self.lock();
        let result = sink.writer.write_summary(&SummaryRow::from_snapshot(snapshot));
        sink.store_err(result);
    }

    /// Flush the writer.  Idempotent.
    pub fn finish(&self) {
        let mut sink = self.lock();
        let result = sink.writer.finish();
        sink.store_err(result);
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&self) -> Option<OutputError> {
        self.lock().last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.sink.into_inner().unwrap_or_else(PoisonError::into_inner).writer
    }

    fn lock(&self) -> MutexGuard<'_, Sink<W>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: OutputWriter + Send> CrossingObserver for OutputObserver<W> {
    fn on_exit(&self, crossing: &Crossing) {
        let mut sink = self.lock();
        let result = sink.writer.write_crossing(&CrossingRow::from(crossing));
        sink.store_err(result);
    }
}
