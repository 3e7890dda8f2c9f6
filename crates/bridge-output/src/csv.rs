//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `crossings.csv`
//! - `summary.csv`

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CrossingRow, OutputResult, SummaryRow};

pub const CROSSINGS_FILE: &str = "crossings.csv";
pub const SUMMARY_FILE: &str = "summary.csv";

/// Writes a run report to two CSV files.
pub struct CsvWriter {
    crossings: Writer<File>,
    summary:   Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the two CSV files and write the headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;

        let mut crossings = Writer::from_path(dir.join(CROSSINGS_FILE))?;
        crossings.write_record([
            "order",
            "vehicle_id",
            "direction",
            "arrival_time",
            "admitted_at",
            "waiting_time",
            "crossing_time",
        ])?;

        let mut summary = Writer::from_path(dir.join(SUMMARY_FILE))?;
        summary.write_record([
            "scope",
            "total_crossed",
            "avg_waiting_time",
            "avg_crossing_time",
            "max_waiting_time",
        ])?;

        Ok(Self {
            crossings,
            summary,
            finished: false,
        })
    }
}

fn opt(x: Option<f64>) -> String {
    x.map(|v| v.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_crossing(&mut self, row: &CrossingRow) -> OutputResult<()> {
        self.crossings.write_record(&[
            row.order.to_string(),
            row.vehicle_id.to_string(),
            row.direction.as_str().to_owned(),
            row.arrival_time.to_string(),
            row.admitted_at.to_string(),
            row.waiting_time.to_string(),
            row.crossing_time.to_string(),
        ])?;
        Ok(())
    }

    fn write_summary(&mut self, rows: &[SummaryRow]) -> OutputResult<()> {
        for row in rows {
            self.summary.write_record(&[
                row.scope.to_owned(),
                row.total_crossed.to_string(),
                row.avg_waiting_time.to_string(),
                opt(row.avg_crossing_time),
                opt(row.max_waiting_time),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.crossings.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
