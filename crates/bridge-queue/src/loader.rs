//! CSV arrival loader.
//!
//! # CSV format
//!
//! One row per vehicle, with a header row.
//!
//! ```csv
//! arrival_time,id,direction
//! 0,1,a_to_b
//! 0,2,b_to_a
//! 2.5,3,a_to_b
//! ```
//!
//! **`direction`** accepts `a_to_b` / `b_to_a` and the older
//! `left_to_right` / `right_to_left` tokens.
//!
//! The returned vehicles are sorted by arrival time; rows with equal times
//! keep their file order.  Every malformed row is reported with its line
//! number so the core never sees bad data.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashSet;
use serde::Deserialize;

use bridge_core::{sort_by_arrival, Direction, Vehicle, VehicleId};

use crate::QueueError;

// ── CSV record ────────────────────────────────────────────────────────────────

/// Raw row; fields are parsed by hand so each failure names its column.
#[derive(Deserialize)]
struct ArrivalRecord {
    arrival_time: String,
    id:           String,
    direction:    String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the arrival list from a CSV file.
pub fn load_arrivals_csv(path: &Path) -> Result<Vec<Vehicle>, QueueError> {
    let file = std::fs::File::open(path).map_err(QueueError::Io)?;
    load_arrivals_reader(file)
}

/// Like [`load_arrivals_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or piping from stdin.
pub fn load_arrivals_reader<R: Read>(reader: R) -> Result<Vec<Vehicle>, QueueError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut vehicles = Vec::new();
    let mut seen: FxHashSet<VehicleId> = FxHashSet::default();

    for (i, result) in csv_reader.deserialize::<ArrivalRecord>().enumerate() {
        // Line 1 is the header.
        let line = i + 2;
        let row = result.map_err(|e| QueueError::Parse(format!("line {line}: {e}")))?;
        let vehicle = parse_row(&row, line)?;
        if !seen.insert(vehicle.id) {
            return Err(QueueError::DuplicateVehicle {
                id:        vehicle.id,
                direction: vehicle.direction,
            });
        }
        vehicles.push(vehicle);
    }

    sort_by_arrival(&mut vehicles);
    Ok(vehicles)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_row(row: &ArrivalRecord, line: usize) -> Result<Vehicle, QueueError> {
    let arrival_time = row.arrival_time.parse::<f64>().map_err(|_| {
        QueueError::Parse(format!("line {line}: invalid arrival_time {:?}", row.arrival_time))
    })?;
    if !arrival_time.is_finite() || arrival_time < 0.0 {
        return Err(QueueError::Parse(format!(
            "line {line}: arrival_time must be a non-negative number, got {arrival_time}"
        )));
    }

    let id = row.id.parse::<VehicleId>().map_err(|_| {
        QueueError::Parse(format!("line {line}: invalid vehicle id {:?}", row.id))
    })?;

    let direction = row
        .direction
        .parse::<Direction>()
        .map_err(|e| QueueError::Parse(format!("line {line}: {e}")))?;

    Ok(Vehicle { id, arrival_time, direction })
}
