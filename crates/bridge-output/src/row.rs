//! Plain data row types written by output backends.

use bridge_core::Direction;
use bridge_sim::{Crossing, StatsSnapshot};

/// One completed crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossingRow {
    pub order:         u64,
    pub vehicle_id:    u64,
    pub direction:     Direction,
    pub arrival_time:  f64,
    pub admitted_at:   f64,
    pub waiting_time:  f64,
    pub crossing_time: f64,
}

impl From<&Crossing> for CrossingRow {
    fn from(c: &Crossing) -> Self {
        Self {
            order:         c.order,
            vehicle_id:    c.vehicle.id.0,
            direction:     c.vehicle.direction,
            arrival_time:  c.vehicle.arrival_time,
            admitted_at:   c.admitted_at,
            waiting_time:  c.waiting_time,
            crossing_time: c.crossing_time,
        }
    }
}

/// One line of the summary table.
///
/// `scope` is a direction name or `"total"`.  Crossing-time and max-wait
/// figures exist only for the total row.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub scope:             &'static str,
    pub total_crossed:     u64,
    pub avg_waiting_time:  f64,
    pub avg_crossing_time: Option<f64>,
    pub max_waiting_time:  Option<f64>,
}

impl SummaryRow {
    pub const TOTAL: &'static str = "total";

    /// Per-direction rows followed by the total row.
    pub fn from_snapshot(snapshot: &StatsSnapshot) -> Vec<SummaryRow> {
        let mut rows: Vec<SummaryRow> = snapshot
            .direction_stats
            .iter()
            .map(|(d, s)| SummaryRow {
                scope:             d.as_str(),
                total_crossed:     s.total_crossed,
                avg_waiting_time:  s.avg_waiting_time,
                avg_crossing_time: None,
                max_waiting_time:  None,
            })
            .collect();
        rows.push(SummaryRow {
            scope:             Self::TOTAL,
            total_crossed:     snapshot.total_crossed,
            avg_waiting_time:  snapshot.avg_waiting_time,
            avg_crossing_time: Some(snapshot.avg_crossing_time),
            max_waiting_time:  Some(snapshot.max_waiting_time),
        });
        rows
    }
}
