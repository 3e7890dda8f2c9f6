//! Append-only crossing statistics and their derived snapshot.

use serde::Serialize;

use bridge_core::{Direction, DirectionMap};

/// Running totals for one direction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectionTotals {
    pub crossed:    u64,
    pub total_wait: f64,
}

/// Raw accumulators.  Only ever appended to; averages are derived in
/// [`snapshot`](Self::snapshot).
#[derive(Clone, Debug, Default)]
pub struct Statistics {
    total_crossed:  u64,
    crossing_times: Vec<f64>,
    waiting_times:  Vec<f64>,
    per_direction:  DirectionMap<DirectionTotals>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed crossing.
    pub fn record(&mut self, direction: Direction, crossing_time: f64, waiting_time: f64) {
        self.total_crossed += 1;
        self.crossing_times.push(crossing_time);
        self.waiting_times.push(waiting_time);
        let totals = &mut self.per_direction[direction];
        totals.crossed += 1;
        totals.total_wait += waiting_time;
    }

    pub fn total_crossed(&self) -> u64 {
        self.total_crossed
    }

    pub fn crossing_times(&self) -> &[f64] {
        &self.crossing_times
    }

    pub fn waiting_times(&self) -> &[f64] {
        &self.waiting_times
    }

    pub fn per_direction(&self) -> &DirectionMap<DirectionTotals> {
        &self.per_direction
    }

    /// Derive the outward report.  Empty statistics report zeros throughout.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_crossed:     self.total_crossed,
            avg_crossing_time: mean(&self.crossing_times),
            avg_waiting_time:  mean(&self.waiting_times),
            max_waiting_time:  self.waiting_times.iter().copied().fold(0.0, f64::max),
            direction_stats:   self.per_direction.map(|_, t| DirectionSummary {
                total_crossed:    t.crossed,
                avg_waiting_time: if t.crossed == 0 { 0.0 } else { t.total_wait / t.crossed as f64 },
            }),
        }
    }
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Per-direction slice of a [`StatsSnapshot`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DirectionSummary {
    pub total_crossed:    u64,
    pub avg_waiting_time: f64,
}

/// The report handed to statistics consumers.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total_crossed:     u64,
    pub avg_crossing_time: f64,
    pub avg_waiting_time:  f64,
    pub max_waiting_time:  f64,
    pub direction_stats:   DirectionMap<DirectionSummary>,
}
