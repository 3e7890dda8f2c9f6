//! Plain-text rendering of run results.

use bridge_core::Direction;
use bridge_sim::StatsSnapshot;

pub fn print_stats(title: &str, s: &StatsSnapshot) {
    println!("=== {title} ===");
    println!("Total vehicles crossed : {}", s.total_crossed);
    println!("Average crossing time  : {:.3}", s.avg_crossing_time);
    println!("Average waiting time   : {:.3}", s.avg_waiting_time);
    println!("Maximum waiting time   : {:.3}", s.max_waiting_time);
    for (d, ds) in s.direction_stats.iter() {
        println!("  {:<8} {:>5} crossed, avg wait {:.3}", d.as_str(), ds.total_crossed, ds.avg_waiting_time);
    }
    println!();
}

/// Both engines crossed the same number of vehicles in each direction.
pub fn counts_agree(a: &StatsSnapshot, b: &StatsSnapshot) -> bool {
    a.total_crossed == b.total_crossed
        && Direction::ALL
            .iter()
            .all(|&d| a.direction_stats[d].total_crossed == b.direction_stats[d].total_crossed)
}

/// One measured workload size for `compare`.
pub struct CompareRow {
    pub vehicles:      usize,
    pub sequential_ms: f64,
    pub concurrent_ms: f64,
    pub sequential:    StatsSnapshot,
    pub concurrent:    StatsSnapshot,
}

pub fn print_comparison(rows: &[CompareRow]) {
    println!(
        "{:>8} {:>10} {:>10} {:>9} {:>9} {:>9} {:>9} {:>6}",
        "vehicles", "seq ms", "conc ms", "seq avg", "conc avg", "seq max", "conc max", "agree"
    );
    println!("{}", "-".repeat(78));
    for r in rows {
        println!(
            "{:>8} {:>10.3} {:>10.1} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>6}",
            r.vehicles,
            r.sequential_ms,
            r.concurrent_ms,
            r.sequential.avg_waiting_time,
            r.concurrent.avg_waiting_time,
            r.sequential.max_waiting_time,
            r.concurrent.max_waiting_time,
            if counts_agree(&r.sequential, &r.concurrent) { "yes" } else { "NO" },
        );
    }
}
