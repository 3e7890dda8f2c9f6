//! Random arrival files for `generate` and `compare`.

use std::io::Write;

use anyhow::{ensure, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use bridge_core::{sort_by_arrival, Direction, Vehicle};

/// `count` vehicles with ids `0..count`, uniform arrivals in `[0, spread)`
/// rounded to milliseconds, and a fair coin for the direction.
pub fn generate(count: usize, seed: u64, spread: f64) -> Result<Vec<Vehicle>> {
    ensure!(spread.is_finite() && spread >= 0.0, "spread must be a non-negative number, got {spread}");

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut vehicles: Vec<Vehicle> = (0..count as u64)
        .map(|id| {
            let t = if spread > 0.0 { rng.gen_range(0.0..spread) } else { 0.0 };
            let direction = if rng.gen_bool(0.5) { Direction::AToB } else { Direction::BToA };
            Vehicle::new(id, (t * 1000.0).round() / 1000.0, direction)
        })
        .collect();
    sort_by_arrival(&mut vehicles);
    Ok(vehicles)
}

/// Write `vehicles` in the format `load_arrivals_csv` reads.
pub fn write_arrivals<W: Write>(out: W, vehicles: &[Vehicle]) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["arrival_time", "id", "direction"])?;
    for v in vehicles {
        w.write_record(&[v.arrival_time.to_string(), v.id.0.to_string(), v.direction.as_str().to_owned()])?;
    }
    w.flush()?;
    Ok(())
}
