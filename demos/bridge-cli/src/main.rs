//! bridge-sim — command-line driver for the single-lane bridge simulator.
//!
//! ```text
//! bridge-sim generate --count 20 --seed 7 --out arrivals.csv
//! bridge-sim run --input arrivals.csv --priority a_to_b --engine both --time-unit-ms 50
//! bridge-sim compare --sizes 5,10,20,50
//! ```
//!
//! Exit status: 0 on success, 1 when the two engines disagree on crossing
//! counts, 2 when a concurrent run timed out or rejected vehicles.

mod report;
mod workload;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bridge_core::{BridgeConfig, Direction, TimeScale, Vehicle, DEFAULT_MAX_CONSECUTIVE};
use bridge_output::{CsvWriter, OutputObserver};
use bridge_queue::load_arrivals_csv;
use bridge_sim::{ConcurrentEngine, RunReport, SequentialEngine, SequentialRun, StatsSnapshot};

use report::CompareRow;

const EXIT_MISMATCH:   u8 = 1;
const EXIT_INCOMPLETE: u8 = 2;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "bridge-sim")]
#[command(about = "Single-lane bridge crossing simulator")]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "debug", "bridge_sim=debug")
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate the vehicles in an arrival file
    Run(RunArgs),

    /// Write a random arrival file
    Generate {
        /// Number of vehicles
        #[arg(short, long, default_value = "20")]
        count: usize,

        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Arrivals are spread uniformly over [0, SPREAD) time units
        #[arg(long, default_value = "10.0")]
        spread: f64,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Time both engines on generated workloads of increasing size
    Compare {
        /// Workload sizes (comma-separated)
        #[arg(long, value_delimiter = ',', default_value = "5,10,20,50")]
        sizes: Vec<usize>,

        /// RNG seed; each size uses seed + size
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Arrivals are spread uniformly over [0, SPREAD) time units
        #[arg(long, default_value = "10.0")]
        spread: f64,

        /// Wall-clock milliseconds per time unit for the concurrent engine
        #[arg(long, default_value = "10")]
        time_unit_ms: u64,
    },
}

#[derive(Args)]
struct RunArgs {
    /// CSV file with an `arrival_time,id,direction` header
    #[arg(short, long)]
    input: PathBuf,

    /// Direction favoured when both sides wait (a_to_b | b_to_a)
    #[arg(long)]
    priority: Option<Direction>,

    /// Same-direction admissions allowed in a row while the other side waits
    #[arg(long, default_value_t = DEFAULT_MAX_CONSECUTIVE)]
    max_consecutive: u32,

    /// Time units a vehicle holds the bridge
    #[arg(long, default_value = "1.0")]
    crossing_duration: f64,

    #[arg(long, value_enum, default_value_t = EngineChoice::Both)]
    engine: EngineChoice,

    /// Wall-clock milliseconds per time unit for the concurrent engine
    #[arg(long, default_value = "1000")]
    time_unit_ms: u64,

    /// Concurrent run timeout in seconds [default: derived from the arrivals]
    #[arg(long)]
    timeout: Option<u64>,

    /// Directory for crossings.csv and summary.csv
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print results as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineChoice {
    Sequential,
    Concurrent,
    Both,
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn init_log(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|e| {
            eprintln!("invalid log filter {level:?} ({e}), using info");
            EnvFilter::new("info")
        });

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_thread_names(true)
        .with_target(false)
        .try_init()
    {
        eprintln!("failed to init logger: {e}");
    }
}

// ── Report output ─────────────────────────────────────────────────────────────

type CsvObserver = Option<OutputObserver<CsvWriter>>;

fn csv_observer(dir: Option<&Path>) -> Result<CsvObserver> {
    let Some(dir) = dir else { return Ok(None) };
    let writer = CsvWriter::new(dir).with_context(|| format!("creating report in {}", dir.display()))?;
    info!(dir = %dir.display(), "writing crossing report");
    Ok(Some(OutputObserver::new(writer)))
}

fn finish_output(observer: &CsvObserver, statistics: &StatsSnapshot) -> Result<()> {
    if let Some(obs) = observer {
        obs.write_summary(statistics);
        obs.finish();
        if let Some(e) = obs.take_error() {
            return Err(e).context("writing crossing report");
        }
    }
    Ok(())
}

// ── run ───────────────────────────────────────────────────────────────────────

fn run_sequential(config: &BridgeConfig, vehicles: &[Vehicle], out: Option<&Path>) -> Result<(SequentialRun, Duration)> {
    let engine = SequentialEngine::with_observer(config.clone(), csv_observer(out)?)?;
    let t0 = Instant::now();
    let run = engine.simulate(vehicles)?;
    let elapsed = t0.elapsed();
    finish_output(engine.observer(), &run.statistics)?;
    Ok((run, elapsed))
}

fn run_concurrent(
    config:   &BridgeConfig,
    vehicles: &[Vehicle],
    timeout:  Option<Duration>,
    out:      Option<&Path>,
) -> Result<RunReport> {
    let mut engine = ConcurrentEngine::with_observer(config.clone(), csv_observer(out)?)?;
    if let Some(timeout) = timeout {
        engine = engine.with_timeout(timeout);
    }
    let report = engine.run(vehicles)?;
    finish_output(engine.observer(), &report.statistics)?;
    Ok(report)
}

fn run(args: RunArgs) -> Result<ExitCode> {
    let vehicles =
        load_arrivals_csv(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    info!(vehicles = vehicles.len(), input = %args.input.display(), "loaded arrivals");

    let config = BridgeConfig::default()
        .with_priority(args.priority)
        .with_max_consecutive(args.max_consecutive)
        .with_crossing_duration(args.crossing_duration)
        .with_time_scale(TimeScale::from_millis(args.time_unit_ms));
    config.validate()?;

    // With both engines each gets its own report subdirectory.
    let out_dir = |name: &str| -> Option<PathBuf> {
        args.output.as_ref().map(|d| if args.engine == EngineChoice::Both { d.join(name) } else { d.clone() })
    };

    let mut code = ExitCode::SUCCESS;
    let mut sequential = None;
    let mut concurrent = None;

    if args.engine != EngineChoice::Concurrent {
        let (run, elapsed) = run_sequential(&config, &vehicles, out_dir("sequential").as_deref())?;
        info!(elapsed = ?elapsed, end_time = run.end_time, "sequential engine done");
        sequential = Some(run);
    }

    if args.engine != EngineChoice::Sequential {
        let timeout = args.timeout.map(Duration::from_secs);
        let report = run_concurrent(&config, &vehicles, timeout, out_dir("concurrent").as_deref())?;
        for (id, err) in &report.rejected {
            warn!(vehicle = %id, error = %err, "vehicle rejected");
        }
        if !report.is_complete() {
            warn!(completed = report.completed, submitted = report.submitted, "not all vehicles crossed");
            code = ExitCode::from(EXIT_INCOMPLETE);
        }
        concurrent = Some(report);
    }

    let agree = match (&sequential, &concurrent) {
        (Some(s), Some(c)) if c.is_complete() => Some(report::counts_agree(&s.statistics, &c.statistics)),
        _ => None,
    };
    if agree == Some(false) {
        error!("engines disagree on crossing counts");
        code = ExitCode::from(EXIT_MISMATCH);
    }

    if args.json {
        let doc = json!({
            "sequential": sequential.as_ref().map(|s| json!({
                "statistics": s.statistics,
                "end_time":   s.end_time,
            })),
            "concurrent": concurrent.as_ref().map(|c| json!({
                "statistics": c.statistics,
                "submitted":  c.submitted,
                "completed":  c.completed,
                "elapsed_ms": c.elapsed.as_secs_f64() * 1e3,
            })),
            "counts_agree": agree,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        if let Some(s) = &sequential {
            report::print_stats("sequential", &s.statistics);
        }
        if let Some(c) = &concurrent {
            report::print_stats("concurrent", &c.statistics);
            if !c.is_complete() {
                println!("Incomplete: {}/{} vehicles crossed\n", c.completed, c.submitted);
            }
        }
        if let Some(agree) = agree {
            println!("Engines agree on crossing counts: {}", if agree { "yes" } else { "NO" });
        }
    }

    Ok(code)
}

// ── generate / compare ────────────────────────────────────────────────────────

fn generate(count: usize, seed: u64, spread: f64, out: Option<PathBuf>) -> Result<()> {
    let vehicles = workload::generate(count, seed, spread)?;
    match out {
        Some(path) => {
            let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
            workload::write_arrivals(file, &vehicles)?;
            info!(vehicles = count, out = %path.display(), "arrival file written");
        }
        None => workload::write_arrivals(io::stdout().lock(), &vehicles)?,
    }
    Ok(())
}

fn compare(sizes: &[usize], seed: u64, spread: f64, time_unit_ms: u64) -> Result<ExitCode> {
    let config = BridgeConfig::default().with_time_scale(TimeScale::from_millis(time_unit_ms));
    let mut rows = Vec::with_capacity(sizes.len());
    let mut code = ExitCode::SUCCESS;

    for &n in sizes {
        info!(vehicles = n, "comparing engines");
        let vehicles = workload::generate(n, seed.wrapping_add(n as u64), spread)?;

        let (run, seq_elapsed) = run_sequential(&config, &vehicles, None)?;
        let report = run_concurrent(&config, &vehicles, None, None)?;
        if !report.is_complete() {
            warn!(completed = report.completed, submitted = report.submitted, "concurrent run incomplete");
            code = ExitCode::from(EXIT_INCOMPLETE);
        }

        let complete = report.is_complete();
        let row = CompareRow {
            vehicles:      n,
            sequential_ms: seq_elapsed.as_secs_f64() * 1e3,
            concurrent_ms: report.elapsed.as_secs_f64() * 1e3,
            sequential:    run.statistics,
            concurrent:    report.statistics,
        };
        if complete && !report::counts_agree(&row.sequential, &row.concurrent) {
            error!(vehicles = n, "engines disagree on crossing counts");
            code = ExitCode::from(EXIT_MISMATCH);
        }
        rows.push(row);
    }

    report::print_comparison(&rows);
    Ok(code)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_log(&cli.log_level);

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Generate { count, seed, spread, out } => {
            generate(count, seed, spread, out)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Compare { sizes, seed, spread, time_unit_ms } => compare(&sizes, seed, spread, time_unit_ms),
    }
}
