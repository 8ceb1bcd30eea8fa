//! Indexer assignment simulator CLI
//!
//! ```bash
//! # Replay explicit arrivals
//! indexer-sim -m 3 -k 2 --arrivals 1,2,3,7 --durations 5,4,3,2 --trace
//!
//! # Load a JSON scenario
//! indexer-sim --scenario scenario.json --json
//!
//! # Random Bernoulli workload
//! indexer-sim -m 4 -k 3 --ticks 1000 --p-arrival 0.5 --seed 7
//! ```

use anyhow::{Context, Result, bail};
use clap::Parser;
use indexer_model::{NearestCyclicPolicy, Scenario, Sim, SimConfig, core::Ticks};
use rand::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "indexer-sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of indexer workers
    #[arg(short = 'm', long, default_value_t = 3, allow_negative_numbers = true)]
    workers: i64,

    /// Number of busiest workers to report
    #[arg(short = 'k', long, default_value_t = 2, allow_negative_numbers = true)]
    top_k: i64,

    /// JSON scenario file; overrides every other workload option
    #[arg(long)]
    scenario: Option<std::path::PathBuf>,

    /// Comma-separated arrival times
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    arrivals: Vec<Ticks>,

    /// Comma-separated processing durations, index-aligned with --arrivals
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    durations: Vec<Ticks>,

    /// Ticks of random workload to generate when no documents are given
    #[arg(long, default_value_t = 500)]
    ticks: Ticks,

    /// Chance a document arrives on a given tick
    #[arg(long, default_value_t = 0.3)]
    p_arrival: f64,

    /// Chance an arriving document is short
    #[arg(long, default_value_t = 0.3)]
    p_short: f64,

    #[arg(long, default_value_t = 2)]
    short_ticks: Ticks,

    #[arg(long, default_value_t = 6)]
    long_ticks: Ticks,

    /// Random seed. When omitted, a random seed is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Print every event as it is processed
    #[arg(long)]
    trace: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,indexer_model=info")),
        )
        .init();

    let args = Args::parse();

    let (config, arrivals, durations) = if let Some(path) = &args.scenario {
        let scenario = Scenario::from_path(path).context("loading scenario")?;
        let config = scenario.config()?;
        (config, scenario.arrival_times, scenario.processing_durations)
    } else {
        let config = SimConfig::try_from_signed(args.workers, args.top_k)?;
        if !args.arrivals.is_empty() || !args.durations.is_empty() {
            (config, args.arrivals.clone(), args.durations.clone())
        } else {
            if !(0.0..=1.0).contains(&args.p_arrival) || !(0.0..=1.0).contains(&args.p_short) {
                bail!("probabilities must lie within [0, 1]");
            }
            let seed = args.seed.unwrap_or_else(rand::random);
            info!(seed, ticks = args.ticks, "Generating Bernoulli workload");
            let (arrivals, durations) = bernoulli_documents(
                args.ticks,
                args.p_arrival,
                args.p_short,
                args.short_ticks,
                args.long_ticks,
                seed,
            );
            (config, arrivals, durations)
        }
    };

    info!(
        workers = config.workers,
        top_k = config.top_k,
        documents = arrivals.len(),
        "Starting simulation"
    );

    let mut sim = Sim::<NearestCyclicPolicy>::new(config, &arrivals, &durations)?;
    while !sim.is_finished() {
        let Some(event) = sim.step() else { break };
        if args.trace {
            println!("t={} {:?}", sim.core.now(), event);
        }
    }

    let report = sim.report();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
        println!("Dropped documents = {}", report.dropped);
        println!("Average load: {:.2} documents/worker", report.mean_load);
        println!("Average busy time: {:.2} ticks/worker", report.mean_busy_ticks);
    }

    Ok(())
}

fn bernoulli_documents(
    ticks: Ticks,
    p_arrival: f64,
    p_short: f64,
    short_ticks: Ticks,
    long_ticks: Ticks,
    seed: u64,
) -> (Vec<Ticks>, Vec<Ticks>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut arrivals = Vec::new();
    let mut durations = Vec::new();

    for t in 0..ticks {
        if rng.random::<f64>() < p_arrival {
            let run_time = if rng.random::<f64>() < p_short {
                short_ticks
            } else {
                long_ticks
            };

            arrivals.push(t);
            durations.push(run_time);
        }
    }

    (arrivals, durations)
}
