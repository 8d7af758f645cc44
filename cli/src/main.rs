//! `netsim` - run the retransmission demo from the command line
//!
//! ```text
//! netsim [demo] [runs] [seed]
//! ```
//!
//! `demo` is 0 (loss 0.5, 10 retries) or 1 (loss 1/√2, 1000 retries),
//! `runs` defaults to 3. The per-run trace is printed when fewer than 10
//! runs are requested; set `RUST_LOG` to change what else is shown.

use anyhow::{bail, Context};
use clap::Parser;
use netsim_core::demo::{DemoScenario, DemoSetup};
use netsim_core::{Statistics, TracingSink, TRACE_TARGET};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

const DEFAULT_SEED: u64 = 12345;

/// Runs beyond this count are too many to trace line by line
const TRACE_RUN_LIMIT: u64 = 10;

#[derive(Parser, Debug)]
#[command(name = "netsim")]
#[command(about = "Stop-and-wait retransmission over lossy channels")]
struct Args {
    /// Scenario: 0 = loss 0.5 with 10 retries, 1 = loss 1/√2 with 1000 retries
    #[arg(default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=1))]
    demo: u32,

    /// Number of runs; each sends one message from time zero
    #[arg(default_value_t = 3)]
    runs: u64,

    /// RNG seed
    #[arg(default_value_t = DEFAULT_SEED)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn"))
                .add_directive(format!("{}=info", TRACE_TARGET).parse()?),
        )
        .without_time()
        .init();

    let args = Args::parse();
    let Some(scenario) = DemoScenario::from_index(args.demo) else {
        bail!("unknown demo {}; expected 0 or 1", args.demo);
    };

    let trace = args.runs < TRACE_RUN_LIMIT;
    let setup = DemoSetup::build(scenario, args.seed, trace, Rc::new(TracingSink))?;
    tracing::debug!(
        scenario = ?scenario,
        runs = args.runs,
        seed = args.seed,
        "starting demo"
    );

    for run in 0..args.runs {
        setup
            .run_once(run)
            .with_context(|| format!("run {} failed", run))?;
    }

    print_histogram("Sender", &setup.sender.stats());
    print_histogram("Receiver", &setup.receiver.stats());
    Ok(())
}

fn print_histogram(name: &str, stats: &Statistics) {
    println!("{} statistics:", name);
    for (label, count) in stats.histogram() {
        println!("  {:<14} {}", label, count);
    }
}
