//! Fault-tolerant sorting demo built on the redoubt recovery-block engine.
//!
//! Reads a file of whitespace-separated integers, sorts it with a primary
//! algorithm under a deadline and a simulated hardware-fault model, and
//! falls back to an independent backup algorithm when the primary's result
//! is rejected.
//!
//! ```bash
//! redoubt input.txt output.txt 0.0001 0.0001 10
//!
//! # Reproducible fault behavior
//! redoubt input.txt output.txt 0.001 0.0 10 --seed 12345
//! ```

mod dataset;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use redoubt::{AttemptSpec, ExecutionReport, RecoveryBlockExecutor, RecoveryChain, SeededRng};
use redoubt_sort::{HeapSort, InsertionSort};

/// Fault-tolerant sorter: a primary algorithm with an independent backup,
/// each run under a deadline and a simulated hardware-fault model.
#[derive(Parser)]
#[command(name = "redoubt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file with values to sort.
    input: PathBuf,

    /// Output file to write sorted values to.
    output: PathBuf,

    /// Failure probability of the primary sorting routine (0.0..=1.0).
    #[arg(value_parser = parse_probability)]
    primary_failure_probability: f64,

    /// Failure probability of the backup sorting routine (0.0..=1.0).
    #[arg(value_parser = parse_probability)]
    backup_failure_probability: f64,

    /// Seconds to allow each sorting routine before its attempt times out.
    timeout_secs: u64,

    /// Seed for the fault-injection RNG; omit for entropy seeding.
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug-level logging.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_probability(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("`{raw}` is not in 0.0..=1.0"));
    }
    Ok(value)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let values = dataset::read_values(&cli.input)
        .with_context(|| format!("could not read input file {}", cli.input.display()))?;
    info!(count = values.len(), input = %cli.input.display(), "loaded dataset");

    let deadline = Duration::from_secs(cli.timeout_secs);
    let chain = RecoveryChain::new(
        AttemptSpec::new(Box::new(HeapSort::new()))
            .with_failure_probability(cli.primary_failure_probability)
            .with_deadline(deadline),
    )
    .with_backup(
        AttemptSpec::new(Box::new(InsertionSort::new()))
            .with_failure_probability(cli.backup_failure_probability)
            .with_deadline(deadline),
    );

    let mut rng = match cli.seed {
        Some(seed) => {
            info!(seed, "using seeded RNG");
            SeededRng::new(seed)
        }
        None => SeededRng::from_entropy(),
    };

    match RecoveryBlockExecutor::new(values, chain).run(&mut rng) {
        ExecutionReport::Success { output, attempt } => {
            info!(attempt, count = output.len(), "result accepted");
            dataset::write_values(&cli.output, &output)
                .with_context(|| format!("could not write output file {}", cli.output.display()))?;
            Ok(())
        }
        ExecutionReport::AllFailed => {
            // Leave no stale output behind when every attempt failed.
            let _ = fs::remove_file(&cli.output);
            bail!("all sorting attempts failed; no output written");
        }
    }
}
