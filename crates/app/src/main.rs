//! chaos-channel CLI - Hamming(7,4) Monte Carlo over chaotic-map channels.

mod config;
mod seeds;

use anyhow::{Context, Result};
use chaos_channel_core::generator::ChaoticStream;
use chaos_channel_core::map::{ChaoticMap, MarkovParams, SkewBernoulli, Threshold};
use chaos_channel_core::report::error_line;
use chaos_channel_core::transition::TransitionStats;
use chaos_channel_core::{run_sweep, SweepConfig};
use clap::Parser;
use config::{print_config, Cli, Command, TransitionMap};
use std::time::Instant;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.run.verbose);

    match &cli.command {
        Some(Command::Example) => {
            let mut example = SweepConfig::default();
            example.reference = Some(Default::default());
            println!("{}", example.to_toml_string()?);
            Ok(())
        }
        Some(Command::Transitions {
            c,
            p1,
            p2,
            t,
            x0,
            length,
        }) => run_transitions(TransitionMap::from_args(*c, *p1, *p2)?, *t, *x0, *length),
        _ => {
            let config = cli.sweep_config()?;
            if cli.run.print_config {
                print_config(&config);
            }
            run(&config)
        }
    }
}

fn run(config: &SweepConfig) -> Result<()> {
    let models = config.models();
    let started = Instant::now();
    info!(
        configurations = models.len(),
        trials = config.trials,
        parallel = config.parallel,
        "running sweep"
    );

    let outcomes = run_sweep(&models, config.trials, config.seeds, config.parallel);

    let mut rejected = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => report.print(),
            Err(e) => {
                rejected += 1;
                println!("{}", error_line(&outcome.model, e));
            }
        }
    }

    if rejected > 0 {
        warn!(rejected, "some configurations were rejected");
    }
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "sweep complete");
    Ok(())
}

fn run_transitions(map: TransitionMap, t: Option<f64>, x0: f64, length: u64) -> Result<()> {
    let stats = match map {
        TransitionMap::Bernoulli { c } => {
            println!("parameter c: {c}");
            measure_transitions(SkewBernoulli::new(c)?, t, x0, length)?
        }
        TransitionMap::Markov { p1, p2 } => {
            let params = MarkovParams::derive(p1, p2)?;
            println!(
                "parameter p1: {p1}, p2: {p2} --> t: {:.3}, a: {:.3}, c1: {:.3}, c2: {:.3}, \
                 a1: {:.3}, a2: {:.3}",
                params.t(),
                params.a(),
                params.c1(),
                params.c2(),
                params.a1(),
                params.a2()
            );
            measure_transitions(params, t, x0, length)?
        }
    };

    stats.print_summary();
    Ok(())
}

/// Threshold the map's orbit at `t`, or at the map's own threshold if unset.
fn measure_transitions<M: ChaoticMap>(
    map: M,
    t: Option<f64>,
    x0: f64,
    length: u64,
) -> Result<TransitionStats> {
    let threshold = match t {
        Some(t) => Threshold::new(t)?,
        None => map.threshold(),
    };
    println!("threshold t: {}", threshold.value());
    let mut stream = ChaoticStream::with_threshold(map, threshold, x0)?;
    TransitionStats::measure(&mut stream, length).context("bit stream failed")
}
