//! Command-line configuration for the chaos-channel experiments.
//!
//! Parses arguments and resolves them into a [`SweepConfig`].
//!
//! # Philosophy
//!
//! The tool works with ZERO arguments: it runs the standard memoryless and
//! Markov sweeps with the documented seeds. Every flag only overrides one
//! field of that default, and `--print-config` shows what was resolved.

use crate::seeds::random_seeds;
use anyhow::{bail, Context, Result};
use chaos_channel_core::config::{MarkovSweep, MemorylessSweep, DEFAULT_ERROR_RATES, DEFAULT_P2};
use chaos_channel_core::SweepConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Initial state used by `transitions` when none is given.
pub const TRANSITIONS_SEED: f64 = 0.51262323;

#[derive(Debug, Parser)]
#[command(name = "chaos-channel")]
#[command(version)]
#[command(about = "Hamming(7,4) over a channel driven by chaotic maps")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Trials per configuration (default: 1000000)
    #[arg(short = 'n', long, global = true)]
    pub trials: Option<u64>,

    /// Initial state of the source map
    #[arg(long, global = true)]
    pub source_seed: Option<f64>,

    /// Initial state of the error map
    #[arg(long, global = true)]
    pub error_seed: Option<f64>,

    /// Draw both initial states from a ChaCha8 RNG with this seed
    #[arg(long, global = true, conflicts_with_all = ["source_seed", "error_seed"])]
    pub seed: Option<u64>,

    /// Run configurations in parallel
    #[arg(long, global = true)]
    pub parallel: bool,

    /// Print the resolved configuration before running
    #[arg(long, global = true)]
    pub print_config: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sweep memoryless (skew Bernoulli) error channels
    Memoryless {
        /// Error probabilities, comma separated
        #[arg(short, long, value_delimiter = ',')]
        p: Vec<f64>,
    },

    /// Sweep Markov (plm3) error channels
    Markov {
        /// Stationary error probabilities, comma separated
        #[arg(short, long, value_delimiter = ',')]
        p: Vec<f64>,

        /// P(1 -> 0) values, comma separated
        #[arg(long, value_delimiter = ',')]
        p2: Vec<f64>,
    },

    /// Run a sweep described by a TOML file
    Sweep {
        /// Path to the sweep file
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Measure transition statistics of a map's bit stream
    Transitions {
        /// Skew Bernoulli breakpoint (selects the Bernoulli map)
        #[arg(short, long, conflicts_with_all = ["p1", "p2"])]
        c: Option<f64>,

        /// plm3 P(0 -> 1)
        #[arg(long, requires = "p2")]
        p1: Option<f64>,

        /// plm3 P(1 -> 0)
        #[arg(long, requires = "p1")]
        p2: Option<f64>,

        /// Bit threshold (default: the map's own threshold)
        #[arg(short, long)]
        t: Option<f64>,

        /// Initial map state
        #[arg(long, default_value_t = TRANSITIONS_SEED)]
        x0: f64,

        /// Number of transitions to observe
        #[arg(short, long, default_value_t = 1_000_000)]
        length: u64,
    },

    /// Print an example sweep file
    Example,
}

/// Map selected for `transitions`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionMap {
    Bernoulli { c: f64 },
    Markov { p1: f64, p2: f64 },
}

impl Cli {
    /// Resolve the sweep to run for `memoryless`, `markov`, `sweep` or no subcommand.
    pub fn sweep_config(&self) -> Result<SweepConfig> {
        let mut config = match &self.command {
            None => SweepConfig::default(),
            Some(Command::Memoryless { p }) => SweepConfig {
                memoryless: Some(MemorylessSweep { p: or_default(p, &DEFAULT_ERROR_RATES) }),
                markov: None,
                ..SweepConfig::default()
            },
            Some(Command::Markov { p, p2 }) => SweepConfig {
                memoryless: None,
                markov: Some(MarkovSweep {
                    p: or_default(p, &DEFAULT_ERROR_RATES),
                    p2: or_default(p2, &DEFAULT_P2),
                }),
                ..SweepConfig::default()
            },
            Some(Command::Sweep { config }) => SweepConfig::from_file(config)
                .with_context(|| format!("failed to load sweep from {config:?}"))?,
            Some(Command::Transitions { .. }) | Some(Command::Example) => {
                bail!("subcommand does not describe a sweep")
            }
        };

        if let Some(trials) = self.run.trials {
            config.trials = trials;
        }
        if let Some(seed) = self.run.seed {
            config.seeds = random_seeds(seed);
        }
        if let Some(source) = self.run.source_seed {
            config.seeds.source = source;
        }
        if let Some(error) = self.run.error_seed {
            config.seeds.error = error;
        }
        config.parallel |= self.run.parallel;

        config.validate().context("invalid sweep configuration")?;
        Ok(config)
    }
}

impl TransitionMap {
    pub fn from_args(c: Option<f64>, p1: Option<f64>, p2: Option<f64>) -> Result<Self> {
        match (c, p1, p2) {
            (Some(c), None, None) => Ok(TransitionMap::Bernoulli { c }),
            (None, Some(p1), Some(p2)) => Ok(TransitionMap::Markov { p1, p2 }),
            _ => bail!("transitions needs either --c or both --p1 and --p2"),
        }
    }
}

fn or_default(values: &[f64], default: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        default.to_vec()
    } else {
        values.to_vec()
    }
}

/// Print the resolved configuration in human-readable form.
pub fn print_config(config: &SweepConfig) {
    println!("=== Configuration ===");
    println!("Trials per configuration: {}", config.trials);
    println!("Source seed: {}", config.seeds.source);
    println!("Error seed:  {}", config.seeds.error);
    println!("Parallel: {}", config.parallel);
    if let Some(sweep) = &config.memoryless {
        println!("Memoryless p: {:?}", sweep.p);
    }
    if let Some(sweep) = &config.markov {
        println!("Markov p: {:?}", sweep.p);
        println!("Markov p2: {:?}", sweep.p2);
    }
    if let Some(sweep) = &config.reference {
        println!("Reference p: {:?} (prng seed {})", sweep.p, sweep.seed);
    }
    println!("Configurations: {}", config.models().len());
    println!();
}
