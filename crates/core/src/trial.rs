//! Monte Carlo trial engine.
//!
//! One trial is one use of the channel:
//!
//! ```text
//! source stream --4 bits--> encode --codeword--> XOR <--7 bits-- error stream
//!                                                  |
//!                                       decode <---+ received
//!                                          |
//!                            compare with codeword -> TrialCounters
//! ```
//!
//! # Ordering
//!
//! Both streams carry their map state from one trial to the next, so the
//! trials of a configuration must run strictly in order: the correlation
//! between successive error bits is the quantity under test. Different
//! configurations own their own streams and counters and are independent;
//! [`run_sweep`] can spread them over the rayon thread pool.

use crate::error::Result;
use crate::generator::{BitStream, ChaoticStream, PrngStream};
use crate::hamming::{corrupt, decode, encode, error_weight, Codeword, CODE_BITS, DATA_BITS};
use crate::map::{MarkovParams, SkewBernoulli};
use crate::report::Report;
use crate::theory::TheoreticalModel;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Default number of trials per configuration.
pub const DEFAULT_TRIALS: u64 = 1_000_000;

/// Initial state of the information source map.
pub const SOURCE_SEED: f64 = 0.1782612;

/// Initial state of the error map.
pub const ERROR_SEED: f64 = 0.5673244;

/// Initial map states for the two streams of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Seeds {
    #[serde(default = "default_source_seed")]
    pub source: f64,
    #[serde(default = "default_error_seed")]
    pub error: f64,
}

fn default_source_seed() -> f64 {
    SOURCE_SEED
}

fn default_error_seed() -> f64 {
    ERROR_SEED
}

impl Default for Seeds {
    fn default() -> Self {
        Self {
            source: SOURCE_SEED,
            error: ERROR_SEED,
        }
    }
}

/// Error process of one channel configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelModel {
    /// Independent errors from a skew Bernoulli map with `c = t = 1 - p`.
    Memoryless { p: f64 },
    /// Markov errors from plm3 with `P(0 -> 1) = p1`, `P(1 -> 0) = p2`.
    Markov { p1: f64, p2: f64 },
    /// Independent errors from a seeded ChaCha8 RNG.
    Reference { p: f64, seed: u64 },
}

impl ChannelModel {
    /// Markov channel with stationary error probability `p`.
    ///
    /// `p1 = p / (1 - p) * p2` makes `p1 / (p1 + p2) = p`.
    pub fn markov_with_error_rate(p: f64, p2: f64) -> Self {
        ChannelModel::Markov {
            p1: p / (1.0 - p) * p2,
            p2,
        }
    }

    /// Predictions for this configuration.
    pub fn theory(&self) -> TheoreticalModel {
        match *self {
            ChannelModel::Memoryless { p } | ChannelModel::Reference { p, .. } => {
                TheoreticalModel::Memoryless { p }
            }
            ChannelModel::Markov { p1, p2 } => TheoreticalModel::Markov { p1, p2 },
        }
    }

    /// Validate all parameters and create the channel's streams.
    ///
    /// This is the only place parameters are checked; once a [`Channel`]
    /// exists the trial loop needs no further validation.
    ///
    /// # Errors
    /// Returns `MapError::InvalidParameter` naming the offending parameter.
    pub fn build(&self, seeds: Seeds) -> Result<Channel> {
        let source = ChaoticStream::source(seeds.source)?;
        let errors = match *self {
            ChannelModel::Memoryless { p } => {
                ErrorStream::Memoryless(ChaoticStream::memoryless_errors(p, seeds.error)?)
            }
            ChannelModel::Markov { p1, p2 } => {
                ErrorStream::Markov(ChaoticStream::markov_errors(p1, p2, seeds.error)?)
            }
            ChannelModel::Reference { p, seed } => {
                ErrorStream::Reference(PrngStream::new(p, seed)?)
            }
        };
        Ok(Channel {
            model: *self,
            source,
            errors,
        })
    }
}

impl fmt::Display for ChannelModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ChannelModel::Memoryless { p } => write!(f, "p: {p:.5}"),
            ChannelModel::Markov { p1, p2 } => {
                write!(f, "p: {:.5}, p1: {p1:.5}, p2: {p2:.5}", p1 / (p1 + p2))
            }
            ChannelModel::Reference { p, seed } => write!(f, "p: {p:.5}, prng seed: {seed}"),
        }
    }
}

/// Error bit stream of a channel.
#[derive(Debug, Clone)]
enum ErrorStream {
    Memoryless(ChaoticStream<SkewBernoulli>),
    Markov(ChaoticStream<MarkovParams>),
    Reference(PrngStream),
}

impl BitStream for ErrorStream {
    #[inline]
    fn next_bit(&mut self) -> Result<u8> {
        match self {
            ErrorStream::Memoryless(stream) => stream.next_bit(),
            ErrorStream::Markov(stream) => stream.next_bit(),
            ErrorStream::Reference(stream) => stream.next_bit(),
        }
    }
}

/// Everything observed during one channel use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transmission {
    pub sent: Codeword,
    pub errors: [u8; CODE_BITS],
    pub received: Codeword,
    pub decoded: Codeword,
}

impl Transmission {
    /// Channel bit errors before decoding.
    pub fn raw_errors(&self) -> u32 {
        error_weight(&self.errors)
    }

    /// Bit errors left after decoding.
    pub fn residual_errors(&self) -> u32 {
        self.decoded.distance(&self.sent)
    }

    pub fn is_correct(&self) -> bool {
        self.decoded == self.sent
    }
}

/// Running totals for one configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrialCounters {
    /// Trials run
    pub trials: u64,
    /// Trials decoded to the transmitted codeword
    pub ok: u64,
    /// Trials decoded to a wrong codeword
    pub blerr: u64,
    /// Channel bit errors before decoding
    pub berr0: u64,
    /// Bit errors after decoding
    pub berr: u64,
}

impl TrialCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one channel use.
    #[inline]
    pub fn record(&mut self, transmission: &Transmission) {
        self.trials += 1;
        self.berr0 += transmission.raw_errors() as u64;
        if transmission.is_correct() {
            self.ok += 1;
        } else {
            self.blerr += 1;
        }
        self.berr += transmission.residual_errors() as u64;
    }

    /// Add the totals of another run.
    pub fn merge(&mut self, other: &TrialCounters) {
        self.trials += other.trials;
        self.ok += other.ok;
        self.blerr += other.blerr;
        self.berr0 += other.berr0;
        self.berr += other.berr;
    }

    /// Fraction of trials decoded incorrectly.
    pub fn incorrect_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.blerr as f64 / self.trials as f64
        }
    }

    /// Channel bit error rate before decoding.
    pub fn bit_error_before(&self) -> f64 {
        self.per_bit(self.berr0)
    }

    /// Bit error rate after decoding.
    pub fn bit_error_after(&self) -> f64 {
        self.per_bit(self.berr)
    }

    fn per_bit(&self, errors: u64) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            errors as f64 / (CODE_BITS as u64 * self.trials) as f64
        }
    }
}

/// A configured channel: source stream, error stream and codec.
#[derive(Debug, Clone)]
pub struct Channel {
    model: ChannelModel,
    source: ChaoticStream<SkewBernoulli>,
    errors: ErrorStream,
}

impl Channel {
    pub fn model(&self) -> ChannelModel {
        self.model
    }

    /// Run one channel use: 4 source bits, encode, 7 error bits, decode.
    ///
    /// # Errors
    /// Returns `MapError::DomainViolation` if either orbit leaves [0, 1], or
    /// `MapError::DegenerateOrbit` if one collapses onto a fixed point.
    #[inline]
    pub fn transmit(&mut self) -> Result<Transmission> {
        let mut data = [0u8; DATA_BITS];
        self.source.fill(&mut data)?;
        let sent = encode(data);

        let mut errors = [0u8; CODE_BITS];
        self.errors.fill(&mut errors)?;
        let received = corrupt(sent, errors);

        Ok(Transmission {
            sent,
            errors,
            received,
            decoded: decode(&received),
        })
    }

    /// Run `n` consecutive trials and return their totals.
    pub fn run(&mut self, n: u64) -> Result<TrialCounters> {
        let mut counters = TrialCounters::new();
        for _ in 0..n {
            let transmission = self.transmit()?;
            counters.record(&transmission);
        }
        Ok(counters)
    }
}

/// Build, run and report one configuration.
pub fn run_configuration(model: ChannelModel, trials: u64, seeds: Seeds) -> Result<Report> {
    let started = Instant::now();
    let mut channel = model.build(seeds)?;
    let counters = channel.run(trials)?;
    let report = Report::new(model, counters);

    info!(
        config = %model,
        trials,
        incorrect = report.incorrect_rate,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "configuration complete"
    );
    Ok(report)
}

/// Result of one configuration within a sweep.
#[derive(Debug)]
pub struct SweepOutcome {
    pub model: ChannelModel,
    pub result: Result<Report>,
}

/// Run every configuration, in order of `models`.
///
/// A configuration that fails validation (or whose orbit leaves the unit
/// interval or collapses) yields an `Err` outcome; the remaining
/// configurations still run.
pub fn run_sweep(
    models: &[ChannelModel],
    trials: u64,
    seeds: Seeds,
    parallel: bool,
) -> Vec<SweepOutcome> {
    debug!(configurations = models.len(), trials, parallel, "starting sweep");

    let run_one = |model: &ChannelModel| {
        let result = run_configuration(*model, trials, seeds);
        if let Err(ref e) = result {
            warn!(config = %model, error = %e, "configuration rejected");
        }
        SweepOutcome {
            model: *model,
            result,
        }
    };

    if parallel {
        models.par_iter().map(run_one).collect()
    } else {
        models.iter().map(run_one).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, MapError};

    #[test]
    fn test_counters_record() {
        let sent = encode([1, 0, 1, 0]);
        let mut errors = [0u8; CODE_BITS];
        errors[2] = 1;
        errors[5] = 1;
        let received = corrupt(sent, errors);
        let transmission = Transmission {
            sent,
            errors,
            received,
            decoded: decode(&received),
        };

        let mut counters = TrialCounters::new();
        counters.record(&transmission);

        assert_eq!(counters.trials, 1);
        assert_eq!(counters.berr0, 2);
        assert_eq!(counters.blerr, 1);
        assert_eq!(counters.ok, 0);
        assert_eq!(counters.berr, 3);
    }

    #[test]
    fn test_counters_merge_and_rates() {
        let mut a = TrialCounters {
            trials: 10,
            ok: 8,
            blerr: 2,
            berr0: 7,
            berr: 6,
        };
        let b = TrialCounters {
            trials: 10,
            ok: 10,
            blerr: 0,
            berr0: 7,
            berr: 0,
        };
        a.merge(&b);

        assert_eq!(a.trials, 20);
        assert_eq!(a.incorrect_rate(), 0.1);
        assert_eq!(a.bit_error_before(), 0.1);
        assert_eq!(a.bit_error_after(), 6.0 / 140.0);
        assert_eq!(TrialCounters::new().incorrect_rate(), 0.0);
    }

    #[test]
    fn test_transmission_consistency() {
        let mut channel = ChannelModel::Memoryless { p: 0.2 }.build(Seeds::default()).unwrap();
        for _ in 0..1000 {
            let t = channel.transmit().unwrap();
            assert_eq!(corrupt(t.sent, t.errors), t.received);
            if t.raw_errors() <= 1 {
                assert!(t.is_correct());
            } else {
                assert!(!t.is_correct());
            }
        }
    }

    #[test]
    fn test_markov_with_error_rate() {
        let model = ChannelModel::markov_with_error_rate(0.2, 0.16);
        match model {
            ChannelModel::Markov { p1, p2 } => {
                assert!((p1 - 0.04).abs() < 1e-12);
                assert_eq!(p2, 0.16);
            }
            other => panic!("unexpected model {other:?}"),
        }
        assert_eq!(model.to_string(), "p: 0.20000, p1: 0.04000, p2: 0.16000");
    }

    #[test]
    fn test_build_rejects_invalid_parameters() {
        let err = ChannelModel::Memoryless { p: 1.2 }.build(Seeds::default()).unwrap_err();
        assert!(matches!(err, Error::Map(MapError::InvalidParameter { name: "p", .. })));

        let err = ChannelModel::Markov { p1: 0.6, p2: 0.5 }
            .build(Seeds::default())
            .unwrap_err();
        assert!(matches!(err, Error::Map(MapError::InvalidParameter { .. })));

        let bad_seeds = Seeds {
            source: 2.0,
            error: ERROR_SEED,
        };
        assert!(ChannelModel::Memoryless { p: 0.1 }.build(bad_seeds).is_err());
    }

    #[test]
    fn test_run_is_deterministic() {
        let model = ChannelModel::markov_with_error_rate(0.15, 0.34);
        let a = model.build(Seeds::default()).unwrap().run(20_000).unwrap();
        let b = model.build(Seeds::default()).unwrap().run(20_000).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.ok + a.blerr, a.trials);
    }

    #[test]
    fn test_split_run_matches_single_run() {
        let model = ChannelModel::Memoryless { p: 0.1 };
        let whole = model.build(Seeds::default()).unwrap().run(10_000).unwrap();

        let mut channel = model.build(Seeds::default()).unwrap();
        let mut halves = channel.run(5_000).unwrap();
        halves.merge(&channel.run(5_000).unwrap());

        assert_eq!(whole, halves);
    }
}
