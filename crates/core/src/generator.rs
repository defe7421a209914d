//! Bit streams that feed the channel.
//!
//! A [`ChaoticStream`] owns one map state and iterates its map once per bit:
//! the current state is thresholded, then advanced. The stream is infinite
//! and cannot be rewound except by [`ChaoticStream::reseed`], which restores
//! the original initial state.
//!
//! # Streams used by the channel
//!
//! - **Source**: skew Bernoulli with `c = t = 0.49999`, an almost fair coin.
//!   The breakpoint avoids exactly 0.5, where every division is by a power of
//!   two and the floating-point orbit collapses to 0 within ~50 steps.
//! - **Memoryless errors**: skew Bernoulli with `c = t = 1 - p`, so that
//!   `P(error) = p` independently per bit.
//! - **Markov errors**: plm3 with `t = p2 / (p1 + p2)`; successive error bits
//!   follow a two-state chain with `P(0 -> 1) = p1`, `P(1 -> 0) = p2`.
//!
//! # Collapsed orbits
//!
//! Parameters whose slopes are all powers of two (`p = 0.5`, plm3 at
//! `(0.25, 0.25)`, ...) shift mantissa bits out on every step until the
//! orbit sits exactly on a fixed point of the map. From then on the stream
//! would emit a constant bit. [`ChaoticStream::next_bit`] reports that as
//! [`MapError::DegenerateOrbit`] instead.
//!
//! [`PrngStream`] is a Bernoulli(p) stream over a seeded ChaCha8 RNG, used as
//! a reference channel for comparison.

use crate::error::{MapError, Result};
use crate::map::{ChaoticMap, MarkovParams, SkewBernoulli, Threshold};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Breakpoint (and threshold) of the information source map.
pub const SOURCE_BREAKPOINT: f64 = 0.49999;

/// A source of binary digits.
pub trait BitStream {
    /// Produce the next bit (0 or 1).
    fn next_bit(&mut self) -> Result<u8>;

    /// Fill `bits` with consecutive bits from the stream.
    fn fill(&mut self, bits: &mut [u8]) -> Result<()> {
        for bit in bits.iter_mut() {
            *bit = self.next_bit()?;
        }
        Ok(())
    }
}

/// Bit stream produced by thresholding the orbit of a chaotic map.
#[derive(Debug, Clone)]
pub struct ChaoticStream<M> {
    map: M,
    threshold: Threshold,
    seed: f64,
    state: f64,
    emitted: u64,
}

impl<M: ChaoticMap> ChaoticStream<M> {
    /// Create a stream thresholded at the map's natural threshold.
    ///
    /// # Errors
    /// Returns `MapError::InvalidParameter` if `seed` is outside [0, 1].
    pub fn new(map: M, seed: f64) -> Result<Self> {
        let threshold = map.threshold();
        Self::with_threshold(map, threshold, seed)
    }

    /// Create a stream with an explicit threshold.
    pub fn with_threshold(map: M, threshold: Threshold, seed: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&seed) {
            return Err(
            MapError::invalid("seed", seed, "initial state must lie in [0, 1]").into(),
        );
        }
        Ok(Self {
            map,
            threshold,
            seed,
            state: seed,
            emitted: 0,
        })
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Current map state (the state the next bit will be read from).
    pub fn state(&self) -> f64 {
        self.state
    }

    pub fn seed(&self) -> f64 {
        self.seed
    }

    /// Number of bits emitted since construction or the last reseed.
    pub fn position(&self) -> u64 {
        self.emitted
    }

    /// Restart the stream from its initial state.
    pub fn reseed(&mut self) {
        self.state = self.seed;
        self.emitted = 0;
    }
}

impl<M: ChaoticMap> BitStream for ChaoticStream<M> {
    /// # Errors
    /// Returns `MapError::DomainViolation` if the state left [0, 1], or
    /// `MapError::DegenerateOrbit` if the map left the state unchanged.
    #[inline]
    fn next_bit(&mut self) -> Result<u8> {
        let bit = self.threshold.bit(self.state);
        let next = self.map.step(self.state)?;
        if next == self.state {
            return Err(MapError::DegenerateOrbit {
                map: self.map.name(),
                state: next,
                steps: self.emitted,
            }
            .into());
        }
        self.state = next;
        self.emitted += 1;
        Ok(bit)
    }
}

impl ChaoticStream<SkewBernoulli> {
    /// Information source: near-fair skew Bernoulli orbit.
    pub fn source(seed: f64) -> Result<Self> {
        Self::new(SkewBernoulli::new(SOURCE_BREAKPOINT)?, seed)
    }

    /// Memoryless error source with bit error probability `p`.
    ///
    /// # Errors
    /// Returns `MapError::InvalidParameter` unless `0 < p < 1`.
    pub fn memoryless_errors(p: f64, seed: f64) -> Result<Self> {
        validate_probability("p", p)?;
        Self::new(SkewBernoulli::new(1.0 - p)?, seed)
    }
}

impl ChaoticStream<MarkovParams> {
    /// Markov error source with `P(0 -> 1) = p1` and `P(1 -> 0) = p2`.
    pub fn markov_errors(p1: f64, p2: f64, seed: f64) -> Result<Self> {
        Self::new(MarkovParams::derive(p1, p2)?, seed)
    }
}

/// Bernoulli(p) bit stream over a seeded ChaCha8 RNG.
#[derive(Debug, Clone)]
pub struct PrngStream {
    rng: ChaCha8Rng,
    p: f64,
    seed: u64,
}

impl PrngStream {
    /// # Errors
    /// Returns `MapError::InvalidParameter` unless `0 < p < 1`.
    pub fn new(p: f64, seed: u64) -> Result<Self> {
        validate_probability("p", p)?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            p,
            seed,
        })
    }

    pub fn probability(&self) -> f64 {
        self.p
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BitStream for PrngStream {
    #[inline]
    fn next_bit(&mut self) -> Result<u8> {
        Ok(u8::from(self.rng.gen::<f64>() < self.p))
    }
}

pub(crate) fn validate_probability(name: &'static str, p: f64) -> Result<()> {
    if !(p > 0.0 && p < 1.0) {
        return Err(
            MapError::invalid(name, p, "probability must lie strictly inside (0, 1)").into(),
        );
    }
    Ok(())
}
