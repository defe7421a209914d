//! Closed-form predictions for the Hamming(7,4) channel.
//!
//! These values are only compared against simulation output; nothing here
//! feeds back into the trial loop.
//!
//! # Memoryless channel (bit error probability `p`)
//!
//! ```text
//! P(incorrect)  = 1 - (7 p (1-p)^6 + (1-p)^7)
//! P(bit, raw)   = p
//! P(bit, coded) = 1/7 * sum_{i=2..7} W_i p^i (1-p)^(7-i)
//! ```
//!
//! `W_i` is the total residual weight left by the syndrome decoder over all
//! error patterns of weight `i` (see [`RESIDUAL_WEIGHT_SUMS`]).
//!
//! # Markov channel (`p1 = P(0 -> 1)`, `p2 = P(1 -> 0)`)
//!
//! With stationary probabilities `pi0 = p2 / (p1 + p2)`, `pi1 = p1 / (p1 + p2)`:
//!
//! ```text
//! P(correct) = pi1 p2 (1-p1)^5 + 5 pi0 p1 p2 (1-p1)^4 + pi0 (1-p1)^5 p1 + pi0 (1-p1)^6
//! P(bit, raw) = pi1
//! ```
//!
//! The coded bit error probability has no short closed form; it is computed
//! exactly by summing over all 128 error patterns weighted by their chain
//! probability.

use crate::hamming::{decode, Codeword, CODE_BITS};

/// Number of distinct 7-bit error patterns.
pub const PATTERN_COUNT: usize = 1 << CODE_BITS;

/// Residual error weight after decoding, summed over all patterns of weight `i`.
pub const RESIDUAL_WEIGHT_SUMS: [u32; CODE_BITS + 1] = [0, 0, 63, 133, 112, 84, 49, 7];

/// Error process whose predictions are evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TheoreticalModel {
    /// Independent errors with probability `p`.
    Memoryless { p: f64 },
    /// Stationary two-state Markov errors.
    Markov { p1: f64, p2: f64 },
}

impl TheoreticalModel {
    /// Probability that the decoded word differs from the transmitted one.
    pub fn incorrect_decoding(&self) -> f64 {
        match *self {
            TheoreticalModel::Memoryless { p } => {
                let q = 1.0 - p;
                1.0 - (7.0 * p * q.powi(6) + q.powi(7))
            }
            TheoreticalModel::Markov { p1, p2 } => {
                let pi0 = p2 / (p1 + p2);
                let pi1 = p1 / (p1 + p2);
                let q1 = 1.0 - p1;
                let correct = pi1 * p2 * q1.powi(5)
                    + 5.0 * pi0 * p1 * p2 * q1.powi(4)
                    + pi0 * q1.powi(5) * p1
                    + pi0 * q1.powi(6);
                1.0 - correct
            }
        }
    }

    /// Channel bit error probability before decoding.
    pub fn bit_error_before(&self) -> f64 {
        match *self {
            TheoreticalModel::Memoryless { p } => p,
            TheoreticalModel::Markov { p1, p2 } => p1 / (p1 + p2),
        }
    }

    /// Bit error probability after decoding.
    pub fn bit_error_after(&self) -> f64 {
        match *self {
            TheoreticalModel::Memoryless { p } => {
                let q = 1.0 - p;
                let expected: f64 = (2..=CODE_BITS)
                    .map(|i| {
                        RESIDUAL_WEIGHT_SUMS[i] as f64
                            * p.powi(i as i32)
                            * q.powi((CODE_BITS - i) as i32)
                    })
                    .sum();
                expected / CODE_BITS as f64
            }
            TheoreticalModel::Markov { .. } => {
                let expected: f64 = self
                    .pattern_distribution()
                    .iter()
                    .enumerate()
                    .map(|(pattern, &prob)| prob * residual_weight(pattern as u8) as f64)
                    .sum();
                expected / CODE_BITS as f64
            }
        }
    }

    /// Probability of one error pattern; bit `k` of `pattern` is error bit `e_k`.
    pub fn pattern_probability(&self, pattern: u8) -> f64 {
        let errors = Codeword::from_u8(pattern).bits();
        match *self {
            TheoreticalModel::Memoryless { p } => errors
                .iter()
                .map(|&e| if e == 1 { p } else { 1.0 - p })
                .product(),
            TheoreticalModel::Markov { p1, p2 } => {
                let mut prob = if errors[0] == 1 {
                    p1 / (p1 + p2)
                } else {
                    p2 / (p1 + p2)
                };
                for pair in errors.windows(2) {
                    prob *= match (pair[0], pair[1]) {
                        (0, 0) => 1.0 - p1,
                        (0, _) => p1,
                        (_, 0) => p2,
                        _ => 1.0 - p2,
                    };
                }
                prob
            }
        }
    }

    /// Probabilities of all 128 error patterns, indexed by packed pattern.
    pub fn pattern_distribution(&self) -> [f64; PATTERN_COUNT] {
        let mut dist = [0.0; PATTERN_COUNT];
        for (pattern, prob) in dist.iter_mut().enumerate() {
            *prob = self.pattern_probability(pattern as u8);
        }
        dist
    }
}

/// Bits still wrong after decoding the all-zero codeword hit by `pattern`.
///
/// The code is linear, so the result is the same for every transmitted word.
pub fn residual_weight(pattern: u8) -> u32 {
    decode(&Codeword::from_u8(pattern)).weight()
}
