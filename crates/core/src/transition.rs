//! First-order statistics of a bit stream.
//!
//! Counts symbols and successive pairs over `n` steps of a stream and turns
//! them into marginal, joint and conditional probabilities. For a plm3
//! stream the conditionals should reproduce the chain the map was derived
//! from (`P(1|0) = p1`, `P(0|1) = p2`); for a skew Bernoulli stream
//! thresholded at its breakpoint they should equal the marginals. Moving the
//! threshold away from the breakpoint makes successive bits dependent.

use crate::error::Result;
use crate::generator::BitStream;

/// Pair counts over `n` successive transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionStats {
    pub n: u64,
    pub ones: u64,
    /// `pairs[i][j]` counts bit `i` followed by bit `j`
    pub pairs: [[u64; 2]; 2],
}

impl TransitionStats {
    /// Observe `n` transitions (`n + 1` bits) of a stream.
    pub fn measure(stream: &mut impl BitStream, n: u64) -> Result<Self> {
        let mut stats = Self {
            n,
            ..Self::default()
        };
        let mut current = stream.next_bit()?;
        for _ in 0..n {
            let next = stream.next_bit()?;
            stats.ones += current as u64;
            stats.pairs[current as usize][next as usize] += 1;
            current = next;
        }
        Ok(stats)
    }

    /// Marginal probability of `bit`.
    pub fn p(&self, bit: u8) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        let p1 = self.ones as f64 / self.n as f64;
        if bit == 0 {
            1.0 - p1
        } else {
            p1
        }
    }

    /// Joint probability of the pair `(first, second)`.
    pub fn joint(&self, first: u8, second: u8) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        self.pairs[first as usize][second as usize] as f64 / self.n as f64
    }

    /// Probability that `next` follows `given`; 0 if `given` never occurred.
    pub fn conditional(&self, next: u8, given: u8) -> f64 {
        let p = self.p(given);
        if p == 0.0 {
            0.0
        } else {
            self.joint(given, next) / p
        }
    }

    /// Human-readable summary, one probability per line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("P(0): {:.5}", self.p(0)),
            format!("P(1): {:.5}", self.p(1)),
        ];
        for (i, j) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            lines.push(format!("P({i}{j}): {:.5}", self.joint(i, j)));
        }
        for (next, given) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            lines.push(format!("P({next}|{given}): {:.5}", self.conditional(next, given)));
        }
        lines
    }

    /// Print the summary to stdout.
    pub fn print_summary(&self) {
        for line in self.lines() {
            println!("{line}");
        }
    }
}
