//! Empirical rates versus theoretical predictions.
//!
//! A [`Report`] is produced once per configuration, after all trials:
//! - Incorrect decoding rate `blerr / N`
//! - Bit error rate before decoding `berr0 / 7N`
//! - Bit error rate after decoding `berr / 7N`
//!
//! each next to its closed-form prediction. Reports are plain values; the
//! caller decides whether to print them.

use crate::error::Error;
use crate::trial::{ChannelModel, TrialCounters};

/// Computed and theoretical rates for one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub model: ChannelModel,
    pub counters: TrialCounters,

    /// Fraction of trials decoded to a wrong codeword
    pub incorrect_rate: f64,
    pub incorrect_theory: f64,

    /// Channel bit error probability
    pub bit_error_before: f64,
    pub bit_error_before_theory: f64,

    /// Bit error probability after syndrome decoding
    pub bit_error_after: f64,
    pub bit_error_after_theory: f64,
}

impl Report {
    pub fn new(model: ChannelModel, counters: TrialCounters) -> Self {
        let theory = model.theory();
        Self {
            model,
            counters,
            incorrect_rate: counters.incorrect_rate(),
            incorrect_theory: theory.incorrect_decoding(),
            bit_error_before: counters.bit_error_before(),
            bit_error_before_theory: theory.bit_error_before(),
            bit_error_after: counters.bit_error_after(),
            bit_error_after_theory: theory.bit_error_after(),
        }
    }

    /// Largest absolute gap between a computed rate and its prediction.
    pub fn max_deviation(&self) -> f64 {
        [
            (self.incorrect_rate - self.incorrect_theory).abs(),
            (self.bit_error_before - self.bit_error_before_theory).abs(),
            (self.bit_error_after - self.bit_error_after_theory).abs(),
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }

    /// True if every reported value is a finite number.
    pub fn is_finite(&self) -> bool {
        [
            self.incorrect_rate,
            self.incorrect_theory,
            self.bit_error_before,
            self.bit_error_before_theory,
            self.bit_error_after,
            self.bit_error_after_theory,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// One console line for this configuration.
    pub fn line(&self) -> String {
        format!(
            "For {}; incorrect decoding computed value: {:.5}, incorrect decoding theoretical value: {:.5}, \
             bit error probability before decoding: {:.5} (theoretical {:.5}), \
             bit error probability after decoding: {:.5} (theoretical {:.5})",
            self.model,
            self.incorrect_rate,
            self.incorrect_theory,
            self.bit_error_before,
            self.bit_error_before_theory,
            self.bit_error_after,
            self.bit_error_after_theory,
        )
    }

    /// Print the report line to stdout.
    pub fn print(&self) {
        println!("{}", self.line());
    }

    /// Export as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "config={}\n\
             trials={}\n\
             ok={}\n\
             blerr={}\n\
             berr0={}\n\
             berr={}\n\
             incorrect_computed={:.5}\n\
             incorrect_theoretical={:.5}\n\
             bit_error_before={:.5}\n\
             bit_error_before_theoretical={:.5}\n\
             bit_error_after={:.5}\n\
             bit_error_after_theoretical={:.5}\n",
            self.model,
            self.counters.trials,
            self.counters.ok,
            self.counters.blerr,
            self.counters.berr0,
            self.counters.berr,
            self.incorrect_rate,
            self.incorrect_theory,
            self.bit_error_before,
            self.bit_error_before_theory,
            self.bit_error_after,
            self.bit_error_after_theory,
        )
    }
}

/// Console line for a configuration that could not be run.
pub fn error_line(model: &ChannelModel, error: &Error) -> String {
    format!("For {model}; error: {error}")
}
