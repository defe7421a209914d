//! Sweep configuration.
//!
//! A sweep lists the channel configurations to simulate. The standard
//! experiment, [`SweepConfig::default`], runs ten memoryless error rates and
//! the same rates crossed with two Markov `p2` values, one million trials
//! each. In a file, every field inside a section has a default.
//!
//! ```toml
//! trials = 1000000
//! parallel = false
//!
//! [seeds]
//! source = 0.1782612
//! error = 0.5673244
//!
//! [memoryless]
//! p = [0.05, 0.1, 0.15]
//!
//! [markov]
//! p = [0.05, 0.1]
//! p2 = [0.16, 0.34]
//!
//! [reference]
//! p = [0.1]
//! seed = 7
//! ```
//!
//! Sections that are omitted from a file are not run. Sweep-level fields are
//! checked by [`SweepConfig::validate`]; channel parameters are checked per
//! configuration when the channel is built, so one bad value does not stop
//! the rest of the sweep.

use crate::error::{ConfigError, Result};
use crate::trial::{ChannelModel, Seeds, DEFAULT_TRIALS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Error probabilities swept by default.
pub const DEFAULT_ERROR_RATES: [f64; 10] =
    [0.05, 0.1, 0.15, 0.2, 0.25, 0.3, 0.35, 0.4, 0.45, 0.49999];

/// Markov `P(1 -> 0)` values swept by default.
pub const DEFAULT_P2: [f64; 2] = [0.16, 0.34];

/// Complete description of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Trials per configuration
    #[serde(default = "default_trials")]
    pub trials: u64,

    /// Run configurations on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,

    /// Initial map states shared by every configuration
    #[serde(default)]
    pub seeds: Seeds,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memoryless: Option<MemorylessSweep>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markov: Option<MarkovSweep>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceSweep>,
}

/// Memoryless channels, one per error probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorylessSweep {
    #[serde(default = "default_error_rates")]
    pub p: Vec<f64>,
}

/// Markov channels for every `(p, p2)` pair, with `p1 = p / (1 - p) * p2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkovSweep {
    #[serde(default = "default_error_rates")]
    pub p: Vec<f64>,
    #[serde(default = "default_p2")]
    pub p2: Vec<f64>,
}

/// ChaCha8-driven reference channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSweep {
    #[serde(default = "default_error_rates")]
    pub p: Vec<f64>,
    #[serde(default)]
    pub seed: u64,
}

fn default_trials() -> u64 {
    DEFAULT_TRIALS
}

fn default_error_rates() -> Vec<f64> {
    DEFAULT_ERROR_RATES.to_vec()
}

fn default_p2() -> Vec<f64> {
    DEFAULT_P2.to_vec()
}

impl Default for MemorylessSweep {
    fn default() -> Self {
        Self {
            p: default_error_rates(),
        }
    }
}

impl Default for MarkovSweep {
    fn default() -> Self {
        Self {
            p: default_error_rates(),
            p2: default_p2(),
        }
    }
}

impl Default for ReferenceSweep {
    fn default() -> Self {
        Self {
            p: default_error_rates(),
            seed: 0,
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            parallel: false,
            seeds: Seeds::default(),
            memoryless: Some(MemorylessSweep::default()),
            markov: Some(MarkovSweep::default()),
            reference: None,
        }
    }
}

impl SweepConfig {
    /// Parse a sweep from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SweepConfig = toml::from_str(text).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a sweep file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self).map_err(ConfigError::from)?)
    }

    /// Check the sweep-level fields.
    ///
    /// # Errors
    /// - `ConfigError::NoTrials` if `trials` is zero
    /// - `ConfigError::InvalidSeed` if a seed is outside [0, 1]
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(ConfigError::NoTrials.into());
        }
        for (stream, value) in [("source", self.seeds.source), ("error", self.seeds.error)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidSeed { stream, value }.into());
            }
        }
        Ok(())
    }

    /// Expand the sweep into channel configurations, in report order:
    /// memoryless, then Markov (`p` outer, `p2` inner), then reference.
    pub fn models(&self) -> Vec<ChannelModel> {
        let mut models = Vec::new();
        if let Some(sweep) = &self.memoryless {
            models.extend(sweep.p.iter().map(|&p| ChannelModel::Memoryless { p }));
        }
        if let Some(sweep) = &self.markov {
            for &p in &sweep.p {
                for &p2 in &sweep.p2 {
                    models.push(ChannelModel::markov_with_error_rate(p, p2));
                }
            }
        }
        if let Some(sweep) = &self.reference {
            models.extend(sweep.p.iter().map(|&p| ChannelModel::Reference { p, seed: sweep.seed }));
        }
        models
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_default_sweep() {
        let config = SweepConfig::default();
        let models = config.models();

        assert_eq!(models.len(), 10 + 20);
        assert_eq!(models[0], ChannelModel::Memoryless { p: 0.05 });
        assert_eq!(models[10], ChannelModel::markov_with_error_rate(0.05, 0.16));
        assert_eq!(models[11], ChannelModel::markov_with_error_rate(0.05, 0.34));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = SweepConfig::from_toml_str("").unwrap();
        assert_eq!(config.trials, DEFAULT_TRIALS);
        assert_eq!(config.seeds, Seeds::default());
        // sections absent from a file are not run
        assert!(config.models().is_empty());
    }

    #[test]
    fn test_partial_sections() {
        let text = r#"
            trials = 5000
            parallel = true

            [seeds]
            error = 0.25

            [markov]
            p = [0.1]

            [reference]
            p = [0.2, 0.3]
            seed = 9
        "#;
        let config = SweepConfig::from_toml_str(text).unwrap();

        assert_eq!(config.trials, 5000);
        assert!(config.parallel);
        assert_eq!(config.seeds.error, 0.25);
        assert_eq!(config.seeds.source, crate::trial::SOURCE_SEED);

        let models = config.models();
        assert_eq!(models.len(), 2 + 2);
        assert_eq!(models[2], ChannelModel::Reference { p: 0.2, seed: 9 });
    }

    #[test]
    fn test_validation_errors() {
        let err = SweepConfig::from_toml_str("trials = 0").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NoTrials)));

        let err = SweepConfig::from_toml_str("[seeds]\nsource = 1.5").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidSeed { stream: "source", .. })
        ));

        let err = SweepConfig::from_toml_str("trials = \"many\"").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = SweepConfig::default();
        config.reference = Some(ReferenceSweep::default());
        let text = config.to_toml_string().unwrap();
        assert_eq!(SweepConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = SweepConfig::from_file(Path::new("/nonexistent/sweep.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
