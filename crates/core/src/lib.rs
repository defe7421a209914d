//! chaos-channel-core: Hamming(7,4) over a channel driven by chaotic maps
//!
//! This library provides the components of a Monte Carlo experiment that:
//! - Generates information bits from a skew Bernoulli map orbit
//! - Generates channel errors from a skew Bernoulli (memoryless) or a
//!   three-piece Markov map (correlated) orbit
//! - Encodes, corrupts and syndrome-decodes Hamming(7,4) codewords
//! - Compares the measured error rates with closed-form predictions
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `map`: Chaotic maps, plm3 parameter derivation, bit thresholding
//! - `generator`: Bit streams over map orbits (and a PRNG reference)
//! - `hamming`: Hamming(7,4) codec and syndrome table
//! - `trial`: Per-configuration trial loop and sweeps
//! - `theory`: Theoretical block and bit error probabilities
//! - `report`: Computed versus theoretical rates
//! - `transition`: First-order statistics of a bit stream
//! - `config`: Sweep configuration (TOML)
//!
//! # Design Principles
//!
//! - **No panics**: Invalid parameters are structured errors
//! - **Validate once**: Parameters are checked when a channel is built, not per trial
//! - **Deterministic**: Fixed seeds make runs bit-for-bit reproducible

pub mod config;
pub mod error;
pub mod generator;
pub mod hamming;
pub mod map;
pub mod report;
pub mod theory;
pub mod transition;
pub mod trial;

// Re-export commonly used types
pub use config::SweepConfig;
pub use error::{Error, Result};
pub use report::Report;
pub use trial::{run_configuration, run_sweep, ChannelModel, Seeds, TrialCounters};
