//! Error types for the chaotic channel simulator.
//!
//! Parameters are validated once, when a channel configuration is built.
//! Once a configuration is running, the only failures left are a map state
//! escaping the unit interval or an orbit collapsing onto a fixed point.

use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Map: parameter validation or an orbit leaving [0, 1]
/// - Config: sweep configuration loading and validation
/// - I/O: reading configuration files
#[derive(Debug, Error)]
pub enum Error {
    /// Map construction or iteration failed
    #[error("map error: {0}")]
    Map(#[from] MapError),

    /// Sweep configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Chaotic map errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MapError {
    /// A map or threshold parameter lies outside its valid domain
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A map state was observed outside [0, 1]
    #[error("{map} map state {state} left the unit interval")]
    DomainViolation { map: &'static str, state: f64 },

    /// The floating-point orbit landed on a fixed point and stopped moving
    #[error("{map} orbit collapsed onto fixed point {state} after {steps} steps")]
    DegenerateOrbit {
        map: &'static str,
        state: f64,
        steps: u64,
    },
}

impl MapError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        MapError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// Sweep configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed
    #[error("failed to parse sweep file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML
    #[error("failed to render sweep file: {0}")]
    Render(#[from] toml::ser::Error),

    /// Trial count of zero
    #[error("trial count must be positive")]
    NoTrials,

    /// A seed outside [0, 1]
    #[error("{stream} seed {value} must lie in [0, 1]")]
    InvalidSeed { stream: &'static str, value: f64 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
