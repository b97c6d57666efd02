//! Error types for the psychrometric engine.

use std::fmt;
use std::path::PathBuf;

use psy_props::{PropertyError, Quantity};
use serde::{Serialize, Serializer};
use thiserror::Error;

pub type CalcResult<T> = Result<T, CalculationError>;

/// Which input of a mix failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MixEndpoint {
    Point1,
    Point2,
}

impl fmt::Display for MixEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Point1 => write!(f, "point1"),
            Self::Point2 => write!(f, "point2"),
        }
    }
}

/// Failure of one state resolution, one line, or one mix.
///
/// Errors are values: they sit inside batch outcomes and cache entries, so the
/// type is `Clone + PartialEq`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    #[error("Pressure (P) is required")]
    MissingPressure,

    #[error("Exactly two quantities besides pressure are required, found {found}")]
    InvalidInputCount { found: usize },

    #[error("Value for {quantity} is not a finite number")]
    InvalidValue { quantity: Quantity },

    #[error("Property evaluation failed for {target}: {message}")]
    PropertyFailure { target: Quantity, message: String },

    #[error("Process line {from}→{to} references unknown point '{missing}'")]
    UnknownLineEndpoint {
        from: String,
        to: String,
        missing: String,
    },

    #[error("Mixing ratio must be within [0, 1], got {ratio}")]
    InvalidRatio { ratio: f64 },

    #[error("Mixing input {point} could not be resolved: {source}")]
    EndpointUnresolvable {
        point: MixEndpoint,
        #[source]
        source: Box<CalculationError>,
    },

    #[error("Mixture state could not be resolved: {source}")]
    MixtureUnresolvable {
        #[source]
        source: Box<CalculationError>,
    },
}

impl CalculationError {
    pub(crate) fn property(target: Quantity, err: PropertyError) -> Self {
        Self::PropertyFailure {
            target,
            message: err.to_string(),
        }
    }

    /// True when the request itself is malformed, as opposed to a physical
    /// state the evaluator rejected.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::MissingPressure
            | Self::InvalidInputCount { .. }
            | Self::InvalidValue { .. }
            | Self::InvalidRatio { .. } => true,
            _ => false,
        }
    }
}

impl Serialize for CalculationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Errors raised while loading or validating [`crate::EngineConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config YAML: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Backend error: {0}")]
    Backend(#[from] PropertyError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
