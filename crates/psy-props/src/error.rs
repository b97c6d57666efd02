//! Property evaluation errors.

use crate::quantity::Quantity;
use thiserror::Error;

/// Result type for property evaluation.
pub type PropertyResult<T> = Result<T, PropertyError>;

/// Errors raised by a property evaluator.
///
/// Every variant means the requested state is invalid or unsupported for the
/// given inputs. None of them are transient.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    /// A known value was NaN or infinite.
    #[error("Non-finite value for {quantity}")]
    NonFinite { quantity: Quantity },

    /// The known quantities are not pressure plus two distinct state quantities.
    #[error("Invalid known quantities: {what}")]
    InvalidKnowns { what: &'static str },

    /// Value outside the evaluator's valid domain.
    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    /// The inputs describe more water vapour than the air can hold.
    #[error("Supersaturated state: {what}")]
    Supersaturated { what: &'static str },

    /// The two knowns fix the same thing and do not determine a state.
    #[error("{first} and {second} are not independent")]
    NotIndependent { first: Quantity, second: Quantity },

    /// No state satisfies the inputs inside the correlation range.
    #[error("No solution for {what}")]
    NoSolution { what: &'static str },

    /// Requested backend name is unknown or not compiled in.
    #[error("Unknown property backend: {name}")]
    UnknownBackend { name: String },

    /// Backend (CoolProp) error.
    #[error("Backend error: {message}")]
    Backend { message: String },
}
