//! Property evaluator trait and validation helpers.

use crate::ashrae::AshraeModel;
use crate::error::{PropertyError, PropertyResult};
use crate::quantity::Quantity;
use std::sync::Arc;

/// Pressure plus two independent state quantities, in any order.
pub type KnownQuantities = [(Quantity, f64); 3];

/// Trait for humid-air property evaluators.
///
/// Implementations resolve one target quantity at a time from the same
/// three known values. They must be deterministic and free of side effects so
/// callers can evaluate repeatedly, from several threads, and cache results.
///
/// Units at this boundary are SI throughout: K, Pa, fraction, kg/kg, J/kg.
pub trait PropertyEvaluator: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Evaluate `target` from the known quantities.
    ///
    /// Fails with [`PropertyError`] when the state is inconsistent, outside the
    /// valid domain, or not determined by the knowns.
    fn evaluate(&self, target: Quantity, known: &KnownQuantities) -> PropertyResult<f64>;
}

/// Names accepted by [`model_by_name`] in this build.
pub fn available_backends() -> &'static [&'static str] {
    #[cfg(feature = "coolprop")]
    {
        &["ashrae", "coolprop"]
    }
    #[cfg(not(feature = "coolprop"))]
    {
        &["ashrae"]
    }
}

/// Construct an evaluator by backend name.
pub fn model_by_name(name: &str) -> PropertyResult<Arc<dyn PropertyEvaluator>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "ashrae" => Ok(Arc::new(AshraeModel::new())),
        #[cfg(feature = "coolprop")]
        "coolprop" => Ok(Arc::new(crate::coolprop::CoolPropModel::new())),
        _ => Err(PropertyError::UnknownBackend {
            name: name.to_string(),
        }),
    }
}

/// Validation helpers shared by the backends.
pub(crate) mod validation {
    use super::*;

    /// Knowns split into pressure and the two state quantities.
    #[derive(Debug, Clone, Copy)]
    pub struct SplitKnowns {
        pub pressure: f64,
        /// Sorted by `Quantity` ordering.
        pub first: (Quantity, f64),
        pub second: (Quantity, f64),
    }

    /// Ensure exactly one pressure, two distinct state quantities, finite values
    /// and a positive pressure.
    pub fn split_knowns(known: &KnownQuantities) -> PropertyResult<SplitKnowns> {
        for &(quantity, value) in known {
            if !value.is_finite() {
                return Err(PropertyError::NonFinite { quantity });
            }
        }

        let mut pressure = None;
        let mut state = Vec::with_capacity(2);
        for &(quantity, value) in known {
            if quantity.is_pressure() {
                if pressure.replace(value).is_some() {
                    return Err(PropertyError::InvalidKnowns {
                        what: "pressure given more than once",
                    });
                }
            } else {
                state.push((quantity, value));
            }
        }

        let pressure = pressure.ok_or(PropertyError::InvalidKnowns {
            what: "pressure is required",
        })?;
        validate_pressure(pressure)?;

        state.sort_by(|a, b| a.0.cmp(&b.0));
        let &[first, second] = state.as_slice() else {
            return Err(PropertyError::InvalidKnowns {
                what: "exactly two state quantities besides pressure are required",
            });
        };
        if first.0 == second.0 {
            return Err(PropertyError::InvalidKnowns {
                what: "state quantities must be distinct",
            });
        }

        Ok(SplitKnowns {
            pressure,
            first,
            second,
        })
    }

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: f64) -> PropertyResult<()> {
        if !p.is_finite() || p <= 0.0 {
            return Err(PropertyError::OutOfRange {
                what: "pressure",
                value: p,
            });
        }
        Ok(())
    }

    /// Ensure relative humidity is a fraction in [0, 1].
    pub fn validate_relative_humidity(r: f64) -> PropertyResult<()> {
        if !(0.0..=1.0).contains(&r) {
            return Err(PropertyError::OutOfRange {
                what: "relative humidity",
                value: r,
            });
        }
        Ok(())
    }

    /// Ensure humidity ratio is non-negative.
    pub fn validate_humidity_ratio(w: f64) -> PropertyResult<()> {
        if w < 0.0 {
            return Err(PropertyError::OutOfRange {
                what: "humidity ratio",
                value: w,
            });
        }
        Ok(())
    }
}
