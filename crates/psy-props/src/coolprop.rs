//! CoolProp-based humid-air model.

use crate::error::{PropertyError, PropertyResult};
use crate::evaluator::validation;
use crate::evaluator::{KnownQuantities, PropertyEvaluator};
use crate::quantity::Quantity;
use rfluids::native::CoolProp;

/// CoolProp backend for humid-air properties (`HAPropsSI` through `rfluids`).
///
/// Thread-safe: every call is an independent HAPropsSI evaluation.
pub struct CoolPropModel {}

impl CoolPropModel {
    /// Create a new CoolProp model.
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for CoolPropModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyEvaluator for CoolPropModel {
    fn name(&self) -> &str {
        "coolprop"
    }

    fn evaluate(&self, target: Quantity, known: &KnownQuantities) -> PropertyResult<f64> {
        // CoolProp is the arbiter of solvability; only the shape of the knowns is checked here.
        validation::split_knowns(known)?;

        let [(q1, v1), (q2, v2), (q3, v3)] = *known;
        let value = CoolProp::ha_props_si(
            target.code(),
            q1.code(),
            v1,
            q2.code(),
            v2,
            q3.code(),
            v3,
        )
        .map_err(|e| PropertyError::Backend {
            message: format!(
                "HAPropsSI({}) failed at {}={}, {}={}, {}={}: {}",
                target, q1, v1, q2, v2, q3, v3, e
            ),
        })?;

        if !value.is_finite() {
            return Err(PropertyError::Backend {
                message: format!("HAPropsSI({}) returned a non-finite value", target),
            });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humidity_ratio_roundtrip() {
        let model = CoolPropModel::new();
        let w = model
            .evaluate(
                Quantity::W,
                &[(Quantity::T, 300.0), (Quantity::P, 101_325.0), (Quantity::R, 0.5)],
            )
            .expect("W from T, P, R should compute");
        let rh = model
            .evaluate(
                Quantity::R,
                &[(Quantity::T, 300.0), (Quantity::P, 101_325.0), (Quantity::W, w)],
            )
            .expect("R from T, P, W should compute");
        assert!((rh - 0.5).abs() < 1e-6, "rh = {}", rh);
    }

    #[test]
    fn relative_humidity_above_one_fails() {
        let model = CoolPropModel::new();
        let err = model
            .evaluate(
                Quantity::W,
                &[(Quantity::P, 101_325.0), (Quantity::T, 300.0), (Quantity::R, 1.5)],
            )
            .expect_err("RH > 1 should fail");
        assert!(matches!(err, PropertyError::Backend { .. }));
    }
}
