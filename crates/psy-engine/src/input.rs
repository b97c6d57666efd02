//! Request inputs: the quantity map for one state and the partial mix inputs.

use std::collections::BTreeMap;

use psy_core::units::{celsius_to_kelvin, g_per_kg_to_kg_per_kg};
use psy_props::{KnownQuantities, Quantity};
use serde::{Deserialize, Serialize};

use crate::error::{CalcResult, CalculationError};

/// Known quantities for one humid-air state, keyed by code, SI units.
///
/// Serialized as a flat object, e.g. `{"P": 101325, "T": 298.15, "R": 0.6}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PsychroInput(BTreeMap<Quantity, f64>);

impl PsychroInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pressure plus two state quantities.
    pub fn with_pair(pressure: f64, first: (Quantity, f64), second: (Quantity, f64)) -> Self {
        let mut input = Self::new();
        input.insert(first.0, first.1);
        input.insert(second.0, second.1);
        input.insert(Quantity::P, pressure);
        input
    }

    pub fn insert(&mut self, quantity: Quantity, value: f64) -> Option<f64> {
        self.0.insert(quantity, value)
    }

    pub fn get(&self, quantity: Quantity) -> Option<f64> {
        self.0.get(&quantity).copied()
    }

    pub fn pressure(&self) -> Option<f64> {
        self.get(Quantity::P)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quantity, f64)> + '_ {
        self.0.iter().map(|(q, v)| (*q, *v))
    }

    /// Copy of this input with `pressure` replacing any pressure it carries.
    pub fn with_pressure(&self, pressure: f64) -> Self {
        let mut input = self.clone();
        input.insert(Quantity::P, pressure);
        input
    }

    /// Number of state quantities, pressure excluded.
    pub fn state_count(&self) -> usize {
        self.0.keys().filter(|q| !q.is_pressure()).count()
    }

    /// Check the shape of the input and hand back the evaluator's knowns.
    ///
    /// The count rule is checked first, then pressure presence, then that every
    /// value is finite. Nothing here touches an evaluator.
    pub fn known_quantities(&self) -> CalcResult<KnownQuantities> {
        let found = self.state_count();
        if found != 2 {
            return Err(CalculationError::InvalidInputCount { found });
        }
        let pressure = self.pressure().ok_or(CalculationError::MissingPressure)?;

        if let Some((quantity, _)) = self.iter().find(|(_, v)| !v.is_finite()) {
            return Err(CalculationError::InvalidValue { quantity });
        }

        let mut state = self.iter().filter(|(q, _)| !q.is_pressure());
        match (state.next(), state.next()) {
            (Some(first), Some(second)) => Ok([(Quantity::P, pressure), first, second]),
            _ => Err(CalculationError::InvalidInputCount { found }),
        }
    }
}

impl FromIterator<(Quantity, f64)> for PsychroInput {
    fn from_iter<I: IntoIterator<Item = (Quantity, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One side of a mix.
///
/// Either `tdb` (°C) and `w` (g/kg), or `T` (K) and `W` (kg/kg). When both
/// forms are present for the same quantity the SI field wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MixPointInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tdb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(rename = "T", default, skip_serializing_if = "Option::is_none")]
    pub t_k: Option<f64>,
    #[serde(rename = "W", default, skip_serializing_if = "Option::is_none")]
    pub w_kg_per_kg: Option<f64>,
}

impl MixPointInput {
    /// Convenience form: dry-bulb in °C and humidity ratio in g/kg.
    pub fn from_celsius(tdb: f64, w_g_per_kg: f64) -> Self {
        Self {
            tdb: Some(tdb),
            w: Some(w_g_per_kg),
            ..Self::default()
        }
    }

    /// SI form: dry-bulb in K and humidity ratio in kg/kg.
    pub fn from_si(t_k: f64, w_kg_per_kg: f64) -> Self {
        Self {
            t_k: Some(t_k),
            w_kg_per_kg: Some(w_kg_per_kg),
            ..Self::default()
        }
    }

    /// Dry-bulb in K after applying the precedence rule.
    pub fn dry_bulb_k(&self) -> Option<f64> {
        self.t_k.or_else(|| self.tdb.map(celsius_to_kelvin))
    }

    /// Humidity ratio in kg/kg after applying the precedence rule.
    pub fn humidity_ratio(&self) -> Option<f64> {
        self.w_kg_per_kg
            .or_else(|| self.w.map(g_per_kg_to_kg_per_kg))
    }

    /// Build the full resolver input at `pressure`.
    pub fn to_input(&self, pressure: f64) -> CalcResult<PsychroInput> {
        match (self.dry_bulb_k(), self.humidity_ratio()) {
            (Some(t), Some(w)) => Ok(PsychroInput::with_pair(
                pressure,
                (Quantity::T, t),
                (Quantity::W, w),
            )),
            (t, w) => Err(CalculationError::InvalidInputCount {
                found: usize::from(t.is_some()) + usize::from(w.is_some()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(pairs: &[(Quantity, f64)]) -> PsychroInput {
        pairs.iter().copied().collect()
    }

    #[test]
    fn accepts_pressure_plus_two() {
        let known = input(&[(Quantity::P, 101325.0), (Quantity::T, 298.15), (Quantity::R, 0.6)])
            .known_quantities()
            .unwrap();
        assert_eq!(known[0], (Quantity::P, 101325.0));
        assert_eq!(known[1], (Quantity::T, 298.15));
        assert_eq!(known[2], (Quantity::R, 0.6));
    }

    #[test]
    fn wrong_count_is_rejected() {
        let one = input(&[(Quantity::P, 101325.0), (Quantity::T, 298.15)]);
        assert_eq!(
            one.known_quantities(),
            Err(CalculationError::InvalidInputCount { found: 1 })
        );

        let three = input(&[
            (Quantity::P, 101325.0),
            (Quantity::T, 298.15),
            (Quantity::R, 0.6),
            (Quantity::W, 0.01),
        ]);
        assert_eq!(
            three.known_quantities(),
            Err(CalculationError::InvalidInputCount { found: 3 })
        );
    }

    #[test]
    fn missing_pressure() {
        let no_p = input(&[(Quantity::T, 298.15), (Quantity::R, 0.6)]);
        assert_eq!(no_p.known_quantities(), Err(CalculationError::MissingPressure));
    }

    #[test]
    fn non_finite_value() {
        let nan = input(&[(Quantity::P, 101325.0), (Quantity::T, f64::NAN), (Quantity::R, 0.6)]);
        assert_eq!(
            nan.known_quantities(),
            Err(CalculationError::InvalidValue { quantity: Quantity::T })
        );
    }

    #[test]
    fn with_pressure_overrides() {
        let base = input(&[(Quantity::P, 90000.0), (Quantity::T, 298.15), (Quantity::R, 0.6)]);
        let injected = base.with_pressure(101325.0);
        assert_eq!(injected.pressure(), Some(101325.0));
        assert_eq!(base.pressure(), Some(90000.0));
    }

    #[test]
    fn json_object_form() {
        let parsed: PsychroInput =
            serde_json::from_str(r#"{"P": 101325, "T": 298.15, "R": 0.6}"#).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.get(Quantity::R), Some(0.6));

        assert!(serde_json::from_str::<PsychroInput>(r#"{"P": 1, "Q": 2}"#).is_err());
    }

    #[test]
    fn mix_input_prefers_si_fields() {
        let both = MixPointInput {
            tdb: Some(20.0),
            w: Some(5.0),
            t_k: Some(300.0),
            w_kg_per_kg: Some(0.01),
        };
        assert_eq!(both.dry_bulb_k(), Some(300.0));
        assert_eq!(both.humidity_ratio(), Some(0.01));

        let convenience = MixPointInput::from_celsius(20.0, 5.0);
        assert!((convenience.dry_bulb_k().unwrap() - 293.15).abs() < 1e-9);
        assert!((convenience.humidity_ratio().unwrap() - 0.005).abs() < 1e-12);

        let mixed = MixPointInput {
            tdb: Some(20.0),
            w_kg_per_kg: Some(0.007),
            ..MixPointInput::default()
        };
        let built = mixed.to_input(101325.0).unwrap();
        assert_eq!(built.get(Quantity::W), Some(0.007));
    }

    #[test]
    fn mix_input_incomplete() {
        let only_t = MixPointInput {
            tdb: Some(20.0),
            ..MixPointInput::default()
        };
        assert_eq!(
            only_t.to_input(101325.0),
            Err(CalculationError::InvalidInputCount { found: 1 })
        );
        assert_eq!(
            MixPointInput::default().to_input(101325.0),
            Err(CalculationError::InvalidInputCount { found: 0 })
        );
    }

    #[test]
    fn mix_input_json_field_names() {
        let parsed: MixPointInput = serde_json::from_str(r#"{"T": 300.0, "W": 0.01}"#).unwrap();
        assert_eq!(parsed, MixPointInput::from_si(300.0, 0.01));
        let parsed: MixPointInput = serde_json::from_str(r#"{"tdb": 20, "w": 5}"#).unwrap();
        assert_eq!(parsed, MixPointInput::from_celsius(20.0, 5.0));
    }
}
