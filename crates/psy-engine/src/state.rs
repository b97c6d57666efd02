//! Single-state resolution.
//!
//! [`StateResolver`] turns pressure plus two known quantities into the full set
//! of six reported quantities by asking the property evaluator for each one in
//! turn. Resolution is all-or-nothing: the first evaluator failure aborts it.

use std::sync::Arc;

use psy_core::numeric::{HUMIDITY_RATIO_DECIMALS, REPORT_DECIMALS, round_to};
use psy_core::units::{fraction_to_percent, j_to_kj, kelvin_to_celsius, kg_per_kg_to_g_per_kg};
use psy_props::{PropertyEvaluator, Quantity};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CalcResult, CalculationError};
use crate::input::PsychroInput;

/// Fully resolved state in reporting units, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedState {
    /// Dry-bulb temperature [°C]
    pub tdb: f64,
    /// Wet-bulb temperature [°C]
    pub twb: f64,
    /// Relative humidity [%]
    pub rh: f64,
    /// Humidity ratio [g/kg dry air]
    pub w: f64,
    /// Enthalpy [kJ/kg dry air]
    pub h: f64,
    /// Dew point [°C]
    pub tdp: f64,
}

impl ResolvedState {
    /// Build from evaluator outputs in SI units, in [`Quantity::STATE`] order.
    pub fn from_si(values: [f64; 6]) -> Self {
        let [t, b, r, w, h, d] = values;
        Self {
            tdb: kelvin_to_celsius(t),
            twb: kelvin_to_celsius(b),
            rh: fraction_to_percent(r),
            w: kg_per_kg_to_g_per_kg(w),
            h: j_to_kj(h),
            tdp: kelvin_to_celsius(d),
        }
    }

    /// Rounded record for reporting.
    pub fn report(&self) -> StateResult {
        StateResult {
            tdb: round_to(self.tdb, REPORT_DECIMALS),
            twb: round_to(self.twb, REPORT_DECIMALS),
            rh: round_to(self.rh, REPORT_DECIMALS),
            w: round_to(self.w, HUMIDITY_RATIO_DECIMALS),
            h: round_to(self.h, REPORT_DECIMALS),
            tdp: round_to(self.tdp, REPORT_DECIMALS),
        }
    }
}

/// Reported state: temperatures, RH and enthalpy to 2 decimals, humidity ratio
/// to 3.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateResult {
    pub tdb: f64,
    pub twb: f64,
    pub rh: f64,
    pub w: f64,
    pub h: f64,
    pub tdp: f64,
}

/// Anything that resolves an input into a state.
///
/// Implemented by [`StateResolver`] and by the caching wrapper in
/// [`crate::cache`].
pub trait StateSource: Send + Sync {
    fn resolve(&self, input: &PsychroInput) -> CalcResult<ResolvedState>;
}

impl<S: StateSource + ?Sized> StateSource for Arc<S> {
    fn resolve(&self, input: &PsychroInput) -> CalcResult<ResolvedState> {
        (**self).resolve(input)
    }
}

impl<S: StateSource + ?Sized> StateSource for &S {
    fn resolve(&self, input: &PsychroInput) -> CalcResult<ResolvedState> {
        (**self).resolve(input)
    }
}

/// Resolves states one target quantity at a time through a property model.
#[derive(Clone)]
pub struct StateResolver {
    model: Arc<dyn PropertyEvaluator>,
}

impl StateResolver {
    pub fn new(model: Arc<dyn PropertyEvaluator>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &Arc<dyn PropertyEvaluator> {
        &self.model
    }

    /// Resolve and round in one step.
    pub fn resolve_reported(&self, input: &PsychroInput) -> CalcResult<StateResult> {
        self.resolve(input).map(|state| state.report())
    }
}

impl std::fmt::Debug for StateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateResolver")
            .field("model", &self.model.name())
            .finish()
    }
}

impl StateSource for StateResolver {
    fn resolve(&self, input: &PsychroInput) -> CalcResult<ResolvedState> {
        let known = input.known_quantities()?;

        let mut values = [0.0; 6];
        for (slot, target) in values.iter_mut().zip(Quantity::STATE) {
            *slot = self
                .model
                .evaluate(target, &known)
                .map_err(|e| CalculationError::property(target, e))?;
        }

        let state = ResolvedState::from_si(values);
        debug!(
            model = self.model.name(),
            tdb = state.tdb,
            w = state.w,
            "resolved state"
        );
        Ok(state)
    }
}
