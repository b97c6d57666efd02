//! Adiabatic mixing of two air streams.
//!
//! The mixture's dry-bulb (°C) and humidity ratio (g/kg) are mass-weighted
//! linear averages of the two inputs. This is the usual engineering
//! simplification, not an enthalpy balance: for widely separated inputs the
//! mixed temperature differs slightly from the exact result. The averaged pair
//! is then resolved again to obtain a consistent mixture state.

use psy_core::units::{celsius_to_kelvin, g_per_kg_to_kg_per_kg};
use psy_props::Quantity;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CalcResult, CalculationError, MixEndpoint};
use crate::input::{MixPointInput, PsychroInput};
use crate::state::{ResolvedState, StateResult, StateSource};

/// Result of a two-stream mix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixResult {
    /// Mass fraction of point1 in the mixture.
    pub ratio: f64,
    pub point1: StateResult,
    pub point2: StateResult,
    pub mixture: StateResult,
    /// Averaged dry-bulb [°C] before rounding.
    pub mixed_tdb: f64,
    /// Averaged humidity ratio [g/kg] before rounding.
    pub mixed_w: f64,
}

/// Linear blend `ratio * a + (1 - ratio) * b`.
pub fn blend(ratio: f64, a: f64, b: f64) -> f64 {
    ratio * a + (1.0 - ratio) * b
}

/// Mix `point1` and `point2` at `pressure`, `ratio` being point1's mass fraction.
pub fn mix<S>(
    source: &S,
    point1: &MixPointInput,
    point2: &MixPointInput,
    pressure: f64,
    ratio: f64,
) -> CalcResult<MixResult>
where
    S: StateSource + ?Sized,
{
    if !(0.0..=1.0).contains(&ratio) {
        return Err(CalculationError::InvalidRatio { ratio });
    }

    let state1 = resolve_endpoint(source, MixEndpoint::Point1, point1, pressure)?;
    let state2 = resolve_endpoint(source, MixEndpoint::Point2, point2, pressure)?;

    let mixed_tdb = blend(ratio, state1.tdb, state2.tdb);
    let mixed_w = blend(ratio, state1.w, state2.w);

    let input = PsychroInput::with_pair(
        pressure,
        (Quantity::T, celsius_to_kelvin(mixed_tdb)),
        (Quantity::W, g_per_kg_to_kg_per_kg(mixed_w)),
    );
    let mixture = source
        .resolve(&input)
        .map_err(|e| CalculationError::MixtureUnresolvable {
            source: Box::new(e),
        })?;

    debug!(ratio, mixed_tdb, mixed_w, "mixed streams");

    Ok(MixResult {
        ratio,
        point1: state1.report(),
        point2: state2.report(),
        mixture: mixture.report(),
        mixed_tdb,
        mixed_w,
    })
}

fn resolve_endpoint<S>(
    source: &S,
    point: MixEndpoint,
    input: &MixPointInput,
    pressure: f64,
) -> CalcResult<ResolvedState>
where
    S: StateSource + ?Sized,
{
    input
        .to_input(pressure)
        .and_then(|input| source.resolve(&input))
        .map_err(|e| CalculationError::EndpointUnresolvable {
            point,
            source: Box::new(e),
        })
}
