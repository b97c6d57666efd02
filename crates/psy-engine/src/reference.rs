//! Chart background curves: saturation, constant relative humidity and
//! constant enthalpy, sampled over a dry-bulb grid.
//!
//! Grid points the evaluator rejects are skipped; a curve is only ever
//! shortened, never failed.

use psy_core::units::{celsius_to_kelvin, kg_per_kg_to_g_per_kg};
use psy_props::{PropertyEvaluator, Quantity};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CalcResult, CalculationError};

/// Most dry-bulb grid points a curve may have.
pub const MAX_GRID_POINTS: usize = 10_000;

/// Ranges and levels of the background curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Lowest dry-bulb of the grid [°C]
    pub t_min_c: f64,
    /// Highest dry-bulb of the grid [°C]
    pub t_max_c: f64,
    /// Grid spacing [°C]
    pub t_step_c: f64,
    /// Relative humidity levels [%]
    pub rh_levels: Vec<f64>,
    /// Enthalpy levels [kJ/kg]
    pub enthalpy_levels: Vec<f64>,
    /// Upper humidity ratio bound of the chart [g/kg]
    pub w_max: f64,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            t_min_c: -10.0,
            t_max_c: 50.0,
            t_step_c: 1.0,
            rh_levels: (1..=9).rev().map(|i| f64::from(i) * 10.0).collect(),
            enthalpy_levels: (2..=10).map(|i| f64::from(i) * 10.0).collect(),
            w_max: 30.0,
        }
    }
}

impl ReferenceConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.t_min_c.is_finite() || !self.t_max_c.is_finite() || self.t_min_c >= self.t_max_c {
            return Err(format!(
                "reference temperature range [{}, {}] is empty",
                self.t_min_c, self.t_max_c
            ));
        }
        if !(self.t_step_c.is_finite() && self.t_step_c > 0.0) {
            return Err(format!("reference step must be positive, got {}", self.t_step_c));
        }
        let points = (self.t_max_c - self.t_min_c) / self.t_step_c + 1.0;
        if points > MAX_GRID_POINTS as f64 {
            return Err(format!(
                "reference step {} gives {points:.0} grid points, limit is {MAX_GRID_POINTS}",
                self.t_step_c
            ));
        }
        if !(self.w_max.is_finite() && self.w_max > 0.0) {
            return Err(format!("reference w_max must be positive, got {}", self.w_max));
        }
        if let Some(rh) = self.rh_levels.iter().find(|rh| !(0.0..=100.0).contains(*rh)) {
            return Err(format!("relative humidity level {rh} outside [0, 100]"));
        }
        Ok(())
    }

    /// Dry-bulb grid [°C], both ends included, at most [`MAX_GRID_POINTS`].
    pub fn temperature_grid(&self) -> Vec<f64> {
        let steps = ((self.t_max_c - self.t_min_c) / self.t_step_c).round();
        if !steps.is_finite() || steps < 1.0 {
            return vec![self.t_min_c];
        }
        let n = (steps as usize + 1).min(MAX_GRID_POINTS);
        let mut grid: Vec<f64> = (0..n)
            .map(|i| self.t_min_c + i as f64 * self.t_step_c)
            .collect();
        grid[n - 1] = self.t_max_c;
        grid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    Saturation,
    RelativeHumidity,
    Enthalpy,
}

/// A point on a background curve, in chart units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub tdb: f64,
    pub w: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub kind: CurveKind,
    /// RH in % or enthalpy in kJ/kg; 100 for saturation.
    pub level: f64,
    pub label: String,
    pub points: Vec<CurvePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartAxes {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub x_label: String,
    pub y_label: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCurves {
    pub pressure: f64,
    pub axes: ChartAxes,
    pub saturation: Curve,
    pub relative_humidity: Vec<Curve>,
    pub enthalpy: Vec<Curve>,
}

/// Sample the background curves at `pressure` [Pa].
pub fn reference_curves(
    model: &dyn PropertyEvaluator,
    pressure: f64,
    config: &ReferenceConfig,
) -> CalcResult<ReferenceCurves> {
    if !(pressure.is_finite() && pressure > 0.0) {
        return Err(CalculationError::InvalidValue {
            quantity: Quantity::P,
        });
    }

    let grid = config.temperature_grid();

    let saturation = Curve {
        kind: CurveKind::Saturation,
        level: 100.0,
        label: "RH = 100%".to_string(),
        points: sample(model, pressure, &grid, (Quantity::R, 1.0), None),
    };

    let relative_humidity = config
        .rh_levels
        .iter()
        .map(|&rh| Curve {
            kind: CurveKind::RelativeHumidity,
            level: rh,
            label: format!("{rh}%"),
            points: sample(model, pressure, &grid, (Quantity::R, rh / 100.0), None),
        })
        .collect();

    let enthalpy = config
        .enthalpy_levels
        .iter()
        .map(|&h| Curve {
            kind: CurveKind::Enthalpy,
            level: h,
            label: format!("{h}kJ/kg"),
            points: sample(
                model,
                pressure,
                &grid,
                (Quantity::H, h * 1000.0),
                Some(config.w_max),
            ),
        })
        .filter(|curve| curve.points.len() >= 2)
        .collect();

    debug!(pressure, grid = grid.len(), "sampled reference curves");

    Ok(ReferenceCurves {
        pressure,
        axes: ChartAxes {
            x_min: config.t_min_c,
            x_max: config.t_max_c,
            y_min: 0.0,
            y_max: config.w_max,
            x_label: "Dry-bulb temperature (°C)".to_string(),
            y_label: "Humidity ratio (g/kg)".to_string(),
            title: format!("Psychrometric chart ({:.1} kPa)", pressure / 1000.0),
        },
        saturation,
        relative_humidity,
        enthalpy,
    })
}

/// Humidity ratio along the grid with one quantity held fixed.
///
/// With `w_max` set, only points with `0 <= w <= w_max` are kept.
fn sample(
    model: &dyn PropertyEvaluator,
    pressure: f64,
    grid: &[f64],
    fixed: (Quantity, f64),
    w_max: Option<f64>,
) -> Vec<CurvePoint> {
    grid.iter()
        .filter_map(|&tdb| {
            let known = [
                (Quantity::P, pressure),
                (Quantity::T, celsius_to_kelvin(tdb)),
                fixed,
            ];
            let w = model.evaluate(Quantity::W, &known).ok()?;
            let w = kg_per_kg_to_g_per_kg(w);
            match w_max {
                Some(max) if !(0.0..=max).contains(&w) => None,
                _ => Some(CurvePoint { tdb, w }),
            }
        })
        .collect()
}
