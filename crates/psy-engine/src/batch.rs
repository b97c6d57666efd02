//! Batch resolution of named points.
//!
//! Every point is resolved on its own at the request pressure. A failing point
//! is reported in place and never aborts the rest of the batch.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CalcResult;
use crate::input::PsychroInput;
use crate::state::{StateResult, StateSource};

/// Default marker for points without one.
pub const DEFAULT_MARKER: &str = "circle";

/// Default marker size for points without one.
pub const DEFAULT_SIZE: u32 = 8;

/// One named point of a batch or chart request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRequest {
    pub name: String,
    /// Two state quantities; any pressure here is replaced by the request's.
    pub inputs: PsychroInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl PointRequest {
    pub fn new(name: impl Into<String>, inputs: PsychroInput) -> Self {
        Self {
            name: name.into(),
            inputs,
            color: None,
            marker: None,
            size: None,
        }
    }
}

/// Display styling of a point, with defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointStyle {
    pub color: String,
    pub marker: String,
    pub size: u32,
}

impl PointStyle {
    /// Palette colour for the point at `index` in its request.
    pub fn palette_color(index: usize) -> String {
        format!("C{index}")
    }

    /// Requested styling, falling back to the per-index defaults.
    pub fn for_request(index: usize, request: &PointRequest) -> Self {
        Self {
            color: request
                .color
                .clone()
                .unwrap_or_else(|| Self::palette_color(index)),
            marker: request
                .marker
                .clone()
                .unwrap_or_else(|| DEFAULT_MARKER.to_string()),
            size: request.size.unwrap_or(DEFAULT_SIZE),
        }
    }
}

/// Result for one point, successful or not, always carrying its name.
#[derive(Debug, Clone, PartialEq)]
pub struct PointOutcome {
    pub name: String,
    pub style: PointStyle,
    pub result: CalcResult<StateResult>,
}

impl PointOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// How batch points are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    #[default]
    Parallel,
    Sequential,
}

/// Resolve every point at `pressure`, in request order.
pub fn resolve_all<S>(
    source: &S,
    points: &[PointRequest],
    pressure: f64,
    mode: BatchMode,
) -> Vec<PointOutcome>
where
    S: StateSource + ?Sized,
{
    let outcomes: Vec<PointOutcome> = match mode {
        BatchMode::Parallel => points
            .par_iter()
            .enumerate()
            .map(|(index, point)| resolve_point(source, index, point, pressure))
            .collect(),
        BatchMode::Sequential => points
            .iter()
            .enumerate()
            .map(|(index, point)| resolve_point(source, index, point, pressure))
            .collect(),
    };

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    debug!(points = outcomes.len(), failed, "batch resolved");
    outcomes
}

fn resolve_point<S>(source: &S, index: usize, point: &PointRequest, pressure: f64) -> PointOutcome
where
    S: StateSource + ?Sized,
{
    let input = point.inputs.with_pressure(pressure);
    let result = source.resolve(&input).map(|state| state.report());
    if let Err(err) = &result {
        warn!(point = %point.name, error = %err, "point failed to resolve");
    }
    PointOutcome {
        name: point.name.clone(),
        style: PointStyle::for_request(index, point),
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalculationError;
    use crate::state::StateResolver;
    use psy_props::{AshraeModel, Quantity};
    use std::sync::Arc;

    fn resolver() -> StateResolver {
        StateResolver::new(Arc::new(AshraeModel::new()))
    }

    fn point(name: &str, pairs: &[(Quantity, f64)]) -> PointRequest {
        PointRequest::new(name, pairs.iter().copied().collect())
    }

    #[test]
    fn failure_isolated_in_place() {
        let points = vec![
            point("A", &[(Quantity::T, 298.15), (Quantity::R, 0.6)]),
            point("B", &[(Quantity::T, 298.15)]),
            point("C", &[(Quantity::T, 303.15), (Quantity::R, 0.4)]),
        ];
        let outcomes = resolve_all(&resolver(), &points, 101325.0, BatchMode::Sequential);

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[1].name, "B");
        assert_eq!(
            outcomes[1].result,
            Err(CalculationError::InvalidInputCount { found: 1 })
        );
        assert!(outcomes[0].is_ok());
        assert!(outcomes[2].is_ok());
    }

    #[test]
    fn request_pressure_overrides_point_pressure() {
        let points = vec![point(
            "A",
            &[(Quantity::P, 50_000.0), (Quantity::T, 298.15), (Quantity::R, 0.6)],
        )];
        let at_sea_level = resolve_all(&resolver(), &points, 101325.0, BatchMode::Sequential);
        let direct = resolver()
            .resolve_reported(&PsychroInput::with_pair(
                101325.0,
                (Quantity::T, 298.15),
                (Quantity::R, 0.6),
            ))
            .unwrap();
        assert_eq!(at_sea_level[0].result, Ok(direct));
    }

    #[test]
    fn parallel_matches_sequential() {
        let points: Vec<PointRequest> = (0..20)
            .map(|i| {
                point(
                    &format!("P{i}"),
                    &[(Quantity::T, 283.15 + i as f64), (Quantity::R, 0.5)],
                )
            })
            .collect();
        let parallel = resolve_all(&resolver(), &points, 101325.0, BatchMode::Parallel);
        let sequential = resolve_all(&resolver(), &points, 101325.0, BatchMode::Sequential);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn default_styles_follow_position() {
        let mut styled = point("B", &[(Quantity::T, 298.15), (Quantity::R, 0.5)]);
        styled.color = Some("blue".into());
        styled.size = Some(12);
        let points = vec![
            point("A", &[(Quantity::T, 298.15), (Quantity::R, 0.5)]),
            styled,
            point("C", &[(Quantity::T, 298.15), (Quantity::R, 0.5)]),
        ];
        let outcomes = resolve_all(&resolver(), &points, 101325.0, BatchMode::Sequential);
        assert_eq!(outcomes[0].style.color, "C0");
        assert_eq!(outcomes[0].style.marker, "circle");
        assert_eq!(outcomes[0].style.size, 8);
        assert_eq!(outcomes[1].style.color, "blue");
        assert_eq!(outcomes[1].style.size, 12);
        assert_eq!(outcomes[2].style.color, "C2");
    }

    #[test]
    fn point_request_json() {
        let parsed: PointRequest = serde_json::from_str(
            r#"{"name": "Outdoor", "inputs": {"T": 303.15, "R": 0.5}, "marker": "square"}"#,
        )
        .unwrap();
        assert_eq!(parsed.name, "Outdoor");
        assert_eq!(parsed.inputs.state_count(), 2);
        assert_eq!(parsed.marker.as_deref(), Some("square"));
        assert_eq!(parsed.color, None);
    }
}
