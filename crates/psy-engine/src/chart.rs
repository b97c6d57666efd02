//! Chart assembly: resolved points plus the process lines joining them.
//!
//! Lines reference points by name. Only points that resolved can anchor a
//! line; a line with an unknown endpoint is left out of the dataset and listed
//! in `skipped_lines` instead. When two points share a name the later one wins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::batch::{BatchMode, PointOutcome, PointRequest, resolve_all};
use crate::error::CalculationError;
use crate::state::{StateResult, StateSource};

/// Default process line colour.
pub const DEFAULT_LINE_COLOR: &str = "red";

/// Default process line style.
pub const DEFAULT_LINE_STYLE: &str = "solid";

/// Default process line width.
pub const DEFAULT_LINE_WIDTH: u32 = 2;

/// Requested process line between two named points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRequest {
    #[serde(rename = "from_point", alias = "from")]
    pub from: String,
    #[serde(rename = "to_point", alias = "to")]
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

impl LineRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: None,
            color: None,
            style: None,
            width: None,
        }
    }

    pub fn default_label(&self) -> String {
        format!("{}→{}", self.from, self.to)
    }
}

/// A successfully resolved point with its styling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedPoint {
    pub name: String,
    pub color: String,
    pub marker: String,
    pub size: u32,
    #[serde(flatten)]
    pub state: StateResult,
}

/// Chart coordinates of a point: dry-bulb [°C] and humidity ratio [g/kg].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartCoord {
    pub tdb: f64,
    pub w: f64,
}

impl From<&StateResult> for ChartCoord {
    fn from(state: &StateResult) -> Self {
        Self {
            tdb: state.tdb,
            w: state.w,
        }
    }
}

/// Accepted process line, self-contained for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLine {
    #[serde(rename = "from_point")]
    pub from: String,
    #[serde(rename = "to_point")]
    pub to: String,
    pub label: String,
    pub color: String,
    pub style: String,
    pub width: u32,
    pub from_coords: ChartCoord,
    pub to_coords: ChartCoord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedPoint {
    pub name: String,
    pub error: CalculationError,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedLine {
    #[serde(rename = "from_point")]
    pub from: String,
    #[serde(rename = "to_point")]
    pub to: String,
    pub error: CalculationError,
}

/// Points and lines of one chart request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub pressure: f64,
    pub points: Vec<NamedPoint>,
    #[serde(rename = "process_lines")]
    pub lines: Vec<ChartLine>,
    pub failed_points: Vec<FailedPoint>,
    pub skipped_lines: Vec<SkippedLine>,
}

/// Build the dataset from batch outcomes and line requests.
pub fn assemble(pressure: f64, outcomes: &[PointOutcome], lines: &[LineRequest]) -> ChartDataset {
    let mut points = Vec::with_capacity(outcomes.len());
    let mut failed_points = Vec::new();

    for outcome in outcomes {
        match &outcome.result {
            Ok(state) => points.push(NamedPoint {
                name: outcome.name.clone(),
                color: outcome.style.color.clone(),
                marker: outcome.style.marker.clone(),
                size: outcome.style.size,
                state: *state,
            }),
            Err(error) => failed_points.push(FailedPoint {
                name: outcome.name.clone(),
                error: error.clone(),
            }),
        }
    }

    // Points are complete before any line is looked up.
    let lookup: HashMap<&str, &NamedPoint> =
        points.iter().map(|p| (p.name.as_str(), p)).collect();

    let mut chart_lines = Vec::with_capacity(lines.len());
    let mut skipped_lines = Vec::new();

    for line in lines {
        let from = lookup.get(line.from.as_str());
        let to = lookup.get(line.to.as_str());
        match (from, to) {
            (Some(from), Some(to)) => chart_lines.push(ChartLine {
                from: line.from.clone(),
                to: line.to.clone(),
                label: line.label.clone().unwrap_or_else(|| line.default_label()),
                color: line
                    .color
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LINE_COLOR.to_string()),
                style: line
                    .style
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LINE_STYLE.to_string()),
                width: line.width.unwrap_or(DEFAULT_LINE_WIDTH),
                from_coords: ChartCoord::from(&from.state),
                to_coords: ChartCoord::from(&to.state),
            }),
            (from, _) => {
                let missing = if from.is_none() { &line.from } else { &line.to };
                debug!(from = %line.from, to = %line.to, missing = %missing, "skipping process line");
                skipped_lines.push(SkippedLine {
                    from: line.from.clone(),
                    to: line.to.clone(),
                    error: CalculationError::UnknownLineEndpoint {
                        from: line.from.clone(),
                        to: line.to.clone(),
                        missing: missing.clone(),
                    },
                });
            }
        }
    }

    ChartDataset {
        pressure,
        points,
        lines: chart_lines,
        failed_points,
        skipped_lines,
    }
}

/// Resolve the points at `pressure` and assemble them with `lines`.
pub fn assemble_chart_data<S>(
    source: &S,
    pressure: f64,
    points: &[PointRequest],
    lines: &[LineRequest],
    mode: BatchMode,
) -> ChartDataset
where
    S: StateSource + ?Sized,
{
    let outcomes = resolve_all(source, points, pressure, mode);
    assemble(pressure, &outcomes, lines)
}
