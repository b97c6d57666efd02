//! Request and response bodies.

use psy_engine::{
    CacheStats, ChartDataset, LineRequest, MixPointInput, MixResult, PointOutcome, PointRequest,
    ReferenceCurves, StateResult,
};
use psy_props::Quantity;
use serde::{Deserialize, Serialize};

fn standard_atmosphere() -> f64 {
    psy_core::units::constants::STANDARD_ATMOSPHERE_PA
}

#[derive(Debug, Clone, Deserialize)]
pub struct MultiPointBody {
    pub pressure: f64,
    pub points: Vec<PointRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartBody {
    pub pressure: f64,
    #[serde(default)]
    pub points: Vec<PointRequest>,
    #[serde(default)]
    pub process_lines: Vec<LineRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MixingBody {
    pub pressure: f64,
    pub point1: MixPointInput,
    pub point2: MixPointInput,
    pub ratio: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceBody {
    #[serde(default = "standard_atmosphere")]
    pub pressure: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateResponse {
    pub success: bool,
    #[serde(flatten)]
    pub state: StateResult,
}

impl From<StateResult> for StateResponse {
    fn from(state: StateResult) -> Self {
        Self {
            success: true,
            state,
        }
    }
}

/// One batch entry: the full result with styling, or the name and error.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PointEntry {
    Resolved {
        name: String,
        success: bool,
        color: String,
        marker: String,
        size: u32,
        #[serde(flatten)]
        state: StateResult,
    },
    Failed {
        name: String,
        success: bool,
        error: String,
    },
}

impl From<PointOutcome> for PointEntry {
    fn from(outcome: PointOutcome) -> Self {
        match outcome.result {
            Ok(state) => Self::Resolved {
                name: outcome.name,
                success: true,
                color: outcome.style.color,
                marker: outcome.style.marker,
                size: outcome.style.size,
                state,
            },
            Err(err) => Self::Failed {
                name: outcome.name,
                success: false,
                error: err.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MultiPointResponse {
    pub success: bool,
    pub pressure: f64,
    pub points: Vec<PointEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartResponse {
    pub success: bool,
    #[serde(flatten)]
    pub dataset: ChartDataset,
}

/// Mixture fields at the top level, inputs alongside.
#[derive(Debug, Clone, Serialize)]
pub struct MixingResponse {
    pub success: bool,
    #[serde(flatten)]
    pub mixture: StateResult,
    pub mixing_ratio: f64,
    pub point1: StateResult,
    pub point2: StateResult,
    pub mixed_tdb: f64,
    pub mixed_w: f64,
}

impl From<MixResult> for MixingResponse {
    fn from(result: MixResult) -> Self {
        Self {
            success: true,
            mixture: result.mixture,
            mixing_ratio: result.ratio,
            point1: result.point1,
            point2: result.point2,
            mixed_tdb: result.mixed_tdb,
            mixed_w: result.mixed_w,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReferenceResponse {
    pub success: bool,
    #[serde(flatten)]
    pub curves: ReferenceCurves,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub quantities: Vec<QuantityInfo>,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuantityInfo {
    pub code: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    pub calculate: &'static str,
    pub calculate_multiple: &'static str,
    pub generate_chart: &'static str,
    pub reference_curves: &'static str,
    pub mixing: &'static str,
}

impl IndexResponse {
    pub fn new() -> Self {
        Self {
            message: "Psychrometric calculation service",
            version: env!("CARGO_PKG_VERSION"),
            quantities: std::iter::once(Quantity::P)
                .chain(Quantity::STATE)
                .map(|q| QuantityInfo {
                    code: q.code(),
                    label: q.label(),
                })
                .collect(),
            endpoints: Endpoints {
                health: "/health",
                calculate: "/calculate",
                calculate_multiple: "/calculate-multiple",
                generate_chart: "/generate-chart",
                reference_curves: "/reference-curves",
                mixing: "/mixing",
            },
        }
    }
}

impl Default for IndexResponse {
    fn default() -> Self {
        Self::new()
    }
}
