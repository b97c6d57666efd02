//! psy-engine: psychrometric state resolution for psychroflow.
//!
//! Provides:
//! - `StateResolver`: pressure plus two known quantities to a full humid-air state
//! - Batch resolution of named points with per-point failure isolation
//! - Chart assembly: resolved points plus process lines joined by name
//! - Two-stream mixing
//! - A memoizing `CachedResolver` and the chart background curves
//! - `PsychroService`, the operation surface used by the server and CLI
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use psy_engine::{PsychroInput, StateResolver};
//! use psy_props::{AshraeModel, Quantity};
//!
//! let resolver = StateResolver::new(Arc::new(AshraeModel::new()));
//! let input = PsychroInput::with_pair(101_325.0, (Quantity::T, 298.15), (Quantity::R, 0.6));
//! let state = resolver.resolve_reported(&input).unwrap();
//! assert_eq!(state.tdb, 25.0);
//! ```

pub mod batch;
pub mod cache;
pub mod chart;
pub mod config;
pub mod error;
pub mod input;
pub mod mixing;
pub mod reference;
pub mod service;
pub mod state;

pub use batch::{BatchMode, PointOutcome, PointRequest, PointStyle, resolve_all};
pub use cache::{CacheStats, CachedResolver};
pub use chart::{
    ChartCoord, ChartDataset, ChartLine, FailedPoint, LineRequest, NamedPoint, SkippedLine,
    assemble, assemble_chart_data,
};
pub use config::{CacheConfig, EngineConfig};
pub use error::{CalcResult, CalculationError, ConfigError, ConfigResult, MixEndpoint};
pub use input::{MixPointInput, PsychroInput};
pub use mixing::{MixResult, mix};
pub use reference::{ReferenceConfig, ReferenceCurves, reference_curves};
pub use service::PsychroService;
pub use state::{ResolvedState, StateResolver, StateResult, StateSource};
