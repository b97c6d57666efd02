//! The logical operation surface shared by the HTTP server and the CLI.

use std::sync::Arc;

use psy_props::{PropertyEvaluator, model_by_name};
use tracing::info;

use crate::batch::{BatchMode, PointOutcome, PointRequest, resolve_all};
use crate::cache::{CacheStats, CachedResolver};
use crate::chart::{ChartDataset, LineRequest, assemble_chart_data};
use crate::config::EngineConfig;
use crate::error::{CalcResult, ConfigResult};
use crate::input::{MixPointInput, PsychroInput};
use crate::mixing::{MixResult, mix};
use crate::reference::{ReferenceCurves, reference_curves};
use crate::state::{StateResolver, StateResult, StateSource};

/// Engine wired from an [`EngineConfig`]: model, resolver, optional cache.
#[derive(Clone)]
pub struct PsychroService {
    model: Arc<dyn PropertyEvaluator>,
    source: Arc<dyn StateSource>,
    cache: Option<Arc<CachedResolver<StateResolver>>>,
    config: EngineConfig,
}

impl PsychroService {
    pub fn from_config(config: EngineConfig) -> ConfigResult<Self> {
        config.validate()?;
        let model = model_by_name(&config.backend)?;
        Self::with_model(model, config)
    }

    /// Build around an explicit model; `config.backend` is not consulted.
    pub fn with_model(model: Arc<dyn PropertyEvaluator>, config: EngineConfig) -> ConfigResult<Self> {
        let resolver = StateResolver::new(model.clone());
        let cache = if config.cache.enabled {
            Some(Arc::new(CachedResolver::new(
                resolver.clone(),
                config.cache.capacity()?,
                config.cache.ttl(),
            )))
        } else {
            None
        };
        let source: Arc<dyn StateSource> = match &cache {
            Some(cache) => cache.clone(),
            None => Arc::new(resolver),
        };

        info!(
            backend = model.name(),
            cache = config.cache.enabled,
            parallel = config.parallel_batches,
            "psychrometric engine ready"
        );

        Ok(Self {
            model,
            source,
            cache,
            config,
        })
    }

    pub fn backend_name(&self) -> &str {
        self.model.name()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|c| c.stats())
    }

    fn batch_mode(&self) -> BatchMode {
        if self.config.parallel_batches {
            BatchMode::Parallel
        } else {
            BatchMode::Sequential
        }
    }

    /// Single-point resolution; `input` carries its own pressure.
    pub fn calculate_state(&self, input: &PsychroInput) -> CalcResult<StateResult> {
        self.source.resolve(input).map(|state| state.report())
    }

    /// Batch resolution with per-point failure isolation.
    pub fn calculate_multiple(&self, pressure: f64, points: &[PointRequest]) -> Vec<PointOutcome> {
        resolve_all(self.source.as_ref(), points, pressure, self.batch_mode())
    }

    pub fn assemble_chart_data(
        &self,
        pressure: f64,
        points: &[PointRequest],
        lines: &[LineRequest],
    ) -> ChartDataset {
        assemble_chart_data(self.source.as_ref(), pressure, points, lines, self.batch_mode())
    }

    pub fn mix(
        &self,
        pressure: f64,
        point1: &MixPointInput,
        point2: &MixPointInput,
        ratio: f64,
    ) -> CalcResult<MixResult> {
        mix(self.source.as_ref(), point1, point2, pressure, ratio)
    }

    pub fn reference_curves(&self, pressure: f64) -> CalcResult<ReferenceCurves> {
        reference_curves(self.model.as_ref(), pressure, &self.config.reference)
    }
}

impl std::fmt::Debug for PsychroService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PsychroService")
            .field("backend", &self.model.name())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use psy_props::Quantity;

    #[test]
    fn default_service_resolves_and_caches() {
        let service = PsychroService::from_config(EngineConfig::default()).unwrap();
        assert_eq!(service.backend_name(), "ashrae");

        let input = PsychroInput::with_pair(101325.0, (Quantity::T, 298.15), (Quantity::R, 0.6));
        let first = service.calculate_state(&input).unwrap();
        let second = service.calculate_state(&input).unwrap();
        assert_eq!(first, second);

        let stats = service.cache_stats().unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn cache_can_be_disabled() {
        let mut config = EngineConfig::default();
        config.cache.enabled = false;
        let service = PsychroService::from_config(config).unwrap();
        assert!(service.cache_stats().is_none());
    }

    #[test]
    fn unknown_backend() {
        let config = EngineConfig {
            backend: "refprop".to_string(),
            ..EngineConfig::default()
        };
        let err = PsychroService::from_config(config).unwrap_err();
        assert!(matches!(err, ConfigError::Backend(_)));
    }
}
