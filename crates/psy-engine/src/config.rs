//! Engine configuration, loadable from YAML.

use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::reference::ReferenceConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Property backend name, see `psy_props::available_backends`.
    pub backend: String,
    pub cache: CacheConfig,
    pub reference: ReferenceConfig,
    /// Resolve batch points on the rayon pool.
    pub parallel_batches: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: "ashrae".to_string(),
            cache: CacheConfig::default(),
            reference: ReferenceConfig::default(),
            parallel_batches: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub capacity: usize,
    /// Entry lifetime in seconds; 0 keeps entries until evicted.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 1024,
            ttl_secs: 300,
        }
    }
}

impl CacheConfig {
    pub fn capacity(&self) -> ConfigResult<NonZeroUsize> {
        NonZeroUsize::new(self.capacity)
            .ok_or_else(|| ConfigError::Invalid("cache capacity must be at least 1".to_string()))
    }

    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_secs > 0).then(|| Duration::from_secs(self.ttl_secs))
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.backend.trim().is_empty() {
            return Err(ConfigError::Invalid("backend must not be empty".to_string()));
        }
        if self.cache.enabled {
            self.cache.capacity()?;
        }
        self.reference.validate().map_err(ConfigError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.backend, "ashrae");
        assert!(config.cache.enabled);
        assert_eq!(config.cache.capacity, 1024);
        assert_eq!(config.cache.ttl(), Some(Duration::from_secs(300)));
        assert!(config.parallel_batches);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = EngineConfig::from_yaml_str(
            "cache:\n  capacity: 16\n  ttl_secs: 0\nparallel_batches: false\n",
        )
        .unwrap();
        assert_eq!(config.backend, "ashrae");
        assert!(config.cache.enabled);
        assert_eq!(config.cache.capacity, 16);
        assert_eq!(config.cache.ttl(), None);
        assert!(!config.parallel_batches);
        assert_eq!(config.reference, ReferenceConfig::default());
    }

    #[test]
    fn reference_overrides() {
        let config = EngineConfig::from_yaml_str(
            "reference:\n  t_min_c: 0\n  t_max_c: 40\n  rh_levels: [50]\n",
        )
        .unwrap();
        assert_eq!(config.reference.temperature_grid().len(), 41);
        assert_eq!(config.reference.rh_levels, vec![50.0]);
        assert_eq!(config.reference.w_max, 30.0);
    }

    #[test]
    fn invalid_values_rejected() {
        let err = EngineConfig::from_yaml_str("cache:\n  capacity: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let disabled = EngineConfig::from_yaml_str("cache:\n  enabled: false\n  capacity: 0\n");
        assert!(disabled.is_ok());

        let err = EngineConfig::from_yaml_str("backend: [1, 2]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/psychroflow.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
