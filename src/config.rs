//! Run configuration loading and validation.
//!
//! A [`RunConfig`] is the declarative description of one AI-serving
//! environment: which inference engine to run and which models it must
//! serve. Configs are read from JSON and validated against the engine
//! registry before anything else happens, so an unknown provider can never
//! surface later as a half-written manifest or a failed container start.

use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

use crate::engine::EngineRegistry;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub engine: EngineConfig,
    pub models: Vec<ModelSpec>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub health: HealthConfig,
}

/// Provider selection plus provider-specific overrides.
///
/// Everything except `provider` is optional; adapters fill in their own
/// defaults for image, port and mounts.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub provider: String,
    pub image: Option<String>,
    pub port: Option<u16>,
    /// Extra `KEY=VALUE` entries for the service environment.
    #[serde(default)]
    pub environment: Vec<String>,
    /// Host directory to mount as the engine's model cache instead of the
    /// provider default.
    pub model_cache: Option<String>,
}

impl EngineConfig {
    /// Engine config with only a provider set; adapters fill in the rest.
    #[must_use]
    pub fn bare(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            image: None,
            port: None,
            environment: vec![],
            model_cache: None,
        }
    }
}

/// A model the engine must end up serving.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSpec {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

/// Readiness-poll tuning for `start`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    /// Total wall-clock budget for the readiness poll, in seconds.
    pub timeout_secs: u64,
    /// Fixed delay between reachability attempts, in seconds.
    pub poll_interval_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            poll_interval_secs: 2,
        }
    }
}

impl RunConfig {
    /// Load a config from a JSON file and validate it against the registry.
    pub fn load<P: AsRef<Path>>(path: P, registry: &EngineRegistry) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: RunConfig = serde_json::from_str(&content).map_err(ConfigError::Parse)?;

        config.validate(registry)?;

        Ok(config)
    }

    fn validate(&self, registry: &EngineRegistry) -> Result<()> {
        if registry.get(&self.engine.provider).is_none() {
            return Err(ConfigError::UnsupportedProvider {
                provider: self.engine.provider.clone(),
            }
            .into());
        }
        for model in &self.models {
            if model.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "models",
                    reason: "model name cannot be empty".into(),
                }
                .into());
            }
        }
        if self.health.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "health.poll_interval_secs",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn registry() -> EngineRegistry {
        EngineRegistry::builtin()
    }

    fn parse(json: &str) -> RunConfig {
        serde_json::from_str(json).expect("parse config")
    }

    #[test]
    fn minimal_ollama_config_is_valid() {
        let config = parse(
            r#"{
                "engine": {"provider": "ollama"},
                "models": [{"name": "llama3"}]
            }"#,
        );
        assert!(config.validate(&registry()).is_ok());
        assert_eq!(config.health.timeout_secs, 60);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn unknown_provider_is_rejected_at_validation() {
        let config = parse(
            r#"{
                "engine": {"provider": "tgi"},
                "models": [{"name": "llama3"}]
            }"#,
        );
        let err = config.validate(&registry()).unwrap_err();
        match err {
            Error::Config(ConfigError::UnsupportedProvider { provider }) => {
                assert_eq!(provider, "tgi");
            }
            other => panic!("expected UnsupportedProvider, got {other}"),
        }
    }

    #[test]
    fn empty_model_name_is_rejected() {
        let config = parse(
            r#"{
                "engine": {"provider": "ollama"},
                "models": [{"name": "  "}]
            }"#,
        );
        assert!(config.validate(&registry()).is_err());
    }

    #[test]
    fn port_and_environment_overrides_parse() {
        let config = parse(
            r#"{
                "engine": {
                    "provider": "vllm",
                    "port": 9000,
                    "environment": ["HUGGING_FACE_HUB_TOKEN=hf_x"]
                },
                "models": [{"name": "mistralai/Mistral-7B-Instruct-v0.3"}]
            }"#,
        );
        assert_eq!(config.engine.port, Some(9000));
        assert_eq!(config.engine.environment.len(), 1);
        assert!(config.validate(&registry()).is_ok());
    }
}
