//! Ollama engine adapter.
//!
//! Ollama containers start with no models resident; the deployer pulls
//! each configured model through `POST /api/pull` once the service is
//! reachable. The service definition therefore carries no model names,
//! only the image, port mapping and a named volume for the model store.

use crate::config::{EngineConfig, ModelSpec};

use super::{EngineAdapter, ModelLoading, ServiceDefinition};

const DEFAULT_IMAGE: &str = "ollama/ollama:latest";
const DEFAULT_PORT: u16 = 11434;

/// Named volume keeps pulled models across container restarts.
const MODEL_STORE: &str = "/root/.ollama";

pub struct OllamaAdapter;

impl EngineAdapter for OllamaAdapter {
    fn provider(&self) -> &'static str {
        "ollama"
    }

    fn default_port(&self) -> u16 {
        DEFAULT_PORT
    }

    fn service_definition(&self, engine: &EngineConfig, _models: &[ModelSpec]) -> ServiceDefinition {
        let port = self.port(engine);
        let cache = engine.model_cache.as_deref().unwrap_or("ollama");

        ServiceDefinition {
            image: engine
                .image
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            ports: vec![format!("{port}:{DEFAULT_PORT}")],
            volumes: vec![format!("{cache}:{MODEL_STORE}")],
            environment: engine.environment.clone(),
            command: vec![],
            restart: Some("unless-stopped".into()),
        }
    }

    fn model_loading(&self, engine: &EngineConfig) -> ModelLoading {
        ModelLoading::PullViaApi {
            base_url: format!("http://localhost:{}", self.port(engine)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> EngineConfig {
        EngineConfig::bare("ollama")
    }

    #[test]
    fn defaults_applied_when_config_is_bare() {
        let def = OllamaAdapter.service_definition(&engine(), &[]);
        assert_eq!(def.image, "ollama/ollama:latest");
        assert_eq!(def.ports, vec!["11434:11434"]);
        assert_eq!(def.volumes, vec!["ollama:/root/.ollama"]);
        assert!(def.command.is_empty());
    }

    #[test]
    fn service_definition_is_deterministic() {
        let models = vec![ModelSpec {
            name: "llama3".into(),
        }];
        let a = OllamaAdapter.service_definition(&engine(), &models);
        let b = OllamaAdapter.service_definition(&engine(), &models);
        assert_eq!(a, b);
        assert_eq!(
            serde_yaml::to_string(&a).unwrap(),
            serde_yaml::to_string(&b).unwrap()
        );
    }

    #[test]
    fn port_override_changes_mapping_and_pull_url() {
        let mut engine = engine();
        engine.port = Some(12000);

        let def = OllamaAdapter.service_definition(&engine, &[]);
        assert_eq!(def.ports, vec!["12000:11434"]);

        match OllamaAdapter.model_loading(&engine) {
            ModelLoading::PullViaApi { base_url } => {
                assert_eq!(base_url, "http://localhost:12000");
            }
            other => panic!("expected PullViaApi, got {other:?}"),
        }
    }

    #[test]
    fn host_cache_override_replaces_named_volume() {
        let mut engine = engine();
        engine.model_cache = Some("/srv/ollama".into());

        let def = OllamaAdapter.service_definition(&engine, &[]);
        assert_eq!(def.volumes, vec!["/srv/ollama:/root/.ollama"]);
    }
}
