//! vLLM engine adapter.
//!
//! vLLM loads its model from command-line arguments at container start,
//! so the configured model names must be embedded into the service
//! command here at generation time. After startup the deployer only
//! verifies port reachability.

use crate::config::{EngineConfig, ModelSpec};

use super::{EngineAdapter, ModelLoading, ServiceDefinition};

const DEFAULT_IMAGE: &str = "vllm/vllm-openai:latest";
const DEFAULT_PORT: u16 = 8000;

/// Bind-mounted HF cache so weights survive container recreation.
const DEFAULT_CACHE: &str = "~/.cache/huggingface";
const CACHE_MOUNT: &str = "/root/.cache/huggingface";

pub struct VllmAdapter;

impl EngineAdapter for VllmAdapter {
    fn provider(&self) -> &'static str {
        "vllm"
    }

    fn default_port(&self) -> u16 {
        DEFAULT_PORT
    }

    fn service_definition(&self, engine: &EngineConfig, models: &[ModelSpec]) -> ServiceDefinition {
        let port = self.port(engine);
        let cache = engine.model_cache.as_deref().unwrap_or(DEFAULT_CACHE);

        // The OpenAI-compatible server takes exactly one model; extra
        // configured models are embedded as served aliases.
        let mut command = Vec::new();
        if let Some(first) = models.first() {
            command.extend(["--model".to_string(), first.name.clone()]);
        }
        if models.len() > 1 {
            command.push("--served-model-name".to_string());
            command.extend(models.iter().map(|m| m.name.clone()));
        }
        command.extend(["--port".to_string(), DEFAULT_PORT.to_string()]);

        ServiceDefinition {
            image: engine
                .image
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            ports: vec![format!("{port}:{DEFAULT_PORT}")],
            volumes: vec![format!("{cache}:{CACHE_MOUNT}")],
            environment: engine.environment.clone(),
            command,
            restart: Some("unless-stopped".into()),
        }
    }

    fn model_loading(&self, _engine: &EngineConfig) -> ModelLoading {
        ModelLoading::AtStartup
    }
}
