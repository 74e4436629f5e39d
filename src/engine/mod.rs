//! Engine adapter trait and registry.
//!
//! An adapter translates provider-specific settings into the service
//! definition that ends up in the compose manifest. Adapters are pure:
//! no I/O, no network, just construction. Everything downstream treats
//! the provider as an opaque key — the generator looks it up in the
//! registry and the deployer asks the adapter how models get loaded,
//! so adding a provider means one new adapter plus one registry entry.

pub mod ollama;
pub mod vllm;

pub use ollama::OllamaAdapter;
pub use vllm::VllmAdapter;

use serde::Serialize;

use crate::config::{EngineConfig, ModelSpec};

/// One service entry in the compose manifest, exactly as serialized.
///
/// Field order here is declaration order in the generated YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDefinition {
    pub image: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart: Option<String>,
}

/// How a provider's engine gets its models resident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelLoading {
    /// Engine starts empty; each model is fetched through the engine's
    /// HTTP API once the service is reachable.
    PullViaApi { base_url: String },
    /// Models are baked into the service command at generation time;
    /// nothing to do after startup.
    AtStartup,
}

/// Interface every inference-engine backend must provide.
pub trait EngineAdapter: Send + Sync {
    /// Provider discriminator, also used as the service name.
    fn provider(&self) -> &'static str;

    /// Port the engine listens on when the config does not override it.
    fn default_port(&self) -> u16;

    /// Build the service definition for this provider.
    ///
    /// Must be deterministic for identical input, and must honor every
    /// override in `engine` while defaulting anything omitted. Providers
    /// that load models at startup must embed `models` into the command
    /// here — the deployer will not pass them again.
    fn service_definition(&self, engine: &EngineConfig, models: &[ModelSpec]) -> ServiceDefinition;

    /// Model-loading semantics for this provider, resolved against the
    /// configured port.
    fn model_loading(&self, engine: &EngineConfig) -> ModelLoading;

    /// Port the engine listens on for this configuration.
    fn port(&self, engine: &EngineConfig) -> u16 {
        engine.port.unwrap_or_else(|| self.default_port())
    }
}

/// Registry of engine adapters, keyed by provider discriminator.
#[derive(Default)]
pub struct EngineRegistry {
    adapters: Vec<Box<dyn EngineAdapter>>,
}

impl EngineRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all built-in providers.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(OllamaAdapter));
        registry.register(Box::new(VllmAdapter));
        registry
    }

    /// Register an adapter. Later registrations do not shadow earlier
    /// ones; provider names are expected to be unique.
    pub fn register(&mut self, adapter: Box<dyn EngineAdapter>) {
        self.adapters.push(adapter);
    }

    /// Look up the adapter for a provider discriminator.
    #[must_use]
    pub fn get(&self, provider: &str) -> Option<&dyn EngineAdapter> {
        self.adapters
            .iter()
            .find(|a| a.provider() == provider)
            .map(|a| a.as_ref())
    }

    /// All registered adapters, in registration order.
    #[must_use]
    pub fn adapters(&self) -> &[Box<dyn EngineAdapter>] {
        &self.adapters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_knows_both_providers() {
        let registry = EngineRegistry::builtin();
        assert!(registry.get("ollama").is_some());
        assert!(registry.get("vllm").is_some());
        assert!(registry.get("tgi").is_none());
    }

    #[test]
    fn port_override_wins_over_default() {
        let registry = EngineRegistry::builtin();
        let adapter = registry.get("ollama").unwrap();
        let mut engine = EngineConfig::bare("ollama");
        engine.port = Some(4242);
        assert_eq!(adapter.port(&engine), 4242);
    }
}
