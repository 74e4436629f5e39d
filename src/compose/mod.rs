//! Compose manifest generation.
//!
//! Pure transformation from a validated [`RunConfig`] to docker-compose
//! YAML. The generator never touches the filesystem or network; writing
//! the manifest out is the deployer's job, which is what guarantees an
//! unsupported provider can never leave a partially-written file behind.

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::config::RunConfig;
use crate::engine::{EngineRegistry, ServiceDefinition};
use crate::error::{ConfigError, GenerateError, Result};

const COMPOSE_VERSION: &str = "3.8";

/// Top-level compose document. Field order is serialization order;
/// mappings keep insertion order, so output is stable across runs.
#[derive(Debug, Serialize)]
pub struct ComposeManifest {
    version: String,
    services: Mapping,
    #[serde(skip_serializing_if = "Mapping::is_empty")]
    volumes: Mapping,
}

impl ComposeManifest {
    /// Assemble a manifest around a single service.
    ///
    /// Volume declarations whose left-hand side is a bare identifier
    /// (no path separator, no home-directory marker) are registered as
    /// managed named volumes at the top level; host paths are left as
    /// bind mounts.
    pub fn single_service(name: &str, service: ServiceDefinition) -> Result<Self> {
        let mut volumes = Mapping::new();
        for declaration in &service.volumes {
            let lhs = declaration.split(':').next().unwrap_or(declaration);
            if is_named_volume(lhs) {
                volumes.insert(
                    Value::String(lhs.to_string()),
                    Value::Mapping(Mapping::new()),
                );
            }
        }

        let mut services = Mapping::new();
        services.insert(
            Value::String(name.to_string()),
            serde_yaml::to_value(&service).map_err(GenerateError::Serialize)?,
        );

        Ok(Self {
            version: COMPOSE_VERSION.to_string(),
            services,
            volumes,
        })
    }

    /// Serialize to YAML, preserving declaration order.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self).map_err(GenerateError::Serialize)?)
    }
}

/// Decide "managed named volume" vs "host bind mount" from declaration
/// syntax alone; no filesystem probing.
fn is_named_volume(lhs: &str) -> bool {
    !lhs.contains('/') && !lhs.contains('~')
}

/// Generate the full manifest text for a run configuration.
///
/// Dispatches on the provider through the registry; the provider string
/// becomes the service name. Unknown providers fail here, before any I/O.
pub fn generate(config: &RunConfig, registry: &EngineRegistry) -> Result<String> {
    let adapter =
        registry
            .get(&config.engine.provider)
            .ok_or_else(|| ConfigError::UnsupportedProvider {
                provider: config.engine.provider.clone(),
            })?;

    let service = adapter.service_definition(&config.engine, &config.models);
    ComposeManifest::single_service(adapter.provider(), service)?.to_yaml()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineConfig, ModelSpec};
    use crate::error::Error;

    fn config(provider: &str, models: &[&str]) -> RunConfig {
        RunConfig {
            engine: EngineConfig::bare(provider),
            models: models
                .iter()
                .map(|m| ModelSpec {
                    name: (*m).to_string(),
                })
                .collect(),
            logging: Default::default(),
            health: Default::default(),
        }
    }

    fn service(volumes: &[&str]) -> ServiceDefinition {
        ServiceDefinition {
            image: "example:latest".into(),
            ports: vec!["8000:8000".into()],
            volumes: volumes.iter().map(|v| (*v).to_string()).collect(),
            environment: vec![],
            command: vec![],
            restart: None,
        }
    }

    #[test]
    fn bare_identifier_becomes_named_volume() {
        let manifest =
            ComposeManifest::single_service("x", service(&["data:/var/lib/x"])).unwrap();
        let yaml = manifest.to_yaml().unwrap();
        assert!(yaml.contains("volumes:\n  data: {}"), "yaml was:\n{yaml}");
    }

    #[test]
    fn host_path_and_home_path_stay_bind_mounts() {
        let manifest = ComposeManifest::single_service(
            "x",
            service(&["/host/path:/var/lib/x", "~/path:/var/lib/y"]),
        )
        .unwrap();
        let yaml = manifest.to_yaml().unwrap();
        // No top-level volumes section at all.
        assert!(!yaml.contains("\nvolumes:"), "yaml was:\n{yaml}");
    }

    #[test]
    fn unknown_provider_fails_before_serialization() {
        let registry = EngineRegistry::builtin();
        let err = generate(&config("tgi", &["m"]), &registry).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::UnsupportedProvider { .. })
        ));
    }

    #[test]
    fn generation_is_deterministic() {
        let registry = EngineRegistry::builtin();
        let cfg = config("ollama", &["llama3"]);
        assert_eq!(
            generate(&cfg, &registry).unwrap(),
            generate(&cfg, &registry).unwrap()
        );
    }

    #[test]
    fn manifest_sections_keep_declaration_order() {
        let registry = EngineRegistry::builtin();
        let yaml = generate(&config("ollama", &[]), &registry).unwrap();

        let version = yaml.find("version:").unwrap();
        let services = yaml.find("services:").unwrap();
        let volumes = yaml.find("\nvolumes:").unwrap();
        assert!(version < services && services < volumes, "yaml was:\n{yaml}");
        assert!(yaml.contains("version: '3.8'"));
    }

    #[test]
    fn ollama_manifest_registers_model_store_volume() {
        let registry = EngineRegistry::builtin();
        let yaml = generate(&config("ollama", &["llama3"]), &registry).unwrap();
        assert!(yaml.contains("  ollama:\n"), "yaml was:\n{yaml}");
        assert!(yaml.contains("ollama: {}"), "yaml was:\n{yaml}");
    }

    #[test]
    fn vllm_manifest_embeds_model_and_declares_no_named_volume() {
        let registry = EngineRegistry::builtin();
        let yaml = generate(&config("vllm", &["facebook/opt-125m"]), &registry).unwrap();
        assert!(yaml.contains("--model"), "yaml was:\n{yaml}");
        assert!(yaml.contains("facebook/opt-125m"), "yaml was:\n{yaml}");
        assert!(!yaml.contains("\nvolumes:"), "yaml was:\n{yaml}");
    }
}
