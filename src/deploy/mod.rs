//! Deployment lifecycle management.
//!
//! The [`Deployer`] owns all I/O: it writes the generated manifest,
//! invokes the container runtime, polls the engine for reachability and
//! drives provider-specific model loading. Session state lives in an
//! explicit [`DeploymentSession`] value, so one process can manage
//! several independent deployments.
//!
//! State machine:
//!
//! ```text
//! Unstarted -> Generated -> Running -> Stopped
//!                   \           \
//!                    +-> Failed <+
//! ```

pub mod engine_api;
pub mod runtime;

pub use engine_api::{EngineApi, HttpEngineApi};
pub use runtime::{ComposeCli, ContainerRuntime};

use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

use crate::config::{HealthConfig, RunConfig};
use crate::engine::{EngineAdapter, EngineRegistry, ModelLoading};
use crate::error::{ConfigError, DeployError, GenerateError, Result};

/// Where a deployment session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployState {
    Unstarted,
    Generated,
    Running,
    Stopped,
    Failed,
}

impl std::fmt::Display for DeployState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DeployState::Unstarted => "unstarted",
            DeployState::Generated => "generated",
            DeployState::Running => "running",
            DeployState::Stopped => "stopped",
            DeployState::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Runtime state of one deployment: which manifest backs it and where
/// it is in the lifecycle. No persisted identity beyond the manifest
/// path.
#[derive(Debug)]
pub struct DeploymentSession {
    manifest_path: Option<PathBuf>,
    state: DeployState,
}

impl DeploymentSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            manifest_path: None,
            state: DeployState::Unstarted,
        }
    }

    /// Resume a session around an already-written manifest, e.g. for
    /// `down` in a fresh process.
    #[must_use]
    pub fn from_manifest(path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: Some(path.into()),
            state: DeployState::Generated,
        }
    }

    #[must_use]
    pub fn state(&self) -> DeployState {
        self.state
    }

    #[must_use]
    pub fn manifest_path(&self) -> Option<&Path> {
        self.manifest_path.as_deref()
    }
}

impl Default for DeploymentSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives the generate / start / stop lifecycle for run configurations.
pub struct Deployer {
    registry: EngineRegistry,
    runtime: Box<dyn ContainerRuntime>,
    api: Box<dyn EngineApi>,
}

impl Deployer {
    /// Deployer with the real docker-compose CLI and HTTP engine API.
    #[must_use]
    pub fn new(registry: EngineRegistry) -> Self {
        Self {
            registry,
            runtime: Box::new(ComposeCli::default()),
            api: Box::new(HttpEngineApi::new()),
        }
    }

    /// Deployer with injected runtime and engine ports.
    #[must_use]
    pub fn with_ports(
        registry: EngineRegistry,
        runtime: Box<dyn ContainerRuntime>,
        api: Box<dyn EngineApi>,
    ) -> Self {
        Self {
            registry,
            runtime,
            api,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    /// Generate the manifest and write it to `output`, recording the
    /// path in the session. Filesystem only; overwrites an existing
    /// file at that path.
    pub fn generate_deployment(
        &self,
        config: &RunConfig,
        session: &mut DeploymentSession,
        output: &Path,
    ) -> Result<()> {
        if session.state == DeployState::Running {
            return Err(DeployError::InvalidState {
                state: session.state,
            }
            .into());
        }

        // Serialize before touching the filesystem, so config errors
        // never leave a partial manifest behind.
        let yaml = crate::compose::generate(config, &self.registry)?;

        std::fs::write(output, yaml).map_err(|e| GenerateError::WriteManifest {
            path: output.to_path_buf(),
            source: e,
        })?;

        session.manifest_path = Some(output.to_path_buf());
        session.state = DeployState::Generated;
        info!(manifest = %output.display(), "Deployment generated");
        Ok(())
    }

    /// Bring the environment up: start containers, wait for the engine
    /// port, then load models per the provider's semantics.
    pub async fn start_environment(
        &self,
        config: &RunConfig,
        session: &mut DeploymentSession,
    ) -> Result<()> {
        if session.state != DeployState::Generated {
            return Err(DeployError::InvalidState {
                state: session.state,
            }
            .into());
        }
        let manifest = match session.manifest_path.clone() {
            Some(path) => path,
            None => {
                return Err(DeployError::InvalidState {
                    state: session.state,
                }
                .into())
            }
        };
        if !manifest.exists() {
            return Err(DeployError::ManifestMissing { path: manifest }.into());
        }

        match self.try_start(config, &manifest).await {
            Ok(()) => {
                session.state = DeployState::Running;
                info!("Environment is up");
                Ok(())
            }
            Err(e) => {
                session.state = DeployState::Failed;
                Err(e)
            }
        }
    }

    /// Tear the environment down. Best-effort: teardown failures are
    /// reported but the session still transitions to Stopped.
    pub async fn stop_environment(&self, session: &mut DeploymentSession) -> Result<()> {
        if let Some(manifest) = session.manifest_path() {
            if let Err(e) = self.runtime.down(manifest).await {
                warn!(error = %e, "Teardown reported an error; continuing");
            }
        }
        session.state = DeployState::Stopped;
        Ok(())
    }

    async fn try_start(&self, config: &RunConfig, manifest: &Path) -> Result<()> {
        let adapter =
            self.registry
                .get(&config.engine.provider)
                .ok_or_else(|| ConfigError::UnsupportedProvider {
                    provider: config.engine.provider.clone(),
                })?;

        self.runtime.up(manifest).await?;

        let port = adapter.port(&config.engine);
        self.wait_for_ready(port, &config.health).await?;

        self.load_models(config, adapter).await
    }

    /// Poll `localhost:<port>` at a fixed interval until reachable or
    /// the wall-clock budget runs out. Refusals and every other network
    /// error both mean "not yet ready"; only timeout vs reachable is
    /// distinguished.
    async fn wait_for_ready(&self, port: u16, health: &HealthConfig) -> Result<()> {
        let timeout = Duration::from_secs(health.timeout_secs);
        let interval = Duration::from_secs(health.poll_interval_secs);
        let started = Instant::now();
        let mut attempts: u32 = 0;

        info!(port, timeout_secs = health.timeout_secs, "Waiting for engine");
        loop {
            attempts += 1;
            if self.api.probe(port).await {
                info!(port, attempts, "Engine is reachable");
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(DeployError::ReadinessTimeout {
                    port,
                    elapsed_secs: started.elapsed().as_secs(),
                }
                .into());
            }
            sleep(interval).await;
        }
    }

    /// Provider-specific model initialization, after reachability.
    ///
    /// Pulls run sequentially; the first failure aborts the rest and
    /// names the model that failed.
    async fn load_models(&self, config: &RunConfig, adapter: &dyn EngineAdapter) -> Result<()> {
        match adapter.model_loading(&config.engine) {
            ModelLoading::PullViaApi { base_url } => {
                for model in &config.models {
                    info!(model = %model.name, "Pulling model (this may take a while)");
                    self.api.pull_model(&base_url, &model.name).await?;
                    info!(model = %model.name, "Model ready");
                }
            }
            ModelLoading::AtStartup => {
                for model in &config.models {
                    info!(model = %model.name, "Engine loads this model from its start command");
                }
            }
        }
        Ok(())
    }
}
