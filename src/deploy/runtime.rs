//! Container runtime port and the docker-compose implementation.

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::info;

use crate::error::DeployError;

/// Port for bringing a compose manifest up and down.
///
/// Implementations invoke an external orchestration process; the exit
/// code of `up` is the only success signal consulted.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Start the environment described by `manifest`, detached.
    async fn up(&self, manifest: &Path) -> Result<(), DeployError>;

    /// Tear the environment down. Best-effort; callers log failures
    /// instead of escalating them.
    async fn down(&self, manifest: &Path) -> Result<(), DeployError>;
}

/// Shells out to the docker-compose CLI.
pub struct ComposeCli {
    program: String,
}

impl ComposeCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ComposeCli {
    fn default() -> Self {
        Self::new("docker-compose")
    }
}

#[async_trait]
impl ContainerRuntime for ComposeCli {
    async fn up(&self, manifest: &Path) -> Result<(), DeployError> {
        info!(manifest = %manifest.display(), "Starting containers");
        let status = Command::new(&self.program)
            .arg("-f")
            .arg(manifest)
            .args(["up", "-d"])
            .status()
            .await
            .map_err(DeployError::RuntimeSpawn)?;

        if !status.success() {
            return Err(DeployError::StartFailed {
                code: status.code().unwrap_or(-1),
            });
        }
        Ok(())
    }

    async fn down(&self, manifest: &Path) -> Result<(), DeployError> {
        info!(manifest = %manifest.display(), "Stopping containers");
        let status = Command::new(&self.program)
            .arg("-f")
            .arg(manifest)
            .arg("down")
            .status()
            .await
            .map_err(|e| DeployError::Teardown(e.to_string()))?;

        if !status.success() {
            return Err(DeployError::Teardown(format!(
                "exit code {}",
                status.code().unwrap_or(-1)
            )));
        }
        Ok(())
    }
}
