//! Engine HTTP port: reachability probes and model pulls.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use crate::error::DeployError;

const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Model pulls download weights; give them a long but bounded budget so
/// a stalled transfer fails instead of hanging forever.
const PULL_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Port for talking to a running inference engine over HTTP.
#[async_trait]
pub trait EngineApi: Send + Sync {
    /// Reachability probe against `localhost:<port>`. Any response
    /// counts as reachable; refusals and every other network error
    /// count as not-yet-ready.
    async fn probe(&self, port: u16) -> bool;

    /// Ask the engine to fetch one model, waiting for the final
    /// (non-streamed) response.
    async fn pull_model(&self, base_url: &str, model: &str) -> Result<(), DeployError>;
}

/// reqwest-backed implementation against the engine's local API.
pub struct HttpEngineApi {
    client: reqwest::Client,
    pull_timeout: Duration,
}

impl HttpEngineApi {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            pull_timeout: PULL_TIMEOUT,
        }
    }
}

impl Default for HttpEngineApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EngineApi for HttpEngineApi {
    async fn probe(&self, port: u16) -> bool {
        self.client
            .get(format!("http://localhost:{port}/"))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .is_ok()
    }

    async fn pull_model(&self, base_url: &str, model: &str) -> Result<(), DeployError> {
        let response = self
            .client
            .post(format!("{base_url}/api/pull"))
            .json(&json!({ "name": model, "stream": false }))
            .timeout(self.pull_timeout)
            .send()
            .await
            .map_err(|e| DeployError::ModelLoad {
                model: model.to_string(),
                reason: e.to_string(),
            })?;

        response
            .error_for_status()
            .map_err(|e| DeployError::ModelLoad {
                model: model.to_string(),
                reason: e.to_string(),
            })?;

        Ok(())
    }
}
