use std::path::PathBuf;

use thiserror::Error;

use crate::deploy::DeployState;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("unsupported provider: {provider}")]
    UnsupportedProvider { provider: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Manifest generation errors.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("failed to write manifest to {path}: {source}")]
    WriteManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Deployment lifecycle errors.
///
/// `InvalidState` is a caller mistake; the other variants are runtime
/// failures of the environment being deployed.
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("cannot start from state {state}: generate a deployment first")]
    InvalidState { state: DeployState },

    #[error("manifest not found at {path}: generate a deployment first")]
    ManifestMissing { path: PathBuf },

    #[error("failed to invoke container runtime: {0}")]
    RuntimeSpawn(#[source] std::io::Error),

    #[error("container runtime start failed with exit code {code}")]
    StartFailed { code: i32 },

    #[error("engine on port {port} not reachable after {elapsed_secs}s")]
    ReadinessTimeout { port: u16, elapsed_secs: u64 },

    #[error("failed to pull model '{model}': {reason}")]
    ModelLoad { model: String, reason: String },

    #[error("teardown failed: {0}")]
    Teardown(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
