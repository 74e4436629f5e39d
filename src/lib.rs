//! Inferdock - declarative deployment of local AI inference engines.
//!
//! Translates a run configuration (which engine provider, which models)
//! into a docker-compose manifest, brings the environment up, waits for
//! the engine to accept connections and loads the configured models.
//!
//! # Architecture
//!
//! Providers are pluggable behind a single adapter trait:
//!
//! - **[`engine`]** - Engine adapters and the provider registry
//!   - `OllamaAdapter` - starts empty, models pulled through the engine API
//!   - `VllmAdapter` - models embedded in the container start command
//! - **[`compose`]** - Pure manifest generation from a run configuration
//! - **[`deploy`]** - Lifecycle state machine and all I/O: subprocess
//!   invocation, readiness polling, model loading
//!
//! # Modules
//!
//! - [`config`] - Run configuration loading from JSON with validation
//! - [`error`] - Error types for the crate
//! - [`cli`] - Command-line interface and handlers
//!
//! # Example
//!
//! ```no_run
//! use inferdock::deploy::{Deployer, DeploymentSession};
//! use inferdock::engine::EngineRegistry;
//!
//! let registry = EngineRegistry::builtin();
//! let deployer = Deployer::new(registry);
//! let session = DeploymentSession::new();
//! ```

pub mod cli;
pub mod compose;
pub mod config;
pub mod deploy;
pub mod engine;
pub mod error;
