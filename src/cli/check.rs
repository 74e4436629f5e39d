//! Handlers for `inferdock check` diagnostics.

use std::path::Path;

use crate::cli::output;
use crate::config::RunConfig;
use crate::engine::{EngineRegistry, ModelLoading};
use crate::error::Result;

/// Validate a run configuration file without deploying anything.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    output::note(&format!("Checking configuration: {}", path.display()));
    println!();

    let registry = EngineRegistry::builtin();
    let config = RunConfig::load(path, &registry)?;

    output::ok("Configuration file is valid");
    println!();
    output::note("Summary:");
    output::key_value("Provider:", &config.engine.provider);

    // Registry lookup cannot fail after validation.
    if let Some(adapter) = registry.get(&config.engine.provider) {
        output::key_value("Port:", adapter.port(&config.engine));
        let semantics = match adapter.model_loading(&config.engine) {
            ModelLoading::PullViaApi { .. } => "pulled via engine API after start",
            ModelLoading::AtStartup => "loaded from the container start command",
        };
        output::key_value("Models:", semantics);
    }

    for model in &config.models {
        output::key_value("", &model.name);
    }
    if config.models.is_empty() {
        output::warn("No models configured; the engine will start empty");
    }

    println!();
    output::note("Configuration is ready to use.");
    Ok(())
}
