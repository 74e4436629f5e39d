//! Handler for the `info` command.

use crate::cli::output;
use crate::config::EngineConfig;
use crate::engine::{EngineRegistry, ModelLoading};

/// List the registered engine providers and their loading semantics.
pub fn execute() {
    let registry = EngineRegistry::builtin();

    output::note("Supported engine providers:");
    println!();
    for adapter in registry.adapters() {
        let engine = EngineConfig::bare(adapter.provider());
        let semantics = match adapter.model_loading(&engine) {
            ModelLoading::PullViaApi { .. } => "models pulled via engine API after start",
            ModelLoading::AtStartup => "models loaded from the container start command",
        };
        println!(
            "  {:<10} port {:<6} {semantics}",
            adapter.provider(),
            adapter.default_port()
        );
    }
}
