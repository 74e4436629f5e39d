//! Handler for the `deploy` command.

use tokio::signal;
use tracing::info;

use crate::cli::{output, DeployArgs};
use crate::config::RunConfig;
use crate::deploy::{Deployer, DeploymentSession};
use crate::engine::EngineRegistry;
use crate::error::Result;

/// Execute the deploy command.
pub async fn execute(args: &DeployArgs) -> Result<()> {
    let registry = EngineRegistry::builtin();
    let mut config = RunConfig::load(&args.config, &registry)?;

    // Apply CLI overrides
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    if let Some(timeout) = args.timeout_secs {
        config.health.timeout_secs = timeout;
    }

    config.init_logging();

    info!(
        provider = %config.engine.provider,
        models = config.models.len(),
        "inferdock starting"
    );

    let deployer = Deployer::new(registry);
    let mut session = DeploymentSession::new();

    deployer.generate_deployment(&config, &mut session, &args.output)?;
    output::ok(&format!(
        "Deployment file generated at: {}",
        args.output.display()
    ));

    if args.dry_run {
        output::note("Dry run: not starting the environment");
        return Ok(());
    }

    output::note("Starting environment...");
    let interrupted = tokio::select! {
        result = deployer.start_environment(&config, &mut session) => {
            result?;
            false
        }
        _ = signal::ctrl_c() => true,
    };

    if interrupted {
        info!("Shutdown signal received");
        output::warn("Interrupted; tearing down");
        deployer.stop_environment(&mut session).await?;
        return Ok(());
    }

    output::ok("Environment is up and running");
    Ok(())
}
