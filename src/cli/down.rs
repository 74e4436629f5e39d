//! Handler for the `down` command.

use tracing_subscriber::EnvFilter;

use crate::cli::{output, DownArgs};
use crate::deploy::{Deployer, DeploymentSession};
use crate::engine::EngineRegistry;
use crate::error::Result;

/// Execute the down command.
///
/// Teardown is best-effort: a runtime error is reported but does not
/// fail the command, since the operator's intent is "stop trying".
pub async fn execute(args: &DownArgs) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if !args.file.exists() {
        output::warn(&format!(
            "No manifest at {}; nothing to tear down",
            args.file.display()
        ));
        return Ok(());
    }

    let deployer = Deployer::new(EngineRegistry::builtin());
    let mut session = DeploymentSession::from_manifest(&args.file);

    deployer.stop_environment(&mut session).await?;
    output::ok("Environment stopped");
    Ok(())
}
