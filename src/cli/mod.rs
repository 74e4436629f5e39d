//! Command-line interface definitions.

pub mod check;
pub mod deploy;
pub mod down;
pub mod info;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Deploy local AI inference engines from a declarative run configuration.
#[derive(Parser, Debug)]
#[command(name = "inferdock")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the compose manifest, start the environment and load models
    Deploy(DeployArgs),

    /// Tear down a deployed environment (best-effort)
    Down(DownArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// List supported engine providers
    Info,
}

/// Subcommands for `inferdock check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate a run configuration file
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the JSON run configuration file
    #[arg(short, long)]
    pub config: PathBuf,
}

/// Arguments for the `deploy` subcommand.
#[derive(Parser, Debug)]
pub struct DeployArgs {
    /// Path to the JSON run configuration file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Where to write the generated compose manifest
    #[arg(short, long, default_value = "docker-compose.yml")]
    pub output: PathBuf,

    /// Generate the manifest without starting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Override the readiness-poll timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,
}

/// Arguments for the `down` subcommand.
#[derive(Parser, Debug)]
pub struct DownArgs {
    /// Compose manifest of the environment to tear down
    #[arg(short, long, default_value = "docker-compose.yml")]
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn deploy_defaults_output_to_compose_file() {
        let cli = Cli::parse_from(["inferdock", "deploy", "--config", "run.json"]);
        match cli.command {
            Commands::Deploy(args) => {
                assert_eq!(args.output, PathBuf::from("docker-compose.yml"));
                assert!(!args.dry_run);
            }
            other => panic!("expected Deploy, got {other:?}"),
        }
    }

    #[test]
    fn dry_run_flag_parses() {
        let cli = Cli::parse_from(["inferdock", "deploy", "-c", "run.json", "--dry-run"]);
        match cli.command {
            Commands::Deploy(args) => assert!(args.dry_run),
            other => panic!("expected Deploy, got {other:?}"),
        }
    }
}
