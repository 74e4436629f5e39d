use clap::Parser;

use inferdock::cli::{self, output, CheckCommand, Cli, Commands};
use inferdock::error::Result;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::error(&format!("{e}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Deploy(args) => cli::deploy::execute(&args).await,
        Commands::Down(args) => cli::down::execute(&args).await,
        Commands::Check(CheckCommand::Config(args)) => cli::check::execute_config(&args.config),
        Commands::Info => {
            cli::info::execute();
            Ok(())
        }
    }
}
