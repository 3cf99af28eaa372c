use anyhow::Context;
use clap::Parser;
use tracing::error;

use dealforge::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config_path = match &cli.command {
        Commands::Analyze(args) => args.config.clone(),
        Commands::Valuate(args) => args.config.clone(),
        Commands::Stack(args) => args.config.clone(),
        Commands::Match(args) => args.config.clone(),
        Commands::Check(cli::CheckCommand::Config(args)) => args.config.clone(),
    };

    let config = cli::load_config(&config_path).context("loading configuration")?;
    config.init_logging();

    let result = match &cli.command {
        Commands::Analyze(args) => cli::analyze::run(args),
        Commands::Valuate(args) => cli::valuate::run(args).await,
        Commands::Stack(args) => cli::stack::run(args).await,
        Commands::Match(args) => cli::matching::run(args),
        Commands::Check(cli::CheckCommand::Config(args)) => cli::check::config(args),
    };

    if let Err(e) = result {
        error!(error = %e, "command failed");
        std::process::exit(1);
    }

    Ok(())
}
