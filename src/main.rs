//! Construction cost - main entry point
//!
//! Trains the cost model and serves estimates from the CLI or over HTTP.

use clap::Parser;
use construction_cost::cli::{
    cmd_inspect, cmd_interactive, cmd_predict, cmd_serve, cmd_train, print_missing_input, Cli, Commands,
};
use construction_cost::export::DEFAULT_ARTIFACT_PATH;
use construction_cost::CostError;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "construction_cost=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Some(Commands::Train { data, output, seed }) => cmd_train(&data, &output, seed),
        Some(Commands::Predict(args)) => cmd_predict(&args),
        Some(Commands::Inspect { model }) => cmd_inspect(&model),
        Some(Commands::Serve { port, host, model }) => cmd_serve(&host, port, &model).await,
        None => {
            // No subcommand: interactive estimate session
            cmd_interactive(Path::new(DEFAULT_ARTIFACT_PATH))
        }
    };

    if let Err(err) = outcome {
        if let Some(cost) = err.downcast_ref::<CostError>().filter(|e| e.is_missing_input()) {
            print_missing_input(cost);
            std::process::exit(1);
        }
        return Err(err);
    }

    Ok(())
}
