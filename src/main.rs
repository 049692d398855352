//! House price service entry point
//!
//! Runs one CLI command, or the HTTP API when no subcommand is given.

use clap::Parser;
use house_price_api::cli::{cmd_evaluate, cmd_predict, cmd_serve, cmd_train, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "house_price_api=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Train { data, models_dir, target, test_size, seed }) => {
            cmd_train(&data, &models_dir, &target, test_size, seed)?;
        }
        Some(Commands::Evaluate { data, models_dir }) => {
            cmd_evaluate(&data, &models_dir)?;
        }
        Some(Commands::Predict { record, records_file, models_dir }) => {
            cmd_predict(record.as_deref(), records_file.as_deref(), &models_dir)?;
        }
        Some(Commands::Serve { port, host }) => {
            cmd_serve(host, port).await?;
        }
        None => {
            cmd_serve(None, None).await?;
        }
    }

    Ok(())
}
