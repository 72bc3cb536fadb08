//! Main entry point for the PO batch translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use po_batch_translator::cli::commands::{self, Commands};

/// PO Batch Translator - concurrent LLM-backed catalog translation
#[derive(Parser, Debug)]
#[command(name = "po-batch-translator", version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    if args.verbose && std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "debug");
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match args.command {
        Some(Commands::Translate {
            file,
            output,
            target_lang,
            workers,
            max_retries,
            retry_delay_secs,
        }) => {
            commands::handle_translate(
                file,
                output,
                target_lang,
                workers,
                max_retries,
                retry_delay_secs,
            )
            .await?;
        }
        Some(Commands::Status { file }) => {
            commands::handle_status(file).await?;
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
