//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::core::catalog::{catalog_stats, load_catalog};
use crate::core::client::TranslationClient;
use crate::core::config::TranslatorConfig;
use crate::core::credentials::CredentialRotator;
use crate::core::runner::{JobConfig, JobRunner};

/// Commands for the PO batch translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a PO/POT catalog
    Translate {
        /// Source catalog (required)
        #[arg(short, long)]
        file: PathBuf,

        /// Output catalog; prior partial output here is resumed
        #[arg(short, long)]
        output: PathBuf,

        /// Target language code (e.g. es, fr, fa)
        #[arg(short, long, default_value = "es")]
        target_lang: String,

        /// Worker pool size (default: MAX_WORKERS env or 4)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Total attempts per entry on rate limiting
        #[arg(long)]
        max_retries: Option<u32>,

        /// Backoff between rate-limited attempts, in seconds
        #[arg(long)]
        retry_delay_secs: Option<u64>,
    },

    /// Show translation statistics for a catalog
    Status {
        /// Catalog to inspect
        #[arg(short, long)]
        file: PathBuf,
    },
}

/// Handle the translate command
pub async fn handle_translate(
    file: PathBuf,
    output: PathBuf,
    target_lang: String,
    workers: Option<usize>,
    max_retries: Option<u32>,
    retry_delay_secs: Option<u64>,
) -> anyhow::Result<()> {
    let start_time = Instant::now();

    let mut config = TranslatorConfig::from_env()?;
    if let Some(workers) = workers {
        config.max_workers = workers;
    }
    if let Some(max_retries) = max_retries {
        config.max_retries = max_retries;
    }
    if let Some(retry_delay_secs) = retry_delay_secs {
        config.retry_delay_secs = retry_delay_secs;
    }

    info!("starting batch translation");
    info!("input: {}", file.display());
    info!("output: {}", output.display());
    info!("target language: {}", target_lang);
    info!("workers: {}", config.max_workers);

    let rotator = Arc::new(CredentialRotator::from_env());
    info!("credential pool size: {}", rotator.len());

    let workers = config.max_workers;
    let translator = Arc::new(TranslationClient::new(config)?);

    let runner = JobRunner::new(
        translator,
        rotator,
        JobConfig {
            source: file,
            output: output.clone(),
            target_lang,
            workers,
        },
    )
    .with_progress(true);

    let summary = runner.run().await?;
    let duration = start_time.elapsed();

    if summary.processed == 0 && summary.total > 0 {
        println!("\nAll entries are already translated. Nothing to do.");
        return Ok(());
    }

    println!("\n✅ Translation completed!");
    println!("   File saved as: {}", output.display());
    println!("   Total entries: {}", summary.total);
    println!("   Processed: {}", summary.processed);
    println!("   Skipped: {}", summary.skipped);
    println!("   Newly translated: {}", summary.translated());
    println!("   Degraded (kept original): {}", summary.degraded);
    println!("   Time: {:?}", duration);

    Ok(())
}

/// Handle the status command
pub async fn handle_status(file: PathBuf) -> anyhow::Result<()> {
    let catalog = load_catalog(&file)?;
    let stats = catalog_stats(&catalog);

    println!("📄 {}", file.display());
    println!("   Total entries: {}", stats.total);
    println!("   Translated: {}", stats.translated);
    println!("   Untranslated: {}", stats.untranslated);
    if stats.plural > 0 {
        println!("   Plural (not handled): {}", stats.plural);
    }

    if stats.untranslated == 0 {
        println!("\n✅ Catalog is fully translated!");
    } else {
        println!(
            "\n⚠️  {} entries still need translation",
            stats.untranslated
        );
    }

    Ok(())
}
