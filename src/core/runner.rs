//! Batch job orchestration: load, merge, select, dispatch, report

use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::core::catalog::{load_catalog, merge_existing, work_items, SharedCatalog};
use crate::core::client::Translator;
use crate::core::credentials::CredentialRotator;
use crate::core::errors::Result;
use crate::core::models::{EntryDisposition, RunSummary, WorkItem};
use crate::core::progress::ProgressTracker;

/// Parameters for one batch run
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Source PO/POT catalog
    pub source: PathBuf,
    /// Output catalog; also consulted for prior partial progress
    pub output: PathBuf,
    /// Target language code passed to the remote model
    pub target_lang: String,
    /// Worker pool size, independent of the credential pool size
    pub workers: usize,
}

/// Runs one batch translation job to completion.
///
/// Per-entry failures never abort the batch; a fatal failure after loading
/// still attempts a best-effort save of whatever state the catalog is in.
pub struct JobRunner {
    translator: Arc<dyn Translator>,
    rotator: Arc<CredentialRotator>,
    job: JobConfig,
    show_progress: bool,
}

impl JobRunner {
    pub fn new(
        translator: Arc<dyn Translator>,
        rotator: Arc<CredentialRotator>,
        job: JobConfig,
    ) -> Self {
        Self {
            translator,
            rotator,
            job,
            show_progress: false,
        }
    }

    /// Display an interactive progress bar instead of per-entry log lines
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Execute the job and return the final counts
    pub async fn run(&self) -> Result<RunSummary> {
        info!("loading catalog from {}", self.job.source.display());
        let mut catalog = load_catalog(&self.job.source)?;

        if self.job.output.exists() {
            info!(
                "found existing translation file: {}",
                self.job.output.display()
            );
            match load_catalog(&self.job.output) {
                Ok(existing) => {
                    let applied = merge_existing(&mut catalog, &existing);
                    info!("applied {} existing translations from previous run", applied);
                }
                Err(e) => warn!("could not load existing translations: {}", e),
            }
        }

        let items = work_items(&catalog);
        let pending = items.iter().filter(|item| item.needs_translation).count();

        if pending == 0 {
            info!("all entries are already translated, nothing to do");
            return Ok(RunSummary {
                total: items.len(),
                ..Default::default()
            });
        }

        info!("found {} entries that need translation", pending);

        let shared = Arc::new(SharedCatalog::new(catalog, &self.job.output));
        let mut tracker = ProgressTracker::new(shared.clone(), items.len());

        let bar = if self.show_progress {
            let bar = ProgressBar::new(items.len() as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
                    )
                    .unwrap()
                    .progress_chars("=>-"),
            );
            tracker = tracker.with_progress_bar(bar.clone());
            Some(bar)
        } else {
            None
        };
        let tracker = Arc::new(tracker);

        self.dispatch(items, shared.clone(), tracker.clone()).await;

        if let Some(bar) = bar {
            bar.finish_with_message("Completed");
        }

        // One more save so the file reflects the final state even if the
        // last per-entry save failed
        shared.save().await?;

        let summary = tracker.summary();
        info!(
            "translation completed: {} processed, {} skipped, {} newly translated, {} degraded",
            summary.processed,
            summary.skipped,
            summary.translated(),
            summary.degraded
        );
        Ok(summary)
    }

    /// Submit one task per entry to the worker pool and wait for all of
    /// them; results complete in any order.
    async fn dispatch(
        &self,
        items: Vec<WorkItem>,
        shared: Arc<SharedCatalog>,
        tracker: Arc<ProgressTracker>,
    ) {
        let semaphore = Arc::new(Semaphore::new(self.job.workers));
        let mut tasks = JoinSet::new();

        for item in items {
            let semaphore = semaphore.clone();
            let translator = self.translator.clone();
            let rotator = self.rotator.clone();
            let shared = shared.clone();
            let tracker = tracker.clone();
            let target_lang = self.job.target_lang.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.unwrap();

                if !item.needs_translation {
                    if let Err(e) = tracker.record(EntryDisposition::Skipped).await {
                        warn!("failed to save progress: {}", e);
                    }
                    return;
                }

                let credential = rotator.next();
                let outcome = translator
                    .translate(&item.msgid, &target_lang, &credential)
                    .await;

                let disposition = if outcome.is_degraded() {
                    EntryDisposition::Degraded
                } else {
                    EntryDisposition::Translated
                };

                if let Err(e) = shared.apply(&item.msgid, outcome.into_text()).await {
                    warn!("error processing entry: {}", e);
                }

                // Failures count as processed too, so a crashed entry is
                // not retried forever across runs
                if let Err(e) = tracker.record(disposition).await {
                    warn!("failed to save progress: {}", e);
                }
            });
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                warn!("worker task failed: {}", e);
            }
        }
    }
}
