//! Per-entry progress accounting and durable persistence

use indicatif::ProgressBar;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::core::catalog::SharedCatalog;
use crate::core::errors::Result;
use crate::core::models::{EntryDisposition, RunSummary};

/// Counts processed entries against a known total and persists the whole
/// catalog after every unit of work.
///
/// Saves go through the catalog's shared lock, so workers serialize on
/// disk writes; a run killed at any point leaves the last successful save
/// as a valid catalog.
pub struct ProgressTracker {
    catalog: Arc<SharedCatalog>,
    total: usize,
    processed: AtomicUsize,
    skipped: AtomicUsize,
    degraded: AtomicUsize,
    bar: Option<ProgressBar>,
}

impl ProgressTracker {
    pub fn new(catalog: Arc<SharedCatalog>, total: usize) -> Self {
        Self {
            catalog,
            total,
            processed: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            degraded: AtomicUsize::new(0),
            bar: None,
        }
    }

    /// Attach a progress bar advanced once per processed entry
    pub fn with_progress_bar(mut self, bar: ProgressBar) -> Self {
        self.bar = Some(bar);
        self
    }

    /// Record one completed unit of work and persist the catalog.
    ///
    /// Every dispatched entry is recorded exactly once, failures included,
    /// so an interrupted batch never loops on the same entry across runs.
    pub async fn record(&self, disposition: EntryDisposition) -> Result<()> {
        let processed = self.processed.fetch_add(1, Ordering::SeqCst) + 1;
        match disposition {
            EntryDisposition::Skipped => {
                self.skipped.fetch_add(1, Ordering::SeqCst);
            }
            EntryDisposition::Degraded => {
                self.degraded.fetch_add(1, Ordering::SeqCst);
            }
            EntryDisposition::Translated => {}
        }

        if let Some(bar) = &self.bar {
            bar.inc(1);
        } else {
            info!(
                "progress: {}/{} entries processed ({:.1}%)",
                processed,
                self.total,
                self.percent_complete()
            );
        }

        self.catalog.save().await
    }

    /// Fraction of the total processed so far, as a percentage
    pub fn percent_complete(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.processed.load(Ordering::SeqCst) as f64 / self.total as f64 * 100.0
    }

    /// Snapshot of the current counters
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total: self.total,
            processed: self.processed.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::SeqCst),
            degraded: self.degraded.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{load_catalog, write_po, SharedCatalog};

    fn tracker_over(dir: &std::path::Path, total: usize) -> (ProgressTracker, std::path::PathBuf) {
        let entries: Vec<(String, String)> = (0..total)
            .map(|i| (format!("msg-{i}"), String::new()))
            .collect();
        let borrowed: Vec<(&str, &str)> = entries
            .iter()
            .map(|(a, b)| (a.as_str(), b.as_str()))
            .collect();
        let source = write_po(dir, "base.pot", &borrowed);
        let catalog = load_catalog(&source).unwrap();
        let output = dir.join("out.po");
        let shared = Arc::new(SharedCatalog::new(catalog, &output));
        (ProgressTracker::new(shared, total), output)
    }

    #[tokio::test]
    async fn test_record_counts_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let (tracker, output) = tracker_over(dir.path(), 4);

        tracker.record(EntryDisposition::Translated).await.unwrap();
        tracker.record(EntryDisposition::Skipped).await.unwrap();
        tracker.record(EntryDisposition::Degraded).await.unwrap();

        let summary = tracker.summary();
        assert_eq!(summary.processed, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.degraded, 1);
        assert_eq!(summary.translated(), 1);

        // Each record persisted the catalog
        assert!(load_catalog(&output).is_ok());
    }

    #[tokio::test]
    async fn test_percent_complete() {
        let dir = tempfile::tempdir().unwrap();
        let (tracker, _) = tracker_over(dir.path(), 4);

        assert_eq!(tracker.percent_complete(), 0.0);
        tracker.record(EntryDisposition::Translated).await.unwrap();
        assert_eq!(tracker.percent_complete(), 25.0);
    }

    #[tokio::test]
    async fn test_percent_complete_with_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let (tracker, _) = tracker_over(dir.path(), 0);
        assert_eq!(tracker.percent_complete(), 100.0);
    }
}
