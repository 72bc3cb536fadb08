//! Core data models for translation

use serde::{Deserialize, Serialize};

use crate::core::errors::TranslationError;

/// Outcome of translating a single text.
///
/// A failed remote call never surfaces as an error to the dispatch loop;
/// instead the original text is carried forward as a degraded translation
/// together with the cause, so callers can tell the two apart without
/// inspecting string content.
#[derive(Debug)]
pub enum TranslationOutcome {
    /// The remote model produced a translation
    Translated(String),
    /// The original text, kept after retries were exhausted or a
    /// non-retryable failure occurred
    Degraded {
        text: String,
        cause: TranslationError,
    },
}

impl TranslationOutcome {
    /// The text to store in the catalog, translated or not
    pub fn text(&self) -> &str {
        match self {
            TranslationOutcome::Translated(text) => text,
            TranslationOutcome::Degraded { text, .. } => text,
        }
    }

    /// Consume the outcome, returning the text to store
    pub fn into_text(self) -> String {
        match self {
            TranslationOutcome::Translated(text) => text,
            TranslationOutcome::Degraded { text, .. } => text,
        }
    }

    /// Whether the remote call failed and the original text was kept
    pub fn is_degraded(&self) -> bool {
        matches!(self, TranslationOutcome::Degraded { .. })
    }
}

/// How a single dispatched entry was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDisposition {
    /// Entry already carried a non-empty translation; no remote call made
    Skipped,
    /// Entry received a freshly computed translation
    Translated,
    /// Remote call failed; entry keeps its original text
    Degraded,
}

/// One unit of work: a singular catalog entry identified by its msgid
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// Source text, which doubles as the entry identifier
    pub msgid: String,
    /// Whether the entry still lacks a non-empty translation
    pub needs_translation: bool,
}

/// Final counts for a completed run, derived from tracker state
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    pub degraded: usize,
}

impl RunSummary {
    /// Entries that received a fresh translation during this run
    pub fn translated(&self) -> usize {
        self.processed.saturating_sub(self.skipped + self.degraded)
    }
}

/// Translation statistics for a catalog on disk
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: usize,
    pub translated: usize,
    pub untranslated: usize,
    pub plural: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_text_accessors() {
        let ok = TranslationOutcome::Translated("Hola".to_string());
        assert_eq!(ok.text(), "Hola");
        assert!(!ok.is_degraded());

        let degraded = TranslationOutcome::Degraded {
            text: "Hello".to_string(),
            cause: TranslationError::RateLimited { retry_after: None },
        };
        assert_eq!(degraded.text(), "Hello");
        assert!(degraded.is_degraded());
        assert_eq!(degraded.into_text(), "Hello");
    }

    #[test]
    fn test_summary_translated_count() {
        let summary = RunSummary {
            total: 10,
            processed: 10,
            skipped: 4,
            degraded: 1,
        };
        assert_eq!(summary.translated(), 5);
    }

    #[test]
    fn test_summary_translated_never_underflows() {
        let summary = RunSummary {
            total: 2,
            processed: 1,
            skipped: 2,
            degraded: 0,
        };
        assert_eq!(summary.translated(), 0);
    }
}
