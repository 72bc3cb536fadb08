//! Catalog loading, resume merging, and the synchronized accessor
//!
//! PO parsing and serialization are delegated to `polib`; this module only
//! decides which entries are work and how translations flow back in.

use polib::catalog::Catalog;
use polib::message::{MessageMutView, MessageView};
use polib::po_file;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::errors::{Result, TranslationError};
use crate::core::models::{CatalogStats, WorkItem};

/// Load a PO/POT catalog from disk
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    po_file::parse(path).map_err(|e| TranslationError::Catalog {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Write a catalog to disk, replacing any previous file
pub fn write_catalog(catalog: &Catalog, path: &Path) -> Result<()> {
    po_file::write_to_file(catalog, path).map_err(|e| TranslationError::Catalog {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Copy every non-empty singular translation from a prior output catalog
/// into the freshly loaded source catalog, keyed by msgid.
///
/// Returns the number of translations carried forward. Running the job
/// again on its own output is a no-op for these entries.
pub fn merge_existing(target: &mut Catalog, existing: &Catalog) -> usize {
    let prior: HashMap<&str, &str> = existing
        .messages()
        .filter(|m| m.is_singular())
        .filter_map(|m| m.msgstr().ok().map(|s| (m.msgid(), s)))
        .filter(|(_, msgstr)| !msgstr.trim().is_empty())
        .collect();

    let mut applied = 0;
    for mut message in target.messages_mut() {
        if !message.is_singular() {
            continue;
        }
        let Some(msgstr) = prior.get(message.msgid()).map(|s| s.to_string()) else {
            continue;
        };
        if message.set_msgstr(msgstr).is_ok() {
            applied += 1;
        }
    }

    applied
}

/// Build the work list: one item per singular entry, flagged by whether it
/// still lacks a non-empty translation.
///
/// Plural entries are not dispatched; the remote call produces exactly one
/// string per request.
pub fn work_items(catalog: &Catalog) -> Vec<WorkItem> {
    catalog
        .messages()
        .filter(|m| m.is_singular())
        .map(|m| WorkItem {
            msgid: m.msgid().to_string(),
            needs_translation: m.msgstr().map(|s| s.trim().is_empty()).unwrap_or(false),
        })
        .collect()
}

/// Store a translation into the entry identified by msgid
pub fn apply_translation(catalog: &mut Catalog, msgid: &str, msgstr: String) -> Result<()> {
    for mut message in catalog.messages_mut() {
        if message.msgid() != msgid {
            continue;
        }
        return message
            .set_msgstr(msgstr)
            .map_err(|e| TranslationError::Entry {
                msgid: msgid.to_string(),
                message: e.to_string(),
            });
    }

    Err(TranslationError::Entry {
        msgid: msgid.to_string(),
        message: "not present in catalog".to_string(),
    })
}

/// Translation statistics for a catalog
pub fn catalog_stats(catalog: &Catalog) -> CatalogStats {
    let mut stats = CatalogStats::default();

    for message in catalog.messages() {
        stats.total += 1;
        if !message.is_singular() {
            stats.plural += 1;
            continue;
        }
        let translated = message.msgstr().map(|s| !s.trim().is_empty()).unwrap_or(false);
        if translated {
            stats.translated += 1;
        } else {
            stats.untranslated += 1;
        }
    }

    stats
}

/// Synchronized accessor for the catalog shared by all workers.
///
/// One lock guards both mutation and the full-catalog save, so every file
/// on disk is a consistent snapshot taken at lock acquisition. All disk
/// writes serialize on this lock.
pub struct SharedCatalog {
    inner: Mutex<Catalog>,
    output: PathBuf,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog, output: impl Into<PathBuf>) -> Self {
        Self {
            inner: Mutex::new(catalog),
            output: output.into(),
        }
    }

    /// Path the catalog is persisted to
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Store one translation under the shared lock
    pub async fn apply(&self, msgid: &str, msgstr: String) -> Result<()> {
        let mut catalog = self.inner.lock().await;
        apply_translation(&mut catalog, msgid, msgstr)
    }

    /// Persist the whole catalog under the shared lock
    pub async fn save(&self) -> Result<()> {
        let catalog = self.inner.lock().await;
        debug!("saving catalog to {}", self.output.display());
        write_catalog(&catalog, &self.output)
    }

    /// Statistics for the current in-memory state
    pub async fn stats(&self) -> CatalogStats {
        let catalog = self.inner.lock().await;
        catalog_stats(&catalog)
    }
}

/// Write a minimal PO file with the given (msgid, msgstr) entries.
/// Test fixture shared by the runner and progress tests.
#[cfg(test)]
pub(crate) fn write_po(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let mut contents = String::from(
        "msgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=UTF-8\\n\"\n\n",
    );
    for (msgid, msgstr) in entries {
        contents.push_str(&format!("msgid \"{msgid}\"\nmsgstr \"{msgstr}\"\n\n"));
    }
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Translations keyed by msgid, for test assertions
#[cfg(test)]
pub(crate) fn translations(catalog: &Catalog) -> HashMap<String, String> {
    catalog
        .messages()
        .filter(|m| m.is_singular())
        .map(|m| (m.msgid().to_string(), m.msgstr().unwrap().to_string()))
        .collect()
}
