//! PO Batch Translator - concurrent LLM-backed catalog translation
//!
//! This library translates gettext PO/POT catalogs entry by entry through
//! an OpenAI-compatible chat-completions endpoint, rotating among a pool
//! of API credentials, with durable per-entry progress so interrupted runs
//! resume where they left off.

#![forbid(unsafe_code)]

pub mod cli;
pub mod core;

// Re-export key types for convenience
pub use crate::core::{
    catalog::SharedCatalog,
    client::{TranslationClient, Translator},
    config::TranslatorConfig,
    credentials::{Credential, CredentialRotator},
    errors::TranslationError,
    models::{CatalogStats, EntryDisposition, RunSummary, TranslationOutcome},
    progress::ProgressTracker,
    retry::RetryPolicy,
    runner::{JobConfig, JobRunner},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
