//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default chat-completions endpoint (OpenAI-compatible)
const DEFAULT_API_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default translation model
const DEFAULT_MODEL: &str = "gemma2-9b-it";

/// Configuration for the batch translator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    pub api_endpoint: String,
    pub model: String,
    pub max_workers: usize,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub timeout_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_workers: 4,
            max_retries: 3,
            retry_delay_secs: 60,
            timeout_ms: 30000,
        }
    }
}

impl TranslatorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let api_endpoint = std::env::var("API_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_API_ENDPOINT.to_string());

        let model = std::env::var("TRANSLATION_MODEL")
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let max_workers = std::env::var("MAX_WORKERS")
            .unwrap_or_else(|_| "4".to_string())
            .parse::<usize>()?;

        let max_retries = std::env::var("MAX_RETRIES")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u32>()?;

        let retry_delay_secs = std::env::var("RETRY_DELAY_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()?;

        let timeout_ms = std::env::var("REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".to_string())
            .parse::<u64>()?;

        Ok(Self {
            api_endpoint,
            model,
            max_workers,
            max_retries,
            retry_delay_secs,
            timeout_ms,
        })
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_endpoint.is_empty() {
            return Err(anyhow::anyhow!("API endpoint is required"));
        }

        if self.model.is_empty() {
            return Err(anyhow::anyhow!("Translation model is required"));
        }

        if self.max_workers == 0 {
            return Err(anyhow::anyhow!("max_workers must be greater than 0"));
        }

        if self.max_retries == 0 {
            return Err(anyhow::anyhow!("max_retries must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TranslatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_workers, 4);
        assert_eq!(config.retry_delay_secs, 60);
    }

    #[test]
    fn test_config_validation_rejects_zero_workers() {
        let config = TranslatorConfig {
            max_workers: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_empty_endpoint() {
        let config = TranslatorConfig {
            api_endpoint: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = TranslatorConfig {
            max_workers: 8,
            ..Default::default()
        };
        config.to_file(&path).unwrap();

        let loaded = TranslatorConfig::from_file(&path).unwrap();
        assert_eq!(loaded.max_workers, 8);
        assert_eq!(loaded.model, config.model);
    }
}
