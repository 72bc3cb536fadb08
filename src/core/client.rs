//! Async translation client with retry and degradation logic

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::config::TranslatorConfig;
use crate::core::credentials::Credential;
use crate::core::errors::{is_rate_limit_message, Result, TranslationError};
use crate::core::models::TranslationOutcome;
use crate::core::retry::RetryPolicy;

/// Translation seam for the job runner; implemented by the HTTP client
/// and by mocks in tests.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate one text into the target language using the given
    /// credential. Never fails: a degraded outcome carries the original
    /// text plus the cause.
    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        credential: &Credential,
    ) -> TranslationOutcome;
}

/// Build the fixed instruction prompt for the remote model.
///
/// The model must return only the translation, matching the source
/// formatting, so the response can be stored in the catalog verbatim.
fn system_prompt(target_lang: &str) -> String {
    format!(
        "You are a translation assistant. Translate the text to {target_lang} with these rules:\n\
         Provide ONLY the translation\n\
         No greetings, no questions, no explanations\n\
         No additional words or sentences before/after translation\n\
         Match the original text's exact formatting\n\
         No suggestions or alternatives\n\
         No confirmation questions\n\
         No 'Here's the translation' type phrases"
    )
}

/// HTTP translation client for an OpenAI-compatible chat-completions
/// endpoint, one request per attempt with bounded rate-limit retries.
#[derive(Debug, Clone)]
pub struct TranslationClient {
    client: reqwest::Client,
    config: Arc<TranslatorConfig>,
    retry: RetryPolicy,
}

impl TranslationClient {
    /// Create a new translation client
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        config.validate()?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()?;

        let retry = RetryPolicy::fixed(
            config.max_retries,
            Duration::from_secs(config.retry_delay_secs),
        );

        Ok(Self {
            client,
            config: Arc::new(config),
            retry,
        })
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        let config = TranslatorConfig::from_env()?;
        Self::new(config)
    }

    /// Send one chat-completions request
    async fn send_request(
        &self,
        text: &str,
        target_lang: &str,
        credential: &Credential,
    ) -> Result<String> {
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "system",
                    "content": system_prompt(target_lang)
                },
                {
                    "role": "user",
                    "content": text
                }
            ]
        });

        let response = self
            .client
            .post(&self.config.api_endpoint)
            .header("Authorization", format!("Bearer {}", credential.expose()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslationError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();

        if status.is_success() {
            let json: serde_json::Value =
                response
                    .json()
                    .await
                    .map_err(|e| TranslationError::InvalidResponse {
                        message: e.to_string(),
                    })?;

            let translation = json["choices"]
                .get(0)
                .and_then(|c| c["message"]["content"].as_str())
                .ok_or_else(|| TranslationError::InvalidResponse {
                    message: "no translation in response".to_string(),
                })?
                .trim()
                .to_string();

            Ok(translation)
        } else {
            let status_code = status.as_u16();
            let error_text = response.text().await.unwrap_or_default();

            if status_code == 429 || is_rate_limit_message(&error_text) {
                return Err(TranslationError::RateLimited { retry_after: None });
            }

            Err(TranslationError::Api {
                status: status_code,
                message: error_text,
            })
        }
    }
}

#[async_trait]
impl Translator for TranslationClient {
    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        credential: &Credential,
    ) -> TranslationOutcome {
        debug!("translating {} chars to {}", text.len(), target_lang);

        let result = self
            .retry
            .run(|_| self.send_request(text, target_lang, credential))
            .await;

        match result {
            Ok(translation) => TranslationOutcome::Translated(translation),
            Err(cause) => {
                warn!("translation failed, keeping original text: {}", cause);
                TranslationOutcome::Degraded {
                    text: text.to_string(),
                    cause,
                }
            }
        }
    }
}
