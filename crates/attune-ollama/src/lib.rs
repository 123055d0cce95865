// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible inference collaborator.
//!
//! Speaks the `/v1/chat/completions` and `/v1/embeddings` wire formats
//! served by Ollama-style gateways. Generation walks an ordered model
//! fallback chain, rejecting gibberish output between models; embedding
//! retries with exponential backoff. Callers see a single error only when
//! every option is exhausted.

mod wire;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use attune_classify::is_gibberish;
use attune_config::InferenceConfig;
use attune_core::{
    AdapterType, AttuneError, EmbeddingAdapter, HealthStatus, PluginAdapter, PromptMessage,
    ProviderAdapter,
};
use tracing::{debug, warn};

use wire::{ChatRequest, ChatResponse, EmbeddingsRequest, EmbeddingsResponse, WireMessage};

struct ClientInner {
    http: reqwest::Client,
    cfg: InferenceConfig,
    embedding_model: String,
}

impl ClientInner {
    fn provider_err(message: impl Into<String>) -> AttuneError {
        AttuneError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// The primary model followed by the configured fallbacks, deduplicated.
    fn fallback_chain(&self, primary: &str) -> Vec<String> {
        let mut chain = vec![primary.to_string()];
        for model in &self.cfg.fallback_models {
            if !chain.contains(model) {
                chain.push(model.clone());
            }
        }
        chain
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let builder = self.http.post(url);
        match &self.cfg.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn chat_once(
        &self,
        messages: &[PromptMessage],
        model: &str,
        max_tokens: u32,
    ) -> Result<String, AttuneError> {
        let body = ChatRequest {
            model: model.to_string(),
            messages: messages.iter().map(WireMessage::from).collect(),
            max_tokens,
            temperature: self.cfg.temperature,
            stream: false,
        };

        let response = self
            .request(&self.cfg.chat_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AttuneError::Provider {
                message: format!("chat request to {model} failed"),
                source: Some(Box::new(e)),
            })?
            .error_for_status()
            .map_err(|e| AttuneError::Provider {
                message: format!("chat request to {model} rejected"),
                source: Some(Box::new(e)),
            })?
            .json::<ChatResponse>()
            .await
            .map_err(|e| AttuneError::Provider {
                message: "malformed chat response".to_string(),
                source: Some(Box::new(e)),
            })?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| Self::provider_err("chat response contained no choices"))
    }

    async fn embed_once(&self, text: &str) -> Result<Vec<f32>, AttuneError> {
        let body = EmbeddingsRequest {
            model: self.embedding_model.clone(),
            input: text.to_string(),
        };

        let response = self
            .request(&self.cfg.embedding_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AttuneError::Embedding {
                message: "embedding request failed".to_string(),
                source: Some(Box::new(e)),
            })?
            .error_for_status()
            .map_err(|e| AttuneError::Embedding {
                message: "embedding request rejected".to_string(),
                source: Some(Box::new(e)),
            })?
            .json::<EmbeddingsResponse>()
            .await
            .map_err(|e| AttuneError::Embedding {
                message: "malformed embeddings response".to_string(),
                source: Some(Box::new(e)),
            })?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AttuneError::Embedding {
                message: "embeddings response contained no vectors".to_string(),
                source: None,
            })
    }
}

/// Exponential backoff delay for a retry attempt (0-based).
pub fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    Duration::from_millis(base_ms.saturating_mul(1u64 << attempt.min(16)))
}

/// Generation collaborator.
#[derive(Clone)]
pub struct OllamaClient {
    inner: Arc<ClientInner>,
}

/// Embedding collaborator sharing the same HTTP client and config.
#[derive(Clone)]
pub struct OllamaEmbedder {
    inner: Arc<ClientInner>,
}

impl OllamaClient {
    /// Build the generation and embedding collaborators.
    pub fn new(cfg: InferenceConfig, embedding_model: String) -> (OllamaClient, OllamaEmbedder) {
        let inner = Arc::new(ClientInner {
            http: reqwest::Client::new(),
            cfg,
            embedding_model,
        });
        (
            OllamaClient {
                inner: Arc::clone(&inner),
            },
            OllamaEmbedder { inner },
        )
    }

    /// Visible for tests: the chain of models generation will walk.
    pub fn fallback_chain(&self, primary: &str) -> Vec<String> {
        self.inner.fallback_chain(primary)
    }
}

#[async_trait]
impl PluginAdapter for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, AttuneError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AttuneError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OllamaClient {
    /// Try the primary model, then each fallback in order.
    ///
    /// A model that errors or produces gibberish forfeits to the next one;
    /// only a fully exhausted chain surfaces an error to the caller.
    async fn generate(
        &self,
        messages: &[PromptMessage],
        model: &str,
        max_tokens: u32,
    ) -> Result<String, AttuneError> {
        let chain = self.inner.fallback_chain(model);
        let mut last_error: Option<AttuneError> = None;

        for candidate in &chain {
            debug!(model = %candidate, "trying generation model");
            match self.inner.chat_once(messages, candidate, max_tokens).await {
                Ok(text) if !text.is_empty() && !is_gibberish(&text) => {
                    debug!(model = %candidate, "generation succeeded");
                    return Ok(text);
                }
                Ok(_) => {
                    warn!(model = %candidate, "model returned gibberish, trying fallback");
                }
                Err(e) => {
                    warn!(model = %candidate, error = %e, "model failed, trying fallback");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| AttuneError::Provider {
            message: format!("all models in chain {chain:?} produced unusable output"),
            source: None,
        }))
    }
}

#[async_trait]
impl PluginAdapter for OllamaEmbedder {
    fn name(&self) -> &str {
        "ollama-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, AttuneError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AttuneError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for OllamaEmbedder {
    /// Embed with retry-and-backoff; the caller treats a final error as
    /// "no semantic memory available for this turn".
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AttuneError> {
        let retries = self.inner.cfg.max_retries.max(1);
        let mut last_error = None;

        for attempt in 0..retries {
            match self.inner.embed_once(text).await {
                Ok(vector) => return Ok(vector),
                Err(e) => {
                    let delay = backoff_delay(self.inner.cfg.retry_delay_ms, attempt);
                    warn!(
                        attempt = attempt + 1,
                        retries,
                        error = %e,
                        "embedding attempt failed"
                    );
                    last_error = Some(e);
                    if attempt + 1 < retries {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| AttuneError::Embedding {
            message: "embedding failed with no recorded error".to_string(),
            source: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg_with_fallbacks(fallbacks: &[&str]) -> InferenceConfig {
        InferenceConfig {
            fallback_models: fallbacks.iter().map(|s| s.to_string()).collect(),
            ..InferenceConfig::default()
        }
    }

    #[test]
    fn fallback_chain_starts_with_primary() {
        let (client, _) = OllamaClient::new(cfg_with_fallbacks(&["b", "c"]), "embed".into());
        assert_eq!(client.fallback_chain("a"), vec!["a", "b", "c"]);
    }

    #[test]
    fn fallback_chain_deduplicates_primary() {
        let (client, _) = OllamaClient::new(cfg_with_fallbacks(&["a", "b"]), "embed".into());
        assert_eq!(client.fallback_chain("a"), vec!["a", "b"]);
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(backoff_delay(2000, 0), Duration::from_millis(2000));
        assert_eq!(backoff_delay(2000, 1), Duration::from_millis(4000));
        assert_eq!(backoff_delay(2000, 2), Duration::from_millis(8000));
    }

    #[test]
    fn backoff_saturates_instead_of_overflowing() {
        let huge = backoff_delay(u64::MAX / 2, 3);
        assert_eq!(huge, Duration::from_millis(u64::MAX));
    }
}
