// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation provider for deterministic testing.
//!
//! Responses are popped from a FIFO queue; when the queue is empty a
//! default text is returned. Failures can be injected per call.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use attune_core::{
    AdapterType, AttuneError, HealthStatus, PluginAdapter, PromptMessage, ProviderAdapter,
};

/// One recorded generation call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub messages: Vec<PromptMessage>,
    pub max_tokens: u32,
}

/// A mock provider that returns pre-configured responses and records
/// every request it receives.
#[derive(Clone, Default)]
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider pre-loaded with successful responses.
    pub fn with_responses(responses: Vec<&str>) -> Self {
        let queue: VecDeque<Result<String, String>> = responses
            .into_iter()
            .map(|r| Ok(r.to_string()))
            .collect();
        Self {
            responses: Arc::new(Mutex::new(queue)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful response.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(Ok(text.into()));
    }

    /// Queue a failure.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.responses.lock().await.push_back(Err(message.into()));
    }

    /// All requests seen so far.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
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
impl ProviderAdapter for MockProvider {
    async fn generate(
        &self,
        messages: &[PromptMessage],
        model: &str,
        max_tokens: u32,
    ) -> Result<String, AttuneError> {
        self.requests.lock().await.push(RecordedRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            max_tokens,
        });

        match self.responses.lock().await.pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(AttuneError::Provider {
                message,
                source: None,
            }),
            None => Ok("mock reply".to_string()),
        }
    }
}
