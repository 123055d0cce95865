// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter that records everything the engine sends.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use attune_core::{
    AdapterType, AttuneError, ChannelAdapter, HealthStatus, InboundMessage, MessageId,
    OutboundMessage, PluginAdapter, PresenceState, SenderId,
};

/// A channel adapter backed by in-process queues.
///
/// Tests push inbound messages with [`MockChannel::push_inbound`] and
/// inspect what the engine delivered via the recorded vectors.
pub struct MockChannel {
    inbound_tx: mpsc::UnboundedSender<InboundMessage>,
    inbound_rx: Mutex<mpsc::UnboundedReceiver<InboundMessage>>,
    pub sent: Arc<Mutex<Vec<OutboundMessage>>>,
    pub presence: Arc<Mutex<Vec<(SenderId, PresenceState)>>>,
    pub read_marks: Arc<Mutex<Vec<(SenderId, MessageId)>>>,
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChannel {
    pub fn new() -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        Self {
            inbound_tx,
            inbound_rx: Mutex::new(inbound_rx),
            sent: Arc::new(Mutex::new(Vec::new())),
            presence: Arc::new(Mutex::new(Vec::new())),
            read_marks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Inject an inbound message as if the platform delivered it.
    pub fn push_inbound(&self, msg: InboundMessage) {
        let _ = self.inbound_tx.send(msg);
    }

    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, AttuneError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AttuneError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), AttuneError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, AttuneError> {
        self.sent.lock().await.push(msg);
        Ok(MessageId(uuid::Uuid::new_v4().to_string()))
    }

    async fn send_presence(
        &self,
        sender: &SenderId,
        state: PresenceState,
    ) -> Result<(), AttuneError> {
        self.presence.lock().await.push((sender.clone(), state));
        Ok(())
    }

    async fn mark_read(&self, sender: &SenderId, id: &MessageId) -> Result<(), AttuneError> {
        self.read_marks
            .lock()
            .await
            .push((sender.clone(), id.clone()));
        Ok(())
    }

    async fn receive(&self) -> Result<InboundMessage, AttuneError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| AttuneError::Channel {
            message: "mock channel closed".to_string(),
            source: None,
        })
    }
}
