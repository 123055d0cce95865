// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for messaging transport integrations.

use async_trait::async_trait;

use crate::error::AttuneError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundMessage, MessageId, OutboundMessage, PresenceState, SenderId};

/// Adapter for a bidirectional messaging transport.
///
/// Channel adapters own the connection lifecycle (auth, reconnection,
/// backoff) entirely; the engine only sends, receives, and updates presence
/// through this seam.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), AttuneError>;

    /// Delivers a message to the remote user.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, AttuneError>;

    /// Updates the presence shown to a user (typing indicator, available).
    async fn send_presence(
        &self,
        sender: &SenderId,
        state: PresenceState,
    ) -> Result<(), AttuneError>;

    /// Marks an inbound message as read.
    async fn mark_read(&self, sender: &SenderId, id: &MessageId) -> Result<(), AttuneError>;

    /// Receives the next inbound message from the channel.
    async fn receive(&self) -> Result<InboundMessage, AttuneError>;
}
