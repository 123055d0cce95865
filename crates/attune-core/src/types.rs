// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Attune engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Opaque stable identifier for a user on the messaging channel.
///
/// All per-user memory is keyed by this value. The engine never inspects
/// its structure; the transport decides what it contains (a phone JID, a
/// chat id, a username).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SenderId(pub String);

impl SenderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SenderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SenderId {
    fn from(s: &str) -> Self {
        SenderId(s.to_string())
    }
}

/// Unique identifier for a transport message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a message in the short-term conversation buffer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry in a user's short-term conversation buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Role of a message sent to the generation provider.
///
/// Distinct from [`ChatRole`]: prompt assembly injects a system message
/// that is never part of the persisted conversation buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

impl From<ChatRole> for PromptRole {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::User => PromptRole::User,
            ChatRole::Assistant => PromptRole::Assistant,
        }
    }
}

/// One message in a generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: PromptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// An inbound message received from a channel adapter.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub sender: SenderId,
    pub text: String,
    pub message_id: MessageId,
    /// Text of the message this one replies to, when the platform supports quoting.
    pub quoted_text: Option<String>,
}

/// An outbound message to be delivered via a channel adapter.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub sender: SenderId,
    pub text: String,
}

/// Presence state shown to the remote user while a reply is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PresenceState {
    Composing,
    Available,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter behind a [`crate::traits::PluginAdapter`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Provider,
    Storage,
    Embedding,
}

/// The kinds of per-user memory a storage adapter persists.
///
/// List kinds (`Chat` through `Mood`) use append-with-cap semantics;
/// singleton kinds (`Tone` through `Relationship`) hold one value per user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    Chat,
    Summary,
    EmotionalEvent,
    Semantic,
    Mood,
    Tone,
    Language,
    Personality,
    Relationship,
}

impl MemoryKind {
    /// All kinds, in a stable order. Used by storage backends to enumerate state.
    pub const ALL: [MemoryKind; 9] = [
        MemoryKind::Chat,
        MemoryKind::Summary,
        MemoryKind::EmotionalEvent,
        MemoryKind::Semantic,
        MemoryKind::Mood,
        MemoryKind::Tone,
        MemoryKind::Language,
        MemoryKind::Personality,
        MemoryKind::Relationship,
    ];

    /// Whether this kind holds an ordered list (as opposed to a singleton value).
    pub fn is_list(self) -> bool {
        matches!(
            self,
            MemoryKind::Chat
                | MemoryKind::Summary
                | MemoryKind::EmotionalEvent
                | MemoryKind::Semantic
                | MemoryKind::Mood
        )
    }
}

/// Time-of-day period used for temporal routing and prompt hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Evening,
    LateNight,
}

/// Ambient temporal context for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalContext {
    /// Local hour of day, 0-23.
    pub hour: u32,
    pub period: DayPeriod,
    pub weekend: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn sender_id_display_and_eq() {
        let a = SenderId::from("user-1");
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "user-1");
    }

    #[test]
    fn chat_role_round_trips() {
        for role in [ChatRole::User, ChatRole::Assistant] {
            let s = role.to_string();
            assert_eq!(ChatRole::from_str(&s).unwrap(), role);
        }
    }

    #[test]
    fn chat_message_constructors() {
        let m = ChatMessage::user("hello");
        assert_eq!(m.role, ChatRole::User);
        let m = ChatMessage::assistant("hi");
        assert_eq!(m.role, ChatRole::Assistant);
    }

    #[test]
    fn memory_kind_list_partition() {
        let lists = MemoryKind::ALL.iter().filter(|k| k.is_list()).count();
        assert_eq!(lists, 5);
        assert!(!MemoryKind::Tone.is_list());
        assert!(MemoryKind::Chat.is_list());
    }

    #[test]
    fn memory_kind_serialization() {
        let json = serde_json::to_string(&MemoryKind::EmotionalEvent).unwrap();
        assert_eq!(json, "\"emotional_event\"");
        let parsed: MemoryKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MemoryKind::EmotionalEvent);
    }

    #[test]
    fn prompt_role_from_chat_role() {
        assert_eq!(PromptRole::from(ChatRole::User), PromptRole::User);
        assert_eq!(PromptRole::from(ChatRole::Assistant), PromptRole::Assistant);
    }
}
