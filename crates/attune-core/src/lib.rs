// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Attune companion engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Attune workspace. The transport,
//! generation, embedding, and persistence collaborators all implement
//! traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::AttuneError;
pub use types::{
    AdapterType, ChatMessage, ChatRole, DayPeriod, HealthStatus, InboundMessage,
    MemoryKind, MessageId, OutboundMessage, PresenceState, PromptMessage, PromptRole,
    SenderId, TemporalContext,
};

pub use traits::{
    ChannelAdapter, EmbeddingAdapter, PluginAdapter, ProviderAdapter, StorageAdapter,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct() {
        let _config = AttuneError::Config("test".into());
        let _storage = AttuneError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = AttuneError::Channel {
            message: "test".into(),
            source: None,
        };
        let _provider = AttuneError::Provider {
            message: "test".into(),
            source: None,
        };
        let _embedding = AttuneError::Embedding {
            message: "test".into(),
            source: None,
        };
        let _timeout = AttuneError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = AttuneError::Internal("test".into());
    }

    #[test]
    fn adapter_type_round_trip() {
        use std::str::FromStr;

        for variant in [
            AdapterType::Channel,
            AdapterType::Provider,
            AdapterType::Storage,
            AdapterType::Embedding,
        ] {
            let s = variant.to_string();
            assert_eq!(AdapterType::from_str(&s).unwrap(), variant);
        }
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // If any adapter trait module fails to compile or export, this
        // function itself won't compile.
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_channel_adapter<T: ChannelAdapter>() {}
        fn _assert_provider_adapter<T: ProviderAdapter>() {}
        fn _assert_embedding_adapter<T: EmbeddingAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
    }
}
