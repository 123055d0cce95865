// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for config loading and validation.

use attune_config::{load_config_from_str, AttuneConfig, StorageBackend};

#[test]
fn empty_config_uses_defaults() {
    let config = load_config_from_str("").expect("empty config should load");
    assert_eq!(config.agent.name, "attune");
    assert_eq!(config.memory.max_short_term, 10);
    assert_eq!(config.memory.max_summaries, 5);
    assert_eq!(config.memory.max_emotional_events, 20);
    assert_eq!(config.memory.max_semantic, 10);
    assert_eq!(config.memory.tone_decay_hours, 48);
    assert_eq!(config.behavior.debounce_ms, 2000);
    assert_eq!(config.behavior.skip_response_threshold, 3);
    assert_eq!(config.behavior.recent_ids_cap, 500);
    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
}

#[test]
fn partial_section_keeps_other_defaults() {
    let config = load_config_from_str(
        r#"
        [memory]
        max_short_term = 20
        similarity_threshold = 0.65
        "#,
    )
    .unwrap();
    assert_eq!(config.memory.max_short_term, 20);
    assert!((config.memory.similarity_threshold - 0.65).abs() < f32::EPSILON);
    // Untouched fields keep defaults.
    assert_eq!(config.memory.max_summaries, 5);
    assert_eq!(config.behavior.min_reply_delay_ms, 1000);
}

#[test]
fn unknown_keys_are_rejected() {
    let result = load_config_from_str(
        r#"
        [memory]
        max_shortterm = 20
        "#,
    );
    assert!(result.is_err(), "typo'd key should be rejected");
}

#[test]
fn storage_backend_parses_lowercase() {
    let config = load_config_from_str(
        r#"
        [storage]
        backend = "json"
        path = "/tmp/attune-test.json"
        "#,
    )
    .unwrap();
    assert_eq!(config.storage.backend, StorageBackend::Json);
    assert_eq!(config.storage.path, "/tmp/attune-test.json");
}

#[test]
fn model_roles_override() {
    let config = load_config_from_str(
        r#"
        [models]
        coding = "qwen2.5-coder:7b"
        "#,
    )
    .unwrap();
    assert_eq!(config.models.coding, "qwen2.5-coder:7b");
    assert_eq!(config.models.summarization, "gemma3:1b-it-qat");
}

#[test]
fn validate_accepts_defaults() {
    let config = AttuneConfig::default();
    assert!(config.validate().is_ok());
}

#[test]
fn validate_rejects_bad_threshold() {
    let mut config = AttuneConfig::default();
    config.memory.similarity_threshold = 1.5;
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_inverted_delays() {
    let mut config = AttuneConfig::default();
    config.behavior.min_reply_delay_ms = 10_000;
    config.behavior.max_reply_delay_ms = 100;
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_zero_buffer() {
    let mut config = AttuneConfig::default();
    config.memory.max_short_term = 0;
    assert!(config.validate().is_err());
}
