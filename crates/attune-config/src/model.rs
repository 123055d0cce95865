// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Attune companion engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup. Every field has a compiled default, so an empty
//! config file (or none at all) is valid.

use serde::{Deserialize, Serialize};

/// Top-level Attune configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment
/// variable overrides. All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AttuneConfig {
    /// Agent identity and persona settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Inference endpoint settings (generation + embeddings).
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Model name per generation role.
    #[serde(default)]
    pub models: ModelRolesConfig,

    /// Memory caps, thresholds, and decay settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Message-flow behavior: debounce, reply delays, suppression.
    #[serde(default)]
    pub behavior: BehaviorConfig,

    /// Persistence backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AttuneConfig {
    /// Validates cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), attune_core::AttuneError> {
        let mut problems = Vec::new();

        if !(0.0..=1.0).contains(&self.memory.similarity_threshold) {
            problems.push(format!(
                "memory.similarity_threshold must be in [0, 1], got {}",
                self.memory.similarity_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.memory.personality_adaptation_rate) {
            problems.push(format!(
                "memory.personality_adaptation_rate must be in [0, 1], got {}",
                self.memory.personality_adaptation_rate
            ));
        }
        if self.memory.max_short_term == 0 {
            problems.push("memory.max_short_term must be at least 1".to_string());
        }
        if self.behavior.min_reply_delay_ms > self.behavior.max_reply_delay_ms {
            problems.push(format!(
                "behavior.min_reply_delay_ms ({}) exceeds max_reply_delay_ms ({})",
                self.behavior.min_reply_delay_ms, self.behavior.max_reply_delay_ms
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(attune_core::AttuneError::Config(problems.join("; ")))
        }
    }
}

/// Agent identity and persona configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Base persona text prepended to every system prompt.
    #[serde(default = "default_persona")]
    pub persona: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            persona: default_persona(),
        }
    }
}

fn default_agent_name() -> String {
    "attune".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_persona() -> String {
    "you are a warm, empathetic companion who genuinely cares. you text like \
     a real human: lowercase, conversational, emotionally intelligent. keep \
     replies short (1-3 sentences) and natural."
        .to_string()
}

/// Inference endpoint configuration.
///
/// Both endpoints speak the OpenAI-compatible wire format.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceConfig {
    /// Chat completions endpoint URL.
    #[serde(default = "default_chat_url")]
    pub chat_url: String,

    /// Embeddings endpoint URL.
    #[serde(default = "default_embedding_url")]
    pub embedding_url: String,

    /// Bearer token for the inference endpoints. `None` sends no auth header.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Maximum tokens to generate per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature for replies.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Retry attempts per model before moving to the next fallback.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial retry backoff in milliseconds (doubles per attempt).
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Ordered fallback models tried when the selected model fails.
    #[serde(default = "default_fallback_models")]
    pub fallback_models: Vec<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            chat_url: default_chat_url(),
            embedding_url: default_embedding_url(),
            api_key: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            fallback_models: default_fallback_models(),
        }
    }
}

fn default_chat_url() -> String {
    "http://localhost:11434/v1/chat/completions".to_string()
}

fn default_embedding_url() -> String {
    "http://localhost:11434/v1/embeddings".to_string()
}

fn default_max_tokens() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.8
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    2000
}

fn default_fallback_models() -> Vec<String> {
    vec![
        "phi3:3.8b".to_string(),
        "gemma3:4b-it-qat".to_string(),
        "llama3.2:latest".to_string(),
    ]
}

/// Model name per generation role.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelRolesConfig {
    #[serde(default = "default_chat_model")]
    pub factual: String,
    #[serde(default = "default_chat_model")]
    pub emotional: String,
    #[serde(default = "default_chat_model")]
    pub creative: String,
    #[serde(default = "default_chat_model")]
    pub coding: String,
    #[serde(default = "default_summarization_model")]
    pub summarization: String,
    #[serde(default = "default_embedding_model")]
    pub embedding: String,
}

impl Default for ModelRolesConfig {
    fn default() -> Self {
        Self {
            factual: default_chat_model(),
            emotional: default_chat_model(),
            creative: default_chat_model(),
            coding: default_chat_model(),
            summarization: default_summarization_model(),
            embedding: default_embedding_model(),
        }
    }
}

fn default_chat_model() -> String {
    "gemma3:4b-it-qat".to_string()
}

fn default_summarization_model() -> String {
    "gemma3:1b-it-qat".to_string()
}

fn default_embedding_model() -> String {
    "all-minilm-l6-v2".to_string()
}

/// Memory caps, thresholds, and decay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Short-term conversation buffer cap per user.
    #[serde(default = "default_max_short_term")]
    pub max_short_term: usize,

    /// Long-term summary cap per user.
    #[serde(default = "default_max_summaries")]
    pub max_summaries: usize,

    /// Emotional event cap per user.
    #[serde(default = "default_max_emotional_events")]
    pub max_emotional_events: usize,

    /// Semantic memory entry cap per user.
    #[serde(default = "default_max_semantic")]
    pub max_semantic: usize,

    /// Mood history ring cap per user.
    #[serde(default = "default_max_mood_entries")]
    pub max_mood_entries: usize,

    /// Buffer length at which the short-term buffer is compressed into a
    /// long-term summary. Only reachable when `max_short_term` is
    /// configured above this value.
    #[serde(default = "default_compression_threshold")]
    pub compression_threshold: usize,

    /// How many recent messages survive in the buffer after compression.
    #[serde(default = "default_compression_keep")]
    pub compression_keep: usize,

    /// Minimum cosine similarity for semantic recall.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Hours of inactivity after which conversation tone fades to neutral.
    #[serde(default = "default_tone_decay_hours")]
    pub tone_decay_hours: i64,

    /// Days after which the relationship type is recomputed.
    #[serde(default = "default_relationship_stale_days")]
    pub relationship_stale_days: i64,

    /// Exponential smoothing rate for personality adaptation.
    #[serde(default = "default_personality_adaptation_rate")]
    pub personality_adaptation_rate: f32,

    /// Debounce interval for the coalesced persistence flush, in milliseconds.
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,

    /// Embedding cache capacity (entries).
    #[serde(default = "default_embed_cache_cap")]
    pub embed_cache_cap: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_short_term: default_max_short_term(),
            max_summaries: default_max_summaries(),
            max_emotional_events: default_max_emotional_events(),
            max_semantic: default_max_semantic(),
            max_mood_entries: default_max_mood_entries(),
            compression_threshold: default_compression_threshold(),
            compression_keep: default_compression_keep(),
            similarity_threshold: default_similarity_threshold(),
            tone_decay_hours: default_tone_decay_hours(),
            relationship_stale_days: default_relationship_stale_days(),
            personality_adaptation_rate: default_personality_adaptation_rate(),
            save_debounce_ms: default_save_debounce_ms(),
            embed_cache_cap: default_embed_cache_cap(),
        }
    }
}

fn default_max_short_term() -> usize {
    10
}

fn default_max_summaries() -> usize {
    5
}

fn default_max_emotional_events() -> usize {
    20
}

fn default_max_semantic() -> usize {
    10
}

fn default_max_mood_entries() -> usize {
    20
}

fn default_compression_threshold() -> usize {
    15
}

fn default_compression_keep() -> usize {
    10
}

fn default_similarity_threshold() -> f32 {
    0.70
}

fn default_tone_decay_hours() -> i64 {
    48
}

fn default_relationship_stale_days() -> i64 {
    7
}

fn default_personality_adaptation_rate() -> f32 {
    0.1
}

fn default_save_debounce_ms() -> u64 {
    5000
}

fn default_embed_cache_cap() -> usize {
    1000
}

/// Message-flow behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BehaviorConfig {
    /// Quiet period after the last message fragment before a burst is
    /// processed, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Floor for the humanized reply delay, in milliseconds.
    #[serde(default = "default_min_reply_delay_ms")]
    pub min_reply_delay_ms: u64,

    /// Ceiling for the humanized reply delay, in milliseconds.
    #[serde(default = "default_max_reply_delay_ms")]
    pub max_reply_delay_ms: u64,

    /// Per-character contribution to the reply delay, in milliseconds.
    #[serde(default = "default_reply_delay_per_char_ms")]
    pub reply_delay_per_char_ms: u64,

    /// Upper bound of the random jitter added to the reply delay, in milliseconds.
    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,

    /// Consecutive trivial messages ("ok", "hmm") after which replies are suppressed.
    #[serde(default = "default_skip_response_threshold")]
    pub skip_response_threshold: u32,

    /// Size of the recently-processed message id window for deduplication.
    #[serde(default = "default_recent_ids_cap")]
    pub recent_ids_cap: usize,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_reply_delay_ms: default_min_reply_delay_ms(),
            max_reply_delay_ms: default_max_reply_delay_ms(),
            reply_delay_per_char_ms: default_reply_delay_per_char_ms(),
            max_jitter_ms: default_max_jitter_ms(),
            skip_response_threshold: default_skip_response_threshold(),
            recent_ids_cap: default_recent_ids_cap(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    2000
}

fn default_min_reply_delay_ms() -> u64 {
    1000
}

fn default_max_reply_delay_ms() -> u64 {
    6000
}

fn default_reply_delay_per_char_ms() -> u64 {
    50
}

fn default_max_jitter_ms() -> u64 {
    1000
}

fn default_skip_response_threshold() -> u32 {
    3
}

fn default_recent_ids_cap() -> usize {
    500
}

/// Which persistence backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Ephemeral in-process storage. State is lost on exit.
    Memory,
    /// Single JSON flat file.
    Json,
    /// Embedded SQLite database.
    Sqlite,
}

/// Persistence backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Backend selection.
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    /// Path to the backing file (JSON file or SQLite database).
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_storage_path(),
        }
    }
}

fn default_backend() -> StorageBackend {
    StorageBackend::Sqlite
}

fn default_storage_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("attune").join("attune.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("attune.db"))
        .to_string_lossy()
        .into_owned()
}
