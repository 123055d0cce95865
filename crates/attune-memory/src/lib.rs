// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-tier conversation memory for the Attune companion engine.
//!
//! ## Architecture
//!
//! - **MemoryManager**: per-user state map (short-term buffer, long-term
//!   summaries, emotional events, semantic entries, mood ring, tone,
//!   language, personality, relationship) with capped-size and time-decay
//!   policies and a debounced persistence queue
//! - **EmbeddingCache**: bounded FIFO hash-to-vector cache in front of the
//!   embedding collaborator
//! - **recall**: cosine similarity and weighted semantic search
//! - **mood**: recency-weighted mood-drift scoring
//! - **personality**: trait adaptation and relationship personas
//! - **followup**: emotional-event callback windows

pub mod embed_cache;
pub mod followup;
pub mod manager;
pub mod mood;
mod persist;
pub mod personality;
pub mod recall;
pub mod types;

pub use embed_cache::EmbeddingCache;
pub use followup::FollowUp;
pub use manager::MemoryManager;
pub use mood::{mood_drift, polarity, MoodDrift, MoodTrend};
pub use personality::persona_traits;
pub use recall::{cosine_similarity, find_similar, weight_for, RecalledMemory};
pub use types::{
    EmotionalEvent, LongTermSummary, MoodEntry, PersonalityProfile, RelationshipState,
    SemanticEntry, SenderMemory,
};
