// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory domain types.
//!
//! Every persisted record is a typed struct with explicit serde defaults:
//! missing or unknown fields in stored data deserialize to defaults rather
//! than propagating silently.

use std::collections::VecDeque;

use attune_classify::{Emotion, EventKind, Intensity, Language, RelationshipKind, Tone};
use attune_core::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One compressed snapshot of a stretch of conversation.
///
/// Append-only: summaries are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongTermSummary {
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}

/// A memorable emotional milestone in the relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalEvent {
    pub emotion: Emotion,
    pub kind: EventKind,
    pub intensity: Intensity,
    pub trigger: String,
    /// Short excerpt of what the user said.
    pub snippet: String,
    pub timestamp: DateTime<Utc>,
    /// Flips false -> true exactly once when a follow-up surfaces; never reverts.
    #[serde(default)]
    pub followed_up: bool,
}

/// A vector-indexed utterance for similarity-based recall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticEntry {
    pub text: String,
    pub embedding: Vec<f32>,
    pub emotion: Emotion,
    /// Free-form context note (detected intent, tone) captured at write time.
    #[serde(default)]
    pub context: String,
    /// Ranking weight assigned at write time from the emotion; never recomputed.
    pub weight: f32,
    pub timestamp: DateTime<Utc>,
}

/// One entry in the mood history ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub emotion: Emotion,
    pub timestamp: DateTime<Utc>,
}

/// Named personality traits, each in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    pub curiosity: f32,
    pub empathy: f32,
    pub humor: f32,
    pub flirtiness: f32,
    pub logic: f32,
    pub playfulness: f32,
}

impl Default for PersonalityProfile {
    fn default() -> Self {
        Self {
            curiosity: 0.7,
            empathy: 0.8,
            humor: 0.6,
            flirtiness: 0.3,
            logic: 0.7,
            playfulness: 0.5,
        }
    }
}

impl PersonalityProfile {
    /// Linear interpolation toward `other` by `influence` in [0, 1].
    pub fn blend(&self, other: &PersonalityProfile, influence: f32) -> PersonalityProfile {
        let lerp = |a: f32, b: f32| (a * (1.0 - influence) + b * influence).clamp(0.0, 1.0);
        PersonalityProfile {
            curiosity: lerp(self.curiosity, other.curiosity),
            empathy: lerp(self.empathy, other.empathy),
            humor: lerp(self.humor, other.humor),
            flirtiness: lerp(self.flirtiness, other.flirtiness),
            logic: lerp(self.logic, other.logic),
            playfulness: lerp(self.playfulness, other.playfulness),
        }
    }

    /// Names of traits currently above 0.7, for prompt context.
    pub fn dominant_traits(&self) -> Vec<&'static str> {
        let mut traits = Vec::new();
        for (name, value) in [
            ("curiosity", self.curiosity),
            ("empathy", self.empathy),
            ("humor", self.humor),
            ("flirtiness", self.flirtiness),
            ("logic", self.logic),
            ("playfulness", self.playfulness),
        ] {
            if value > 0.7 {
                traits.push(name);
            }
        }
        traits
    }
}

/// The relationship persona a user has settled into, with staleness tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipState {
    pub kind: RelationshipKind,
    pub confidence: f32,
    pub updated_at: DateTime<Utc>,
}

/// All memory tiers for a single user.
#[derive(Debug, Clone)]
pub struct SenderMemory {
    pub chat: VecDeque<ChatMessage>,
    pub summaries: VecDeque<LongTermSummary>,
    pub events: Vec<EmotionalEvent>,
    pub semantic: VecDeque<SemanticEntry>,
    pub mood: VecDeque<MoodEntry>,
    pub tone: Tone,
    pub language: Language,
    pub personality: PersonalityProfile,
    pub relationship: Option<RelationshipState>,
}

impl Default for SenderMemory {
    fn default() -> Self {
        Self {
            chat: VecDeque::new(),
            summaries: VecDeque::new(),
            events: Vec::new(),
            semantic: VecDeque::new(),
            mood: VecDeque::new(),
            tone: Tone::Neutral,
            language: Language::Mixed,
            personality: PersonalityProfile::default(),
            relationship: None,
        }
    }
}

/// Push onto a ring and evict oldest-first down to `cap`.
///
/// Idempotent with respect to capping: the ring never exceeds `cap` no
/// matter how many times this is called.
pub(crate) fn push_capped<T>(ring: &mut VecDeque<T>, item: T, cap: usize) {
    ring.push_back(item);
    while ring.len() > cap {
        ring.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_capped_evicts_oldest_first() {
        let mut ring = VecDeque::new();
        for i in 0..5 {
            push_capped(&mut ring, i, 3);
        }
        assert_eq!(ring, VecDeque::from([2, 3, 4]));
    }

    #[test]
    fn default_personality_matches_seed_values() {
        let p = PersonalityProfile::default();
        assert!((p.empathy - 0.8).abs() < f32::EPSILON);
        assert!((p.flirtiness - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn blend_is_bounded() {
        let a = PersonalityProfile::default();
        let b = PersonalityProfile {
            curiosity: 1.0,
            empathy: 1.0,
            humor: 1.0,
            flirtiness: 1.0,
            logic: 1.0,
            playfulness: 1.0,
        };
        let blended = a.blend(&b, 0.3);
        assert!(blended.empathy > a.empathy);
        assert!(blended.empathy <= 1.0);
        // Zero influence keeps the base profile.
        let same = a.blend(&b, 0.0);
        assert_eq!(same, a);
    }

    #[test]
    fn dominant_traits_above_threshold() {
        let p = PersonalityProfile::default();
        let traits = p.dominant_traits();
        assert!(traits.contains(&"empathy"));
        assert!(!traits.contains(&"flirtiness"));
    }

    #[test]
    fn emotional_event_followed_up_defaults_false() {
        let json = serde_json::json!({
            "emotion": "sad",
            "kind": "distress",
            "intensity": "high",
            "trigger": "major life event",
            "snippet": "i lost my job",
            "timestamp": "2026-03-01T00:00:00Z"
        });
        let event: EmotionalEvent = serde_json::from_value(json).unwrap();
        assert!(!event.followed_up);
    }

    #[test]
    fn semantic_entry_round_trips() {
        let entry = SemanticEntry {
            text: "i lost my job".into(),
            embedding: vec![0.1, 0.2, 0.3],
            emotion: Emotion::Sad,
            context: "intent=emotional".into(),
            weight: 1.0,
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        let back: SemanticEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back, entry);
    }
}
