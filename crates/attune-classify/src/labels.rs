// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Categorical labels produced by the classifier bank.
//!
//! All labels serialize as lowercase strings so persisted records stay
//! readable and backend-agnostic.

use serde::{Deserialize, Serialize};
use strum::Display;

/// What the user is trying to do with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Question,
    Command,
    Emotional,
    Technical,
    Smalltalk,
    Casual,
}

/// Emotional register detected in a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Excited,
    Happy,
    Sad,
    Frustrated,
    Anxious,
    Flirty,
    Neutral,
}

/// Overall conversational tone, derived from recent history plus the latest message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Playful,
    Serious,
    Flirty,
    Emotional,
    Sarcastic,
    Neutral,
}

/// Dominant language of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Indonesian,
    Mixed,
}

/// Category of a memorable emotional event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Distress,
    Celebration,
    Vulnerability,
    Intimate,
    Conflict,
}

/// How strongly an emotional event registered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

/// The relationship persona a user has settled into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Romantic,
    Friend,
    Counselor,
    Mentor,
    Companion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Intent::Question).unwrap(), "\"question\"");
        assert_eq!(serde_json::to_string(&Emotion::Flirty).unwrap(), "\"flirty\"");
        assert_eq!(serde_json::to_string(&Tone::Sarcastic).unwrap(), "\"sarcastic\"");
        assert_eq!(serde_json::to_string(&Language::Mixed).unwrap(), "\"mixed\"");
        assert_eq!(serde_json::to_string(&EventKind::Distress).unwrap(), "\"distress\"");
        assert_eq!(
            serde_json::to_string(&RelationshipKind::Counselor).unwrap(),
            "\"counselor\""
        );
    }

    #[test]
    fn intensity_orders_low_to_high() {
        assert!(Intensity::Low < Intensity::Medium);
        assert!(Intensity::Medium < Intensity::High);
    }

    #[test]
    fn display_matches_serde() {
        assert_eq!(Emotion::Neutral.to_string(), "neutral");
        assert_eq!(Tone::Playful.to_string(), "playful");
    }
}
