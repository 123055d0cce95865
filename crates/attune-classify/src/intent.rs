// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classification.
//!
//! First-match priority over ordered pattern groups; the pattern
//! vocabularies are replaceable configuration, not load-bearing behavior.

use crate::labels::Intent;
use crate::patterns::contains_any;

/// Question markers (English + Indonesian interrogatives).
const QUESTION_PATTERNS: &[&str] = &[
    "what", "why", "how", "when", "where", "who", "apa", "gimana", "kenapa", "kapan",
    "dimana", "siapa",
];

/// Imperative / request markers.
const COMMAND_PATTERNS: &[&str] = &[
    "tell me", "make", "find", "show", "help", "tolong", "bantu", "cariin", "buatin",
];

/// First-person feeling expressions.
const EMOTIONAL_PATTERNS: &[&str] = &[
    "i feel", "i'm", "aku", "feeling", "sedih", "senang", "marah", "kecewa", "excited",
    "love", "hate", "miss", "rindu",
];

/// Programming / tooling vocabulary.
const TECHNICAL_PATTERNS: &[&str] = &[
    "code", "function", "bug", "error", "programming", "javascript", "python", "rust",
    "html", "css",
];

/// Low-content filler.
const SMALLTALK_PATTERNS: &[&str] = &[
    "haha", "lol", "wkwk", "hehe", "hmm", "ok", "ya", "iya", "nice", "cool",
];

/// Classify the intent of a message.
///
/// Deterministic and side-effect-free: the first matching category wins,
/// and a message matching nothing is `Casual`.
pub fn detect_intent(text: &str) -> Intent {
    let lower = text.to_lowercase();

    if lower.contains('?') || contains_any(&lower, QUESTION_PATTERNS) {
        return Intent::Question;
    }
    if contains_any(&lower, COMMAND_PATTERNS) {
        return Intent::Command;
    }
    if contains_any(&lower, EMOTIONAL_PATTERNS) {
        return Intent::Emotional;
    }
    if contains_any(&lower, TECHNICAL_PATTERNS) {
        return Intent::Technical;
    }
    if contains_any(&lower, SMALLTALK_PATTERNS) {
        return Intent::Smalltalk;
    }

    Intent::Casual
}
