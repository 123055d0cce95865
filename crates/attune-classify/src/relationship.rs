// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relationship-persona detection from recent conversation text.
//!
//! Counts keyword occurrences per relationship kind; the kind with the most
//! matches wins, defaulting to `Companion` when nothing matches.

use crate::labels::RelationshipKind;

/// Result of classifying a user's relationship persona.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelationshipDetection {
    pub kind: RelationshipKind,
    /// 0.0-1.0, saturating at 10 keyword matches.
    pub confidence: f32,
}

const ROMANTIC: &[&str] = &[
    "love", "babe", "sayang", "miss", "rindu", "cute", "handsome", "beautiful", "kiss",
    "hug",
];

const FRIEND: &[&str] = &[
    "friend", "buddy", "bro", "sis", "hang out", "chill", "fun", "game", "movie",
    "laugh", "joke",
];

const COUNSELOR: &[&str] = &[
    "problem", "advice", "help", "sad", "depressed", "stress", "worry", "anxious",
    "hurt", "pain",
];

const MENTOR: &[&str] = &[
    "learn", "teach", "explain", "understand", "study", "work", "career", "goal",
    "improve",
];

const COMPANION: &[&str] = &[
    "daily", "routine", "chat", "talk", "share", "boring", "random", "anything",
];

/// Ordered (kind, patterns) table. Order breaks count ties: earlier wins.
const KINDS: [(RelationshipKind, &[&str]); 5] = [
    (RelationshipKind::Romantic, ROMANTIC),
    (RelationshipKind::Friend, FRIEND),
    (RelationshipKind::Counselor, COUNSELOR),
    (RelationshipKind::Mentor, MENTOR),
    (RelationshipKind::Companion, COMPANION),
];

/// Classify the relationship persona from recent conversation text.
pub fn detect_relationship(recent_text: &str) -> RelationshipDetection {
    let lower = recent_text.to_lowercase();

    let mut best = RelationshipKind::Companion;
    let mut best_count = 0usize;

    for (kind, patterns) in KINDS {
        let count: usize = patterns.iter().map(|p| lower.matches(p).count()).sum();
        if count > best_count {
            best = kind;
            best_count = count;
        }
    }

    RelationshipDetection {
        kind: best,
        confidence: (best_count as f32 / 10.0).min(1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn romantic_keywords_dominate() {
        let d = detect_relationship("miss you babe, sending you a hug and a kiss");
        assert_eq!(d.kind, RelationshipKind::Romantic);
        assert!(d.confidence > 0.0);
    }

    #[test]
    fn counselor_keywords() {
        let d = detect_relationship("i have a problem and need advice, so much stress");
        assert_eq!(d.kind, RelationshipKind::Counselor);
    }

    #[test]
    fn mentor_keywords() {
        let d = detect_relationship("teach me, i want to learn and improve my career");
        assert_eq!(d.kind, RelationshipKind::Mentor);
    }

    #[test]
    fn no_matches_defaults_to_companion() {
        let d = detect_relationship("zzz");
        assert_eq!(d.kind, RelationshipKind::Companion);
        assert_eq!(d.confidence, 0.0);
    }

    #[test]
    fn confidence_saturates_at_one() {
        let text = "love ".repeat(30);
        let d = detect_relationship(&text);
        assert_eq!(d.kind, RelationshipKind::Romantic);
        assert!((d.confidence - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn repeated_keywords_count_each_occurrence() {
        // Two "game" + one "fun" beats a single "advice".
        let d = detect_relationship("game night was fun, another game soon? need advice");
        assert_eq!(d.kind, RelationshipKind::Friend);
    }
}
