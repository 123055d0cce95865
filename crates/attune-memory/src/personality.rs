// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Personality adaptation: domain nudges, emotional adjustments, and
//! relationship-persona blending, smoothed exponentially over time.

use attune_classify::{Emotion, Intent, RelationshipKind};

use crate::types::PersonalityProfile;

/// Trait profile associated with each relationship persona.
pub fn persona_traits(kind: RelationshipKind) -> PersonalityProfile {
    match kind {
        RelationshipKind::Romantic => PersonalityProfile {
            flirtiness: 0.9,
            empathy: 0.9,
            playfulness: 0.8,
            humor: 0.7,
            ..PersonalityProfile::default()
        },
        RelationshipKind::Friend => PersonalityProfile {
            playfulness: 0.9,
            humor: 0.9,
            curiosity: 0.8,
            empathy: 0.7,
            ..PersonalityProfile::default()
        },
        RelationshipKind::Counselor => PersonalityProfile {
            empathy: 1.0,
            logic: 0.8,
            curiosity: 0.7,
            humor: 0.3,
            ..PersonalityProfile::default()
        },
        RelationshipKind::Mentor => PersonalityProfile {
            logic: 0.9,
            curiosity: 0.9,
            empathy: 0.7,
            humor: 0.6,
            ..PersonalityProfile::default()
        },
        RelationshipKind::Companion => PersonalityProfile {
            curiosity: 0.8,
            empathy: 0.8,
            humor: 0.7,
            playfulness: 0.7,
            ..PersonalityProfile::default()
        },
    }
}

/// Influence of the relationship persona on the adapted profile.
const PERSONA_INFLUENCE: f32 = 0.3;

/// Compute the adaptation target for one turn.
///
/// Starts from the stored profile, nudges traits toward the conversation's
/// domain and the user's emotional state, then blends in the relationship
/// persona. The caller smooths the stored profile toward this target.
pub fn adaptation_target(
    profile: &PersonalityProfile,
    emotion: Emotion,
    intent: Intent,
    text: &str,
    relationship: RelationshipKind,
) -> PersonalityProfile {
    let mut target = profile.clone();
    let lower = text.to_lowercase();

    let nudge = |value: &mut f32, delta: f32| {
        *value = (*value + delta).clamp(0.0, 1.0);
    };

    // Domain-based trait shifts.
    if contains_any(&lower, &["work", "project", "deadline", "job", "career", "meeting"]) {
        nudge(&mut target.logic, 0.1);
        nudge(&mut target.empathy, 0.05);
        nudge(&mut target.playfulness, -0.05);
    }
    if contains_any(&lower, &["love", "relationship", "family", "friend", "feel", "heart", "miss"]) {
        nudge(&mut target.empathy, 0.15);
        nudge(&mut target.flirtiness, 0.1);
        nudge(&mut target.logic, -0.05);
    }
    if contains_any(&lower, &["game", "fun", "joke", "laugh", "dream", "music", "play"]) {
        nudge(&mut target.playfulness, 0.1);
        nudge(&mut target.humor, 0.1);
        nudge(&mut target.curiosity, 0.05);
    }
    if contains_any(&lower, &["learn", "study", "book", "idea", "think", "understand", "explain"]) {
        nudge(&mut target.curiosity, 0.15);
        nudge(&mut target.logic, 0.1);
    }

    // Emotional adjustments.
    match emotion {
        Emotion::Sad => {
            nudge(&mut target.empathy, 0.1);
            nudge(&mut target.humor, -0.2);
        }
        Emotion::Flirty => {
            nudge(&mut target.flirtiness, 0.1);
            nudge(&mut target.playfulness, 0.1);
        }
        Emotion::Frustrated => {
            nudge(&mut target.empathy, 0.15);
            nudge(&mut target.logic, 0.1);
        }
        _ => {}
    }

    // Intent adjustments.
    if intent == Intent::Question {
        nudge(&mut target.logic, 0.1);
        nudge(&mut target.curiosity, 0.1);
    }

    target.blend(&persona_traits(relationship), PERSONA_INFLUENCE)
}

fn contains_any(lower: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sad_turns_raise_empathy_and_lower_humor() {
        let base = PersonalityProfile::default();
        let target = adaptation_target(
            &base,
            Emotion::Sad,
            Intent::Emotional,
            "everything is heavy today",
            RelationshipKind::Companion,
        );
        assert!(target.empathy > base.empathy);
        assert!(target.humor < base.humor);
    }

    #[test]
    fn work_domain_raises_logic() {
        let base = PersonalityProfile::default();
        let target = adaptation_target(
            &base,
            Emotion::Neutral,
            Intent::Casual,
            "big deadline on the project tomorrow",
            RelationshipKind::Companion,
        );
        assert!(target.logic > base.logic);
    }

    #[test]
    fn counselor_persona_suppresses_humor() {
        let base = PersonalityProfile::default();
        let target = adaptation_target(
            &base,
            Emotion::Neutral,
            Intent::Casual,
            "nothing much",
            RelationshipKind::Counselor,
        );
        // Counselor persona pulls humor toward 0.3 at 30% influence.
        assert!(target.humor < base.humor);
        assert!(target.empathy > base.empathy);
    }

    #[test]
    fn traits_stay_in_unit_interval() {
        let maxed = PersonalityProfile {
            curiosity: 1.0,
            empathy: 1.0,
            humor: 1.0,
            flirtiness: 1.0,
            logic: 1.0,
            playfulness: 1.0,
        };
        let target = adaptation_target(
            &maxed,
            Emotion::Flirty,
            Intent::Question,
            "i love this game, explain the idea",
            RelationshipKind::Romantic,
        );
        for value in [
            target.curiosity,
            target.empathy,
            target.humor,
            target.flirtiness,
            target.logic,
            target.playfulness,
        ] {
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn persona_tables_cover_all_kinds() {
        for kind in [
            RelationshipKind::Romantic,
            RelationshipKind::Friend,
            RelationshipKind::Counselor,
            RelationshipKind::Mentor,
            RelationshipKind::Companion,
        ] {
            let traits = persona_traits(kind);
            assert!(traits.empathy > 0.0);
        }
    }
}
