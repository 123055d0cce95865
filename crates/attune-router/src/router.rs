// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Priority-weighted role scorer.
//!
//! Intent contributes the largest addend, emotion adds secondary
//! adjustments, temporal context applies small modifiers, and mood drift
//! pushes toward the emotional or creative role. The strictly highest
//! cumulative score wins; ties fall to the first role in declaration
//! order, so the accumulation is reproducible addend-for-addend.

use attune_classify::{Emotion, Intent};
use attune_config::ModelRolesConfig;
use attune_core::{DayPeriod, TemporalContext};
use attune_memory::MoodDrift;
use strum::Display;
use tracing::debug;

/// Generation roles, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ModelRole {
    Factual,
    Emotional,
    Creative,
    Coding,
    Summarization,
}

impl ModelRole {
    /// All roles in declaration order (the tie-break order).
    pub const ALL: [ModelRole; 5] = [
        ModelRole::Factual,
        ModelRole::Emotional,
        ModelRole::Creative,
        ModelRole::Coding,
        ModelRole::Summarization,
    ];
}

/// The routing outcome for one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDecision {
    pub role: ModelRole,
    /// Configured model name for the winning role.
    pub model: String,
    /// The winning cumulative score.
    pub confidence: f32,
}

/// Scores generation roles for each turn.
pub struct ModelRouter {
    models: ModelRolesConfig,
}

impl ModelRouter {
    pub fn new(models: ModelRolesConfig) -> Self {
        Self { models }
    }

    /// The configured model name for a role.
    pub fn model_for(&self, role: ModelRole) -> &str {
        match role {
            ModelRole::Factual => &self.models.factual,
            ModelRole::Emotional => &self.models.emotional,
            ModelRole::Creative => &self.models.creative,
            ModelRole::Coding => &self.models.coding,
            ModelRole::Summarization => &self.models.summarization,
        }
    }

    /// Score all roles and pick the winner.
    pub fn select(
        &self,
        intent: Intent,
        emotion: Emotion,
        temporal: &TemporalContext,
        drift: MoodDrift,
    ) -> RouteDecision {
        let mut scores = Scores::seeded();

        // Intent carries the largest weight.
        match intent {
            Intent::Question | Intent::Command => scores.add(ModelRole::Factual, 0.7),
            Intent::Emotional => scores.add(ModelRole::Emotional, 0.8),
            Intent::Technical => scores.add(ModelRole::Coding, 0.9),
            Intent::Smalltalk => scores.add(ModelRole::Creative, 0.6),
            Intent::Casual => scores.add(ModelRole::Emotional, 0.5),
        }

        // Emotion adds secondary adjustments.
        if matches!(emotion, Emotion::Sad | Emotion::Anxious | Emotion::Frustrated) {
            scores.add(ModelRole::Emotional, 0.4);
        }
        if emotion == Emotion::Flirty {
            scores.add(ModelRole::Creative, 0.5);
            scores.add(ModelRole::Emotional, 0.3);
        }
        if matches!(emotion, Emotion::Happy | Emotion::Excited) {
            scores.add(ModelRole::Creative, 0.3);
        }

        // Temporal context applies small modifiers.
        if temporal.period == DayPeriod::LateNight {
            scores.add(ModelRole::Emotional, 0.2);
        }
        if temporal.weekend {
            scores.add(ModelRole::Creative, 0.1);
        }

        // Mood drift pushes the extremes.
        if drift.score < -0.5 {
            scores.add(ModelRole::Emotional, 0.3);
        }
        if drift.score > 0.5 {
            scores.add(ModelRole::Creative, 0.2);
        }

        let (role, confidence) = scores.winner();
        debug!(
            intent = %intent,
            emotion = %emotion,
            period = %temporal.period,
            drift = drift.score,
            role = %role,
            confidence,
            "model selected"
        );

        RouteDecision {
            role,
            model: self.model_for(role).to_string(),
            confidence,
        }
    }
}

/// Score accumulator, indexed in role declaration order.
struct Scores([f32; 5]);

impl Scores {
    /// Every role starts with the same base score.
    fn seeded() -> Self {
        Self([0.1; 5])
    }

    fn add(&mut self, role: ModelRole, delta: f32) {
        self.0[role as usize] += delta;
    }

    /// Strictly-highest score wins; ties keep the earliest role.
    fn winner(&self) -> (ModelRole, f32) {
        let mut best = ModelRole::ALL[0];
        let mut best_score = self.0[0];
        for role in &ModelRole::ALL[1..] {
            let score = self.0[*role as usize];
            if score > best_score {
                best = *role;
                best_score = score;
            }
        }
        (best, best_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attune_memory::{MoodDrift, MoodTrend};

    fn router() -> ModelRouter {
        ModelRouter::new(ModelRolesConfig {
            factual: "model-factual".into(),
            emotional: "model-emotional".into(),
            creative: "model-creative".into(),
            coding: "model-coding".into(),
            summarization: "model-summarization".into(),
            embedding: "model-embedding".into(),
        })
    }

    fn daytime() -> TemporalContext {
        TemporalContext {
            hour: 14,
            period: DayPeriod::Afternoon,
            weekend: false,
        }
    }

    fn late_night() -> TemporalContext {
        TemporalContext {
            hour: 1,
            period: DayPeriod::LateNight,
            weekend: false,
        }
    }

    fn drift(score: f32) -> MoodDrift {
        let trend = if score > 0.3 {
            MoodTrend::Positive
        } else if score < -0.3 {
            MoodTrend::Negative
        } else {
            MoodTrend::Stable
        };
        MoodDrift { score, trend }
    }

    #[test]
    fn technical_intent_routes_to_coding() {
        let decision = router().select(
            Intent::Technical,
            Emotion::Neutral,
            &daytime(),
            MoodDrift::STABLE,
        );
        assert_eq!(decision.role, ModelRole::Coding);
        assert_eq!(decision.model, "model-coding");
        assert!((decision.confidence - 1.0).abs() < 1e-6); // 0.1 + 0.9
    }

    #[test]
    fn emotional_intent_routes_to_emotional() {
        let decision = router().select(
            Intent::Emotional,
            Emotion::Neutral,
            &daytime(),
            MoodDrift::STABLE,
        );
        assert_eq!(decision.role, ModelRole::Emotional);
        assert!((decision.confidence - 0.9).abs() < 1e-6); // 0.1 + 0.8
    }

    #[test]
    fn question_routes_to_factual() {
        let decision = router().select(
            Intent::Question,
            Emotion::Neutral,
            &daytime(),
            MoodDrift::STABLE,
        );
        assert_eq!(decision.role, ModelRole::Factual);
    }

    #[test]
    fn negative_emotion_boosts_emotional_role() {
        // A sad question: factual 0.1+0.7=0.8, emotional 0.1+0.4=0.5.
        // Factual still wins -- emotion is secondary to intent.
        let decision = router().select(
            Intent::Question,
            Emotion::Sad,
            &daytime(),
            MoodDrift::STABLE,
        );
        assert_eq!(decision.role, ModelRole::Factual);

        // But sad smalltalk tips to emotional over creative:
        // creative 0.1+0.6=0.7, emotional 0.1+0.4=0.5 -- creative wins.
        // Add negative drift and late night: emotional 0.5+0.3+0.2=1.0.
        let decision = router().select(
            Intent::Smalltalk,
            Emotion::Sad,
            &late_night(),
            drift(-0.8),
        );
        assert_eq!(decision.role, ModelRole::Emotional);
    }

    #[test]
    fn flirty_casual_still_prefers_emotional() {
        let decision = router().select(
            Intent::Casual,
            Emotion::Flirty,
            &daytime(),
            MoodDrift::STABLE,
        );
        // casual: emotional 0.1+0.5+0.3=0.9; creative 0.1+0.5=0.6.
        assert_eq!(decision.role, ModelRole::Emotional);
        assert!((decision.confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn weekend_nudges_creative() {
        let weekend = TemporalContext {
            hour: 14,
            period: DayPeriod::Afternoon,
            weekend: true,
        };
        // Happy smalltalk on a weekend: creative 0.1+0.6+0.3+0.1=1.1.
        let decision = router().select(Intent::Smalltalk, Emotion::Happy, &weekend, drift(0.0));
        assert_eq!(decision.role, ModelRole::Creative);
        assert!((decision.confidence - 1.1).abs() < 1e-6);
    }

    #[test]
    fn positive_drift_boosts_creative() {
        // Happy smalltalk with strong positive drift.
        let decision = router().select(
            Intent::Smalltalk,
            Emotion::Happy,
            &daytime(),
            drift(0.8),
        );
        assert_eq!(decision.role, ModelRole::Creative);
        // 0.1 + 0.6 + 0.3 + 0.2
        assert!((decision.confidence - 1.2).abs() < 1e-6);
    }

    #[test]
    fn ties_fall_to_declaration_order() {
        // No addends at all would tie everything at the seed score; the
        // closest reachable case: drive two roles to the same total and
        // verify the earlier one wins. Question(+0.7 factual) vs a
        // hand-built +0.7 emotional is not reachable through one call, so
        // check the seed tie directly through the accumulator.
        let scores = Scores::seeded();
        let (role, score) = scores.winner();
        assert_eq!(role, ModelRole::Factual);
        assert!((score - 0.1).abs() < 1e-6);
    }

    #[test]
    fn score_accumulation_is_reproducible() {
        let router = router();
        let first = router.select(Intent::Emotional, Emotion::Sad, &late_night(), drift(-0.9));
        let second = router.select(Intent::Emotional, Emotion::Sad, &late_night(), drift(-0.9));
        assert_eq!(first, second);
        // 0.1 + 0.8 + 0.4 + 0.2 + 0.3
        assert!((first.confidence - 1.8).abs() < 1e-6);
    }

    #[test]
    fn model_for_maps_every_role() {
        let router = router();
        assert_eq!(router.model_for(ModelRole::Summarization), "model-summarization");
        for role in ModelRole::ALL {
            assert!(!router.model_for(role).is_empty());
        }
    }
}
