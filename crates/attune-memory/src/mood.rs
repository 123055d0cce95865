// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mood drift: a derived, recency-weighted sentiment trend.
//!
//! Never persisted; recomputed from the mood history ring on demand and
//! used only as an advisory signal for routing and tone adjustment.

use attune_classify::Emotion;

use crate::types::MoodEntry;

/// Fixed polarity score per emotion.
pub fn polarity(emotion: Emotion) -> f32 {
    match emotion {
        Emotion::Happy | Emotion::Excited => 1.0,
        Emotion::Flirty => 0.5,
        Emotion::Neutral => 0.0,
        Emotion::Anxious => -0.8,
        Emotion::Sad | Emotion::Frustrated => -1.0,
    }
}

/// Direction of the rolling mood trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodTrend {
    Positive,
    Stable,
    Negative,
}

/// Rolling sentiment summary for one user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodDrift {
    /// Weighted average polarity in [-1, 1]; more recent entries weigh more.
    pub score: f32,
    pub trend: MoodTrend,
}

impl MoodDrift {
    pub const STABLE: MoodDrift = MoodDrift {
        score: 0.0,
        trend: MoodTrend::Stable,
    };
}

/// Compute mood drift over the history ring.
///
/// Each entry is weighted by a linear recency ramp (most recent 1.0, oldest
/// 1/N); the score is the weighted average of polarities. Fewer than two
/// entries yield a stable zero.
pub fn mood_drift<'a>(history: impl IntoIterator<Item = &'a MoodEntry>) -> MoodDrift {
    let entries: Vec<&MoodEntry> = history.into_iter().collect();
    let n = entries.len();
    if n < 2 {
        return MoodDrift::STABLE;
    }

    let mut weighted_sum = 0.0f32;
    let mut weight_total = 0.0f32;
    for (i, entry) in entries.iter().enumerate() {
        let recency = (i + 1) as f32 / n as f32;
        weighted_sum += polarity(entry.emotion) * recency;
        weight_total += recency;
    }

    let score = weighted_sum / weight_total;
    let trend = if score > 0.3 {
        MoodTrend::Positive
    } else if score < -0.3 {
        MoodTrend::Negative
    } else {
        MoodTrend::Stable
    };

    MoodDrift { score, trend }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn history(emotions: &[Emotion]) -> Vec<MoodEntry> {
        emotions
            .iter()
            .map(|&emotion| MoodEntry {
                emotion,
                timestamp: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn all_happy_beats_all_sad() {
        let happy = history(&[Emotion::Happy; 5]);
        let sad = history(&[Emotion::Sad; 5]);
        assert!(mood_drift(&happy).score > mood_drift(&sad).score);
        assert_eq!(mood_drift(&happy).trend, MoodTrend::Positive);
        assert_eq!(mood_drift(&sad).trend, MoodTrend::Negative);
    }

    #[test]
    fn recent_sad_outweighs_older_happies() {
        // A recent sad entry drags the drift down from the happy baseline,
        // and with two older happies it cancels them out entirely.
        let happies = history(&[Emotion::Happy, Emotion::Happy]);
        let mut with_sad = happies.clone();
        with_sad.push(MoodEntry {
            emotion: Emotion::Sad,
            timestamp: Utc::now(),
        });
        assert!(mood_drift(&with_sad).score < mood_drift(&happies).score);
        assert!(mood_drift(&with_sad).score <= 0.0);
    }

    #[test]
    fn short_history_is_stable_zero() {
        assert_eq!(mood_drift(&history(&[])), MoodDrift::STABLE);
        assert_eq!(mood_drift(&history(&[Emotion::Sad])), MoodDrift::STABLE);
    }

    #[test]
    fn neutral_history_is_stable() {
        let drift = mood_drift(&history(&[Emotion::Neutral; 4]));
        assert_eq!(drift.score, 0.0);
        assert_eq!(drift.trend, MoodTrend::Stable);
    }

    #[test]
    fn polarity_table() {
        assert_eq!(polarity(Emotion::Happy), 1.0);
        assert_eq!(polarity(Emotion::Excited), 1.0);
        assert_eq!(polarity(Emotion::Flirty), 0.5);
        assert_eq!(polarity(Emotion::Neutral), 0.0);
        assert_eq!(polarity(Emotion::Anxious), -0.8);
        assert_eq!(polarity(Emotion::Sad), -1.0);
        assert_eq!(polarity(Emotion::Frustrated), -1.0);
    }

    #[test]
    fn score_stays_in_unit_interval() {
        let drift = mood_drift(&history(&[Emotion::Happy; 20]));
        assert!(drift.score <= 1.0);
        let drift = mood_drift(&history(&[Emotion::Sad; 20]));
        assert!(drift.score >= -1.0);
    }
}
