// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weighted semantic recall over stored embeddings.

use attune_classify::Emotion;

use crate::types::SemanticEntry;

/// Cosine similarity between two vectors.
///
/// Fail-soft by definition: returns 0 when either vector is empty, when
/// lengths mismatch, or when either norm is zero. Never an error.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 { 0.0 } else { dot / denom }
}

/// Ranking weight assigned to a semantic entry at write time, from its emotion.
///
/// Distress-adjacent utterances rank highest on recall; everything else is
/// mid-weight. Never recomputed after write.
pub fn weight_for(emotion: Emotion) -> f32 {
    match emotion {
        Emotion::Sad => 1.0,
        Emotion::Flirty => 0.8,
        _ => 0.5,
    }
}

/// A semantic memory surfaced by recall.
#[derive(Debug, Clone, PartialEq)]
pub struct RecalledMemory {
    pub text: String,
    pub emotion: Emotion,
    pub similarity: f32,
    /// `similarity * weight` -- the sort key.
    pub relevance: f32,
}

/// Find stored entries similar to the query embedding.
///
/// Entries below `threshold` similarity are excluded; survivors are sorted
/// descending by `similarity * weight` and truncated to `limit`.
pub fn find_similar(
    query: &[f32],
    entries: &[SemanticEntry],
    threshold: f32,
    limit: usize,
) -> Vec<RecalledMemory> {
    let mut matches: Vec<RecalledMemory> = entries
        .iter()
        .filter_map(|entry| {
            let similarity = cosine_similarity(query, &entry.embedding);
            if similarity >= threshold {
                Some(RecalledMemory {
                    text: entry.text.clone(),
                    emotion: entry.emotion,
                    similarity,
                    relevance: similarity * entry.weight,
                })
            } else {
                None
            }
        })
        .collect();

    matches.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    matches.truncate(limit);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(text: &str, embedding: Vec<f32>, emotion: Emotion) -> SemanticEntry {
        SemanticEntry {
            text: text.into(),
            embedding,
            emotion,
            context: String::new(),
            weight: weight_for(emotion),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn identical_vectors_have_similarity_one() {
        let v = vec![0.3, -0.7, 0.2, 0.9];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn mismatched_lengths_are_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn empty_vectors_are_zero() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[]), 0.0);
    }

    #[test]
    fn zero_norm_is_zero_not_nan() {
        let sim = cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]);
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn orthogonal_vectors_are_zero() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < f32::EPSILON);
    }

    #[test]
    fn opposite_vectors_are_negative_one() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn weights_rank_sad_highest() {
        assert!(weight_for(Emotion::Sad) > weight_for(Emotion::Flirty));
        assert!(weight_for(Emotion::Flirty) > weight_for(Emotion::Neutral));
        assert_eq!(weight_for(Emotion::Happy), weight_for(Emotion::Neutral));
    }

    #[test]
    fn recall_filters_below_threshold() {
        let entries = vec![
            entry("close", vec![1.0, 0.0], Emotion::Neutral),
            entry("far", vec![0.0, 1.0], Emotion::Neutral),
        ];
        let results = find_similar(&[1.0, 0.0], &entries, 0.7, 3);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "close");
        assert!(results.iter().all(|r| r.similarity >= 0.7));
    }

    #[test]
    fn recall_sorts_by_weighted_relevance() {
        // Both entries match the query equally well, but the sad entry
        // carries double the weight and must rank first.
        let entries = vec![
            entry("neutral memory", vec![1.0, 0.0], Emotion::Neutral),
            entry("sad memory", vec![1.0, 0.0], Emotion::Sad),
        ];
        let results = find_similar(&[1.0, 0.0], &entries, 0.5, 3);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "sad memory");
        assert!(results[0].relevance > results[1].relevance);
    }

    #[test]
    fn recall_truncates_to_limit() {
        let entries: Vec<_> = (0..6)
            .map(|i| entry(&format!("m{i}"), vec![1.0, 0.0], Emotion::Neutral))
            .collect();
        let results = find_similar(&[1.0, 0.0], &entries, 0.5, 3);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn recall_with_no_entries_is_empty() {
        assert!(find_similar(&[1.0, 0.0], &[], 0.5, 3).is_empty());
    }
}
