// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emotion, emotional-event, and tone classification.

use attune_core::ChatMessage;

use crate::labels::{Emotion, EventKind, Intensity, Tone};
use crate::patterns::contains_any;

/// High-energy positive markers, checked before plain happiness.
const EXCITED_PATTERNS: &[&str] = &[
    "so excited", "can't wait", "cant wait", "omg", "yay", "let's go", "!!!",
];

const HAPPY_PATTERNS: &[&str] = &[
    "haha", "hehe", "lol", "happy", "love", "amazing", "great", "good", "nice",
    "thanks", "thank you",
];

const SAD_PATTERNS: &[&str] = &[
    "sad", "cry", "hurt", "pain", "lost", "miss", "lonely", "depressed", "tired",
    "exhausted",
];

const FRUSTRATED_PATTERNS: &[&str] = &[
    "angry", "mad", "hate", "annoyed", "frustrated", "ugh", "wtf", "damn",
];

const ANXIOUS_PATTERNS: &[&str] = &[
    "worried", "anxious", "scared", "nervous", "stress", "afraid", "help", "please",
];

const FLIRTY_PATTERNS: &[&str] = &[
    "baby", "babe", "cutie", "handsome", "beautiful", "miss you", "love you", "sayang",
];

/// Classify the dominant emotion of a message.
///
/// First-match priority; `Neutral` when nothing matches.
pub fn detect_emotion(text: &str) -> Emotion {
    let lower = text.to_lowercase();

    if contains_any(&lower, EXCITED_PATTERNS) {
        return Emotion::Excited;
    }
    if contains_any(&lower, HAPPY_PATTERNS) {
        return Emotion::Happy;
    }
    if contains_any(&lower, SAD_PATTERNS) {
        return Emotion::Sad;
    }
    if contains_any(&lower, FRUSTRATED_PATTERNS) {
        return Emotion::Frustrated;
    }
    if contains_any(&lower, ANXIOUS_PATTERNS) {
        return Emotion::Anxious;
    }
    if contains_any(&lower, FLIRTY_PATTERNS) {
        return Emotion::Flirty;
    }

    Emotion::Neutral
}

/// A signal that a message described something worth remembering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSignal {
    pub kind: EventKind,
    pub intensity: Intensity,
    /// Short fixed description of what triggered the event.
    pub trigger: &'static str,
}

const DISTRESS_PATTERNS: &[&str] = &[
    "broke up", "breakup", "lost", "died", "death", "fired", "rejected", "failed",
    "nightmare", "terrible day",
];

const CELEBRATION_PATTERNS: &[&str] = &[
    "got the job", "promoted", "passed", "won", "accepted", "good news", "amazing news",
    "birthday", "anniversary",
];

const VULNERABILITY_PATTERNS: &[&str] = &[
    "i never told anyone", "can i tell you something", "i'm scared",
    "i don't know what to do", "i feel lost",
];

const INTIMATE_PATTERNS: &[&str] = &[
    "i love you", "you mean everything", "you're special", "i care about you",
    "thinking about you",
];

const CONFLICT_PATTERNS: &[&str] = &[
    "why did you", "you hurt me", "i'm disappointed", "we need to talk",
    "i'm upset with you",
];

/// Detect whether a message describes an emotional event worth remembering.
///
/// Distress and celebration only register when the already-detected emotion
/// agrees with them; vulnerability, intimacy, and conflict register on
/// wording alone.
pub fn detect_emotional_event(text: &str, emotion: Emotion) -> Option<EventSignal> {
    let lower = text.to_lowercase();

    if emotion == Emotion::Sad && contains_any(&lower, DISTRESS_PATTERNS) {
        return Some(EventSignal {
            kind: EventKind::Distress,
            intensity: Intensity::High,
            trigger: "major life event",
        });
    }
    if matches!(emotion, Emotion::Happy | Emotion::Excited)
        && contains_any(&lower, CELEBRATION_PATTERNS)
    {
        return Some(EventSignal {
            kind: EventKind::Celebration,
            intensity: Intensity::High,
            trigger: "major achievement",
        });
    }
    if contains_any(&lower, VULNERABILITY_PATTERNS) {
        return Some(EventSignal {
            kind: EventKind::Vulnerability,
            intensity: Intensity::High,
            trigger: "deep sharing",
        });
    }
    if contains_any(&lower, INTIMATE_PATTERNS) {
        return Some(EventSignal {
            kind: EventKind::Intimate,
            intensity: Intensity::High,
            trigger: "emotional bonding",
        });
    }
    if contains_any(&lower, CONFLICT_PATTERNS) {
        return Some(EventSignal {
            kind: EventKind::Conflict,
            intensity: Intensity::Medium,
            trigger: "relationship tension",
        });
    }

    None
}

const PLAYFUL_TONE: &[&str] = &[
    "haha", "hehe", "lol", "wkwk", "lucu", "teasing", "main", "game", "gemes", "cute",
];

const SERIOUS_TONE: &[&str] = &[
    "kenapa", "gimana", "menurutmu", "jelaskan", "tolong", "serius", "masalah",
    "penting", "kerja", "deadline", "proyek",
];

const FLIRTY_TONE: &[&str] = &[
    "sayang", "babe", "cantik", "ganteng", "manis", "rindu", "kangen", "love you",
];

const EMOTIONAL_TONE: &[&str] = &[
    "sedih", "nangis", "kecewa", "hurt", "tired", "sendirian", "bingung", "stress",
    "depres",
];

const SARCASTIC_TONE: &[&str] = &[
    "yha", "ok lah", "yaudah", "whatever", "terserah", "iyain aja",
];

/// Analyze overall tone from recent history plus the latest message.
///
/// The whole window is scanned as one text: tone is a property of the
/// conversation, not of a single message.
pub fn detect_tone(history: &[ChatMessage], latest: &str) -> Tone {
    let mut combined = history
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    combined.push(' ');
    combined.push_str(latest);
    let lower = combined.to_lowercase();

    if contains_any(&lower, PLAYFUL_TONE) {
        return Tone::Playful;
    }
    if contains_any(&lower, SERIOUS_TONE) {
        return Tone::Serious;
    }
    if contains_any(&lower, FLIRTY_TONE) {
        return Tone::Flirty;
    }
    if contains_any(&lower, EMOTIONAL_TONE) {
        return Tone::Emotional;
    }
    if contains_any(&lower, SARCASTIC_TONE) {
        return Tone::Sarcastic;
    }

    Tone::Neutral
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excited_beats_happy() {
        assert_eq!(detect_emotion("omg i'm so excited!!!"), Emotion::Excited);
    }

    #[test]
    fn emotions_first_match() {
        assert_eq!(detect_emotion("hahaha that's great"), Emotion::Happy);
        assert_eq!(detect_emotion("i'm so tired and lonely"), Emotion::Sad);
        assert_eq!(detect_emotion("ugh this is annoying"), Emotion::Frustrated);
        assert_eq!(detect_emotion("i'm worried about tomorrow"), Emotion::Anxious);
        assert_eq!(detect_emotion("hey cutie"), Emotion::Flirty);
        assert_eq!(detect_emotion("the meeting moved to tuesday"), Emotion::Neutral);
    }

    #[test]
    fn distress_requires_sad_emotion() {
        let text = "i lost my job today";
        let sad = detect_emotion(text);
        assert_eq!(sad, Emotion::Sad); // "lost" matches the sad group
        let event = detect_emotional_event(text, sad).unwrap();
        assert_eq!(event.kind, EventKind::Distress);
        assert_eq!(event.intensity, Intensity::High);

        // Same wording with a non-sad emotion does not register distress.
        assert!(detect_emotional_event(text, Emotion::Happy).is_none());
    }

    #[test]
    fn celebration_requires_positive_emotion() {
        let event =
            detect_emotional_event("great news, got the job!", Emotion::Happy).unwrap();
        assert_eq!(event.kind, EventKind::Celebration);
    }

    #[test]
    fn vulnerability_is_emotion_independent() {
        let event =
            detect_emotional_event("can i tell you something", Emotion::Neutral).unwrap();
        assert_eq!(event.kind, EventKind::Vulnerability);
    }

    #[test]
    fn conflict_is_medium_intensity() {
        let event =
            detect_emotional_event("i'm upset with you", Emotion::Frustrated).unwrap();
        assert_eq!(event.kind, EventKind::Conflict);
        assert_eq!(event.intensity, Intensity::Medium);
    }

    #[test]
    fn ordinary_messages_produce_no_event() {
        assert!(detect_emotional_event("what's for lunch", Emotion::Neutral).is_none());
    }

    #[test]
    fn tone_considers_history() {
        let history = vec![
            ChatMessage::user("wkwk lucu banget"),
            ChatMessage::assistant("haha iya"),
        ];
        assert_eq!(detect_tone(&history, "lanjut"), Tone::Playful);
    }

    #[test]
    fn tone_from_latest_alone() {
        assert_eq!(detect_tone(&[], "deadline proyek besok"), Tone::Serious);
        assert_eq!(detect_tone(&[], "kangen kamu"), Tone::Flirty);
        assert_eq!(detect_tone(&[], "just another day"), Tone::Neutral);
    }
}
