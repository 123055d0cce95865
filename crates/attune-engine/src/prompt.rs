// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt assembly.
//!
//! Layers the configured persona with per-turn emotional guidance, tone
//! style, language instruction, temporal ambience, personality traits, and
//! recalled memory context.

use attune_classify::{Emotion, Language, RelationshipKind, Tone};
use attune_core::{ChatMessage, PromptMessage, PromptRole, TemporalContext};
use attune_memory::PersonalityProfile;

use crate::temporal::{greeting, mood_hint};

/// Everything the system prompt is assembled from.
pub struct PromptContext<'a> {
    pub persona: &'a str,
    pub emotion: Emotion,
    pub tone: Tone,
    pub language: Language,
    pub temporal: &'a TemporalContext,
    pub personality: &'a PersonalityProfile,
    pub relationship: RelationshipKind,
    /// Recent long-term summaries.
    pub background: Option<String>,
    /// Recalled semantic memories.
    pub memories: Option<String>,
    /// Emotional-event callback line.
    pub follow_up: Option<String>,
}

fn emotion_guidance(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Happy | Emotion::Excited => {
            "the user sounds happy. match their energy with warmth and enthusiasm."
        }
        Emotion::Sad => {
            "the user feels sad. be soft and empathetic, use gentle words, make them feel seen."
        }
        Emotion::Frustrated => {
            "the user sounds annoyed. stay calm, be understanding, help them feel heard."
        }
        Emotion::Anxious => {
            "the user seems anxious. reassure them and say things that make them feel safe."
        }
        Emotion::Flirty => {
            "the mood is flirty. tease lightly and keep it warm and tasteful."
        }
        Emotion::Neutral => "keep it casual, natural, and thoughtful.",
    }
}

fn tone_style(tone: Tone) -> &'static str {
    match tone {
        Tone::Playful => "use humor and light teasing, keep the flow relaxed and fun.",
        Tone::Serious => "be clear and thoughtful but still warm, like a late-night talk.",
        Tone::Flirty => "soft tone, a bit teasing, emotionally close.",
        Tone::Emotional => "slow down, sound caring and validating.",
        Tone::Sarcastic => "subtle irony and humor are fine, but never cold.",
        Tone::Neutral => "stay balanced: curious, human, warm.",
    }
}

fn language_instruction(language: Language) -> &'static str {
    match language {
        Language::English => {
            "reply ONLY in english, all lowercase like casual texting. never use indonesian words."
        }
        Language::Indonesian => {
            "reply ONLY in indonesian (bahasa indonesia), all lowercase, using natural slang. never use english."
        }
        Language::Mixed => {
            "reply in the same language the user just used, all lowercase, matching their language choice exactly."
        }
    }
}

/// Assemble the system prompt for one turn.
pub fn build_system_prompt(ctx: &PromptContext<'_>) -> String {
    let mut prompt = String::new();
    prompt.push_str(ctx.persona);
    prompt.push('\n');
    prompt.push_str(emotion_guidance(ctx.emotion));
    prompt.push('\n');
    prompt.push_str(&format!("current tone: {}. {}", ctx.tone, tone_style(ctx.tone)));
    prompt.push('\n');
    prompt.push_str(language_instruction(ctx.language));
    prompt.push('\n');

    if let Some(greet) = greeting(ctx.temporal.period) {
        prompt.push_str(&format!("{greet}. "));
    }
    prompt.push_str(&format!(
        "current time: {} ({}:00){}. ambient mood: {}.",
        ctx.temporal.period,
        ctx.temporal.hour,
        if ctx.temporal.weekend { ", weekend" } else { "" },
        mood_hint(ctx.temporal.period)
    ));
    prompt.push('\n');

    let traits = ctx.personality.dominant_traits();
    let traits = if traits.is_empty() {
        "balanced".to_string()
    } else {
        traits.join(", ")
    };
    prompt.push_str(&format!(
        "personality: {traits} ({} relationship).",
        ctx.relationship
    ));

    if let Some(ref background) = ctx.background {
        prompt.push_str(&format!("\n(background: {background})"));
    }
    if let Some(ref memories) = ctx.memories {
        prompt.push_str(&format!("\nrelevant memories: {memories}"));
    }
    if let Some(ref follow_up) = ctx.follow_up {
        prompt.push('\n');
        prompt.push_str(follow_up);
    }

    prompt
}

/// Build the full message list: system, recent history, current turn.
pub fn build_messages(
    system: String,
    history: &[ChatMessage],
    user_text: &str,
) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(PromptMessage::new(PromptRole::System, system));
    for message in history {
        messages.push(PromptMessage::new(message.role.into(), message.content.clone()));
    }
    messages.push(PromptMessage::new(PromptRole::User, user_text));
    messages
}
