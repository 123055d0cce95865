// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-turn orchestration: classify, recall, route, generate, persist,
//! schedule.
//!
//! Failure policy per phase: classification cannot fail; recall and
//! embedding degrade to empty context; a generation failure (or an invalid
//! generation) drops the turn with a log line and no memory update; storage
//! failures never surface here at all. Nothing in this module is fatal to
//! the process -- every failure scopes to one turn or one sender.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use attune_classify::{
    detect_emotion, detect_emotional_event, detect_intent, detect_language, detect_tone,
    is_valid_reply, Tone,
};
use attune_config::AttuneConfig;
use attune_memory::{EmotionalEvent, MemoryManager};
use attune_router::ModelRouter;
use attune_core::{
    ChannelAdapter, ChatMessage, InboundMessage, MessageId, OutboundMessage, PresenceState,
    PromptMessage, PromptRole, ProviderAdapter, SenderId,
};
use chrono::{Local, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::burst::Turn;
use crate::prompt::{build_messages, build_system_prompt, PromptContext};
use crate::scheduler::{humanized_delay, ReplyScheduler};
use crate::temporal::temporal_context;

/// Phases a turn passes through. Terminal failures short-circuit to a
/// logged drop; they are not represented as phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Received,
    Classified,
    Recalled,
    ModelSelected,
    Generated,
    Persisted,
    Scheduled,
    Delivered,
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnPhase::Received => write!(f, "received"),
            TurnPhase::Classified => write!(f, "classified"),
            TurnPhase::Recalled => write!(f, "recalled"),
            TurnPhase::ModelSelected => write!(f, "model_selected"),
            TurnPhase::Generated => write!(f, "generated"),
            TurnPhase::Persisted => write!(f, "persisted"),
            TurnPhase::Scheduled => write!(f, "scheduled"),
            TurnPhase::Delivered => write!(f, "delivered"),
        }
    }
}

/// Messages this short (single trivial acks) stop earning replies after a
/// few in a row.
const TRIVIAL_WORDS: &[&str] = &[
    "ok", "okay", "oke", "hmm", "hm", "ya", "iya", "yep", "sure", "fine", "k",
];

/// Recently processed transport ids, bounded FIFO with set lookup.
struct RecentIds {
    order: VecDeque<MessageId>,
    seen: HashSet<MessageId>,
    cap: usize,
}

impl RecentIds {
    fn new(cap: usize) -> Self {
        Self {
            order: VecDeque::new(),
            seen: HashSet::new(),
            cap,
        }
    }

    /// Returns true if the id was already present.
    fn check_and_insert(&mut self, id: &MessageId) -> bool {
        if self.seen.contains(id) {
            return true;
        }
        self.seen.insert(id.clone());
        self.order.push_back(id.clone());
        while self.order.len() > self.cap {
            if let Some(evicted) = self.order.pop_front() {
                self.seen.remove(&evicted);
            }
        }
        false
    }
}

/// Wires the classifier bank, memory manager, router, generation
/// collaborator, and reply scheduler together for each turn.
pub struct Orchestrator {
    config: Arc<AttuneConfig>,
    memory: MemoryManager,
    router: ModelRouter,
    provider: Arc<dyn ProviderAdapter + Send + Sync>,
    channel: Arc<dyn ChannelAdapter + Send + Sync>,
    scheduler: ReplyScheduler,
    recent_ids: Mutex<RecentIds>,
    trivial_counts: Mutex<HashMap<SenderId, u32>>,
}

impl Orchestrator {
    pub fn new(
        config: Arc<AttuneConfig>,
        memory: MemoryManager,
        provider: Arc<dyn ProviderAdapter + Send + Sync>,
        channel: Arc<dyn ChannelAdapter + Send + Sync>,
    ) -> Self {
        let recent_cap = config.behavior.recent_ids_cap;
        let router = ModelRouter::new(config.models.clone());
        Self {
            config,
            memory,
            router,
            provider,
            channel,
            scheduler: ReplyScheduler::new(),
            recent_ids: Mutex::new(RecentIds::new(recent_cap)),
            trivial_counts: Mutex::new(HashMap::new()),
        }
    }

    pub fn memory(&self) -> &MemoryManager {
        &self.memory
    }

    /// Gate an inbound message before burst buffering.
    ///
    /// Returns false when the message should be ignored entirely:
    /// duplicates (idempotence), empty text, or a run of trivial acks.
    pub async fn preprocess(&self, msg: &InboundMessage) -> bool {
        if msg.text.trim().is_empty() {
            return false;
        }

        if self
            .recent_ids
            .lock()
            .await
            .check_and_insert(&msg.message_id)
        {
            debug!(message_id = %msg.message_id, "duplicate message id, ignoring");
            return false;
        }

        if self.should_skip_trivial(&msg.sender, &msg.text).await {
            debug!(sender = %msg.sender, "suppressing trivial message run");
            return false;
        }

        // Track the user's language preference as soon as they write.
        let language = detect_language(&msg.text);
        self.memory.update_language(&msg.sender, language).await;

        true
    }

    /// Consecutive trivial acks beyond the threshold earn no reply.
    async fn should_skip_trivial(&self, sender: &SenderId, text: &str) -> bool {
        let trimmed = text.trim();
        let is_trivial = TRIVIAL_WORDS
            .iter()
            .any(|w| trimmed.eq_ignore_ascii_case(w));

        let mut counts = self.trivial_counts.lock().await;
        if is_trivial {
            let count = counts.entry(sender.clone()).or_insert(0);
            *count += 1;
            *count >= self.config.behavior.skip_response_threshold
        } else {
            counts.insert(sender.clone(), 0);
            false
        }
    }

    /// Process one aggregated turn end to end.
    pub async fn handle_turn(self: &Arc<Self>, turn: Turn) {
        let sender = turn.sender.clone();
        let text = turn.text.clone();
        let now = turn.received_at;
        debug!(sender = %sender, phase = %TurnPhase::Received, "turn started");

        // Classification is pure and infallible.
        let intent = detect_intent(&text);
        let emotion = detect_emotion(&text);
        let temporal = temporal_context(Local::now());
        debug!(
            sender = %sender,
            phase = %TurnPhase::Classified,
            intent = %intent,
            emotion = %emotion,
            "turn classified"
        );

        // Fade stale tone, then re-detect from the current window.
        self.memory.decay_tone(&sender, now).await;
        let history = self.memory.chat_history(&sender).await;
        let tone = detect_tone(&history, &text);
        self.memory.set_tone(&sender, tone).await;

        // Recall runs against prior turns only; this turn is stored after
        // generation succeeds, so it cannot match itself.
        let recalled = self.memory.recall(&sender, &text).await;
        debug!(sender = %sender, phase = %TurnPhase::Recalled, memories = recalled.len(), "recall complete");

        // Peek the due emotional callback; the flip commits only if this
        // turn actually produces a reply.
        let follow_up = self.memory.peek_follow_up(&sender, now).await;

        // Mood drift from prior history advises routing and tone.
        let drift = self.memory.mood_drift(&sender).await;
        if drift.score < -0.5 && tone != Tone::Emotional {
            self.memory.set_tone(&sender, Tone::Emotional).await;
        } else if drift.score > 0.5 && tone == Tone::Neutral {
            self.memory.set_tone(&sender, Tone::Playful).await;
        }

        // Relationship persona (recomputed only when stale).
        let recent_text = {
            let mut window: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
            window.push(&text);
            window.join(" ")
        };
        let relationship = self.memory.relationship(&sender, &recent_text, now).await;
        let personality = self.memory.personality(&sender).await;

        let decision = self.router.select(intent, emotion, &temporal, drift);
        debug!(
            sender = %sender,
            phase = %TurnPhase::ModelSelected,
            model = %decision.model,
            confidence = decision.confidence,
            "model selected"
        );

        // Assemble the prompt.
        let summaries = self.memory.summaries(&sender).await;
        let background = if summaries.is_empty() {
            None
        } else {
            let recent: Vec<&str> = summaries
                .iter()
                .rev()
                .take(2)
                .map(|s| s.summary.as_str())
                .collect();
            Some(recent.join(" "))
        };
        let memories = if recalled.is_empty() {
            None
        } else {
            let lines: Vec<String> = recalled
                .iter()
                .map(|m| m.text.chars().take(80).collect())
                .collect();
            Some(lines.join("; "))
        };
        let language = self.memory.language(&sender).await;
        let tone = self.memory.tone(&sender).await;

        let system = build_system_prompt(&PromptContext {
            persona: &self.config.agent.persona,
            emotion,
            tone,
            language,
            temporal: &temporal,
            personality: &personality,
            relationship: relationship.kind,
            background,
            memories,
            follow_up: follow_up.map(|f| f.context),
        });
        let messages = build_messages(system, &history, &text);

        // Generation is the one hard failure: no reply, no memory update.
        let reply = match self
            .provider
            .generate(
                &messages,
                &decision.model,
                self.config.inference.max_tokens,
            )
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(sender = %sender, error = %e, "generation failed, turn dropped");
                return;
            }
        };
        if !is_valid_reply(&reply) {
            warn!(sender = %sender, "generation produced invalid text, turn dropped");
            return;
        }
        debug!(sender = %sender, phase = %TurnPhase::Generated, "reply generated");

        // The turn succeeded: commit all memory updates.
        self.memory
            .store_semantic(
                &sender,
                &text,
                emotion,
                format!("intent={intent} tone={tone}"),
                now,
            )
            .await;
        if let Some(signal) = detect_emotional_event(&text, emotion) {
            let snippet: String = text.chars().take(120).collect();
            self.memory
                .record_emotional_event(
                    &sender,
                    EmotionalEvent {
                        emotion,
                        kind: signal.kind,
                        intensity: signal.intensity,
                        trigger: signal.trigger.to_string(),
                        snippet,
                        timestamp: now,
                        followed_up: false,
                    },
                )
                .await;
        }
        // Commit the follow-up flip the prompt already surfaced.
        let _ = self.memory.take_follow_up(&sender, now).await;
        self.memory
            .adapt_personality(&sender, emotion, intent, &text)
            .await;
        self.memory
            .append_chat(&sender, ChatMessage::user(text.clone()))
            .await;
        self.memory
            .append_chat(&sender, ChatMessage::assistant(reply.clone()))
            .await;
        self.memory.record_mood(&sender, emotion, now).await;
        debug!(sender = %sender, phase = %TurnPhase::Persisted, "memory updated");

        // Compress a long buffer into a long-term summary.
        if self.memory.needs_compression(&sender).await {
            self.compress_history(&sender).await;
        }

        // Hand delivery to the per-sender queue with a humanized delay.
        let delay = humanized_delay(&reply, emotion, &self.config.behavior);
        debug!(
            sender = %sender,
            phase = %TurnPhase::Scheduled,
            delay_ms = delay.as_millis() as u64,
            "delivery scheduled"
        );

        let channel = Arc::clone(&self.channel);
        let message_id = turn.message_id.clone();
        let queue_sender = sender.clone();
        self.scheduler
            .enqueue(&sender, async move {
                channel
                    .send_presence(&queue_sender, PresenceState::Composing)
                    .await?;
                tokio::time::sleep(delay).await;
                channel
                    .send(OutboundMessage {
                        sender: queue_sender.clone(),
                        text: reply,
                    })
                    .await?;
                channel.mark_read(&queue_sender, &message_id).await?;
                channel
                    .send_presence(&queue_sender, PresenceState::Available)
                    .await?;
                info!(sender = %queue_sender, phase = %TurnPhase::Delivered, "reply delivered");
                Ok(())
            })
            .await;
    }

    /// Summarize the short-term buffer into long-term memory.
    ///
    /// Summarization failures are non-fatal: the buffer simply stays long
    /// until a later attempt succeeds.
    async fn compress_history(&self, sender: &SenderId) {
        let history = self.memory.chat_history(sender).await;
        let conversation: Vec<String> = history
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect();

        let messages = vec![
            PromptMessage::new(
                PromptRole::System,
                "you summarize conversations. capture key emotional moments, important \
                 facts, and the overall relationship vibe. write in lowercase, concise \
                 but meaningful.",
            ),
            PromptMessage::new(PromptRole::User, conversation.join("\n")),
        ];

        match self
            .provider
            .generate(&messages, self.router.model_for(attune_router::ModelRole::Summarization), 100)
            .await
        {
            Ok(summary) => {
                self.memory
                    .compress_into(sender, summary.to_lowercase(), Utc::now())
                    .await;
            }
            Err(e) => {
                warn!(sender = %sender, error = %e, "history summarization failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_ids_dedupe_and_evict() {
        let mut ids = RecentIds::new(3);
        let id = |n: u32| MessageId(format!("m{n}"));

        assert!(!ids.check_and_insert(&id(1)));
        assert!(ids.check_and_insert(&id(1)), "second sight is a duplicate");

        ids.check_and_insert(&id(2));
        ids.check_and_insert(&id(3));
        ids.check_and_insert(&id(4)); // evicts m1

        assert!(
            !ids.check_and_insert(&id(1)),
            "evicted id is processable again"
        );
    }

    #[test]
    fn turn_phase_display() {
        assert_eq!(TurnPhase::Received.to_string(), "received");
        assert_eq!(TurnPhase::ModelSelected.to_string(), "model_selected");
        assert_eq!(TurnPhase::Delivered.to_string(), "delivered");
    }
}
