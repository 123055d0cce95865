// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The memory manager: single source of truth for all durable per-user state.
//!
//! Owns an explicit map of sender id to [`SenderMemory`] and is the only
//! component that mutates persisted state. All writes funnel through the
//! debounced persistence queue; persistence failures are logged and never
//! propagate into the message-handling path.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use attune_classify::{
    detect_relationship, Emotion, Intent, Language, RelationshipKind, Tone,
};
use attune_config::MemoryConfig;
use attune_core::{AttuneError, ChatMessage, MemoryKind, SenderId, StorageAdapter};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::embed_cache::EmbeddingCache;
use crate::followup::{find_follow_up, follow_up_context, FollowUp};
use crate::mood::{mood_drift, MoodDrift};
use crate::persist::PendingWrite;
use crate::personality::adaptation_target;
use crate::recall::{find_similar, weight_for, RecalledMemory};
use crate::types::{
    push_capped, EmotionalEvent, LongTermSummary, MoodEntry, PersonalityProfile,
    RelationshipState, SemanticEntry, SenderMemory,
};

/// How many semantic memories recall returns.
const RECALL_LIMIT: usize = 3;

struct ManagerInner {
    cfg: MemoryConfig,
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    embedder: EmbeddingCache,
    state: Mutex<HashMap<SenderId, SenderMemory>>,
    pending: Mutex<Vec<PendingWrite>>,
    flush_timer: Mutex<Option<JoinHandle<()>>>,
}

impl ManagerInner {
    async fn flush(&self) {
        let writes: Vec<PendingWrite> = {
            let mut pending = self.pending.lock().await;
            pending.drain(..).collect()
        };
        if writes.is_empty() {
            return;
        }
        debug!(writes = writes.len(), "flushing memory writes");
        for write in writes {
            if let Err(e) = write.apply(self.storage.as_ref()).await {
                warn!(error = %e, "memory flush write failed");
            }
        }
    }
}

/// Cheap to clone: all state lives behind one `Arc`.
#[derive(Clone)]
pub struct MemoryManager {
    inner: Arc<ManagerInner>,
}

impl MemoryManager {
    pub fn new(
        cfg: MemoryConfig,
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        embedder: EmbeddingCache,
    ) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                cfg,
                storage,
                embedder,
                state: Mutex::new(HashMap::new()),
                pending: Mutex::new(Vec::new()),
                flush_timer: Mutex::new(None),
            }),
        }
    }

    /// Load all persisted state into memory.
    ///
    /// Records that fail schema validation are skipped with a warning
    /// rather than aborting the load.
    pub async fn load(&self) -> Result<(), AttuneError> {
        let storage = self.inner.storage.as_ref();
        let senders = storage.senders().await?;
        let mut loaded = 0usize;

        let mut state = self.inner.state.lock().await;
        for sender in senders {
            let mut mem = SenderMemory::default();

            for msg in load_records::<ChatMessage>(storage, MemoryKind::Chat, &sender).await? {
                mem.chat.push_back(msg);
            }
            for summary in
                load_records::<LongTermSummary>(storage, MemoryKind::Summary, &sender).await?
            {
                mem.summaries.push_back(summary);
            }
            mem.events =
                load_records::<EmotionalEvent>(storage, MemoryKind::EmotionalEvent, &sender)
                    .await?;
            for entry in
                load_records::<SemanticEntry>(storage, MemoryKind::Semantic, &sender).await?
            {
                mem.semantic.push_back(entry);
            }
            for entry in load_records::<MoodEntry>(storage, MemoryKind::Mood, &sender).await? {
                mem.mood.push_back(entry);
            }

            if let Some(tone) = load_singleton::<Tone>(storage, MemoryKind::Tone, &sender).await? {
                mem.tone = tone;
            }
            if let Some(language) =
                load_singleton::<Language>(storage, MemoryKind::Language, &sender).await?
            {
                mem.language = language;
            }
            if let Some(personality) =
                load_singleton::<PersonalityProfile>(storage, MemoryKind::Personality, &sender)
                    .await?
            {
                mem.personality = personality;
            }
            mem.relationship =
                load_singleton::<RelationshipState>(storage, MemoryKind::Relationship, &sender)
                    .await?;

            state.insert(sender, mem);
            loaded += 1;
        }

        info!(users = loaded, "memory loaded");
        Ok(())
    }

    // --- Short-term buffer ---

    pub async fn chat_history(&self, sender: &SenderId) -> Vec<ChatMessage> {
        self.with_sender(sender, |mem| mem.chat.iter().cloned().collect())
            .await
    }

    /// Append to the short-term buffer, evicting oldest-first beyond the cap.
    pub async fn append_chat(&self, sender: &SenderId, message: ChatMessage) {
        let cap = self.inner.cfg.max_short_term;
        let record = to_value(&message);
        self.with_sender(sender, |mem| push_capped(&mut mem.chat, message, cap))
            .await;
        self.queue(PendingWrite::Append {
            kind: MemoryKind::Chat,
            sender: sender.clone(),
            record,
            cap,
        })
        .await;
    }

    // --- Long-term summaries ---

    pub async fn summaries(&self, sender: &SenderId) -> Vec<LongTermSummary> {
        self.with_sender(sender, |mem| mem.summaries.iter().cloned().collect())
            .await
    }

    pub async fn add_summary(&self, sender: &SenderId, summary: String, now: DateTime<Utc>) {
        let cap = self.inner.cfg.max_summaries;
        let entry = LongTermSummary {
            summary,
            timestamp: now,
        };
        let record = to_value(&entry);
        self.with_sender(sender, |mem| push_capped(&mut mem.summaries, entry, cap))
            .await;
        self.queue(PendingWrite::Append {
            kind: MemoryKind::Summary,
            sender: sender.clone(),
            record,
            cap,
        })
        .await;
    }

    /// Whether the short-term buffer has grown enough to compress.
    pub async fn needs_compression(&self, sender: &SenderId) -> bool {
        let threshold = self.inner.cfg.compression_threshold;
        self.with_sender(sender, |mem| mem.chat.len() >= threshold)
            .await
    }

    /// Record a compression summary and trim the short-term buffer to the
    /// most recent `compression_keep` messages.
    pub async fn compress_into(&self, sender: &SenderId, summary: String, now: DateTime<Utc>) {
        self.add_summary(sender, summary, now).await;

        let keep = self.inner.cfg.compression_keep;
        let records = self
            .with_sender(sender, |mem| {
                while mem.chat.len() > keep {
                    mem.chat.pop_front();
                }
                mem.chat.iter().map(to_value).collect::<Vec<Value>>()
            })
            .await;
        self.queue(PendingWrite::ReplaceAll {
            kind: MemoryKind::Chat,
            sender: sender.clone(),
            records,
        })
        .await;
        info!(sender = %sender, "compressed short-term history into long-term summary");
    }

    // --- Emotional events ---

    pub async fn emotional_events(&self, sender: &SenderId) -> Vec<EmotionalEvent> {
        self.with_sender(sender, |mem| mem.events.clone()).await
    }

    pub async fn record_emotional_event(&self, sender: &SenderId, event: EmotionalEvent) {
        let cap = self.inner.cfg.max_emotional_events;
        info!(
            sender = %sender,
            kind = %event.kind,
            intensity = %event.intensity,
            "recorded emotional event"
        );
        let record = to_value(&event);
        self.with_sender(sender, |mem| {
            mem.events.push(event);
            while mem.events.len() > cap {
                mem.events.remove(0);
            }
        })
        .await;
        self.queue(PendingWrite::Append {
            kind: MemoryKind::EmotionalEvent,
            sender: sender.clone(),
            record,
            cap,
        })
        .await;
    }

    /// Look up the follow-up that would be due, without consuming it.
    ///
    /// Used to build prompt context before generation; only a successful
    /// turn commits the flip via [`Self::take_follow_up`].
    pub async fn peek_follow_up(&self, sender: &SenderId, now: DateTime<Utc>) -> Option<FollowUp> {
        self.with_sender(sender, |mem| {
            let idx = find_follow_up(&mem.events, now)?;
            let event = &mem.events[idx];
            let hours = (now - event.timestamp).num_seconds() as f64 / 3600.0;
            Some(FollowUp {
                kind: event.kind,
                trigger: event.trigger.clone(),
                hours_since: hours,
                context: follow_up_context(event, hours),
            })
        })
        .await
    }

    /// Surface at most one due follow-up, flipping its `followed_up` flag.
    ///
    /// The flip happens exactly once per event: a surfaced event is never
    /// returned again.
    pub async fn take_follow_up(&self, sender: &SenderId, now: DateTime<Utc>) -> Option<FollowUp> {
        let (follow_up, records) = self
            .with_sender(sender, |mem| {
                let idx = find_follow_up(&mem.events, now)?;
                let event = &mut mem.events[idx];
                event.followed_up = true;
                let hours = (now - event.timestamp).num_seconds() as f64 / 3600.0;
                let follow_up = FollowUp {
                    kind: event.kind,
                    trigger: event.trigger.clone(),
                    hours_since: hours,
                    context: follow_up_context(event, hours),
                };
                let records = mem.events.iter().map(to_value).collect::<Vec<Value>>();
                Some((follow_up, records))
            })
            .await?;

        debug!(sender = %sender, kind = %follow_up.kind, "emotional callback triggered");
        self.queue(PendingWrite::ReplaceAll {
            kind: MemoryKind::EmotionalEvent,
            sender: sender.clone(),
            records,
        })
        .await;
        Some(follow_up)
    }

    // --- Tone ---

    pub async fn tone(&self, sender: &SenderId) -> Tone {
        self.with_sender(sender, |mem| mem.tone).await
    }

    pub async fn set_tone(&self, sender: &SenderId, tone: Tone) {
        let changed = self
            .with_sender(sender, |mem| {
                let changed = mem.tone != tone;
                mem.tone = tone;
                changed
            })
            .await;
        if changed {
            debug!(sender = %sender, tone = %tone, "tone updated");
            self.queue(PendingWrite::SetSingleton {
                kind: MemoryKind::Tone,
                sender: sender.clone(),
                value: to_value(&tone),
            })
            .await;
        }
    }

    /// Fade tone back to neutral after prolonged silence.
    ///
    /// Decays when no long-term summary exists inside the decay window --
    /// including when no summary exists at all.
    pub async fn decay_tone(&self, sender: &SenderId, now: DateTime<Utc>) {
        let decay_hours = self.inner.cfg.tone_decay_hours;
        let should_decay = self
            .with_sender(sender, |mem| {
                if mem.tone == Tone::Neutral {
                    return false;
                }
                match mem.summaries.back() {
                    None => true,
                    Some(last) => (now - last.timestamp).num_hours() > decay_hours,
                }
            })
            .await;
        if should_decay {
            debug!(sender = %sender, "fading tone back to neutral");
            self.set_tone(sender, Tone::Neutral).await;
        }
    }

    // --- Language ---

    pub async fn language(&self, sender: &SenderId) -> Language {
        self.with_sender(sender, |mem| mem.language).await
    }

    /// Overwrite the stored language when the detected one differs.
    pub async fn update_language(&self, sender: &SenderId, language: Language) -> bool {
        let changed = self
            .with_sender(sender, |mem| {
                let changed = mem.language != language;
                mem.language = language;
                changed
            })
            .await;
        if changed {
            debug!(sender = %sender, language = %language, "language preference updated");
            self.queue(PendingWrite::SetSingleton {
                kind: MemoryKind::Language,
                sender: sender.clone(),
                value: to_value(&language),
            })
            .await;
        }
        changed
    }

    // --- Semantic memory ---

    /// Embed and store an utterance for later similarity recall.
    ///
    /// Embedding failure degrades to "nothing stored" -- never an error.
    pub async fn store_semantic(
        &self,
        sender: &SenderId,
        text: &str,
        emotion: Emotion,
        context: String,
        now: DateTime<Utc>,
    ) {
        let Some(embedding) = self.inner.embedder.get(text).await else {
            return;
        };

        let cap = self.inner.cfg.max_semantic;
        let entry = SemanticEntry {
            text: text.to_string(),
            embedding,
            emotion,
            context,
            weight: weight_for(emotion),
            timestamp: now,
        };
        let record = to_value(&entry);
        self.with_sender(sender, |mem| push_capped(&mut mem.semantic, entry, cap))
            .await;
        self.queue(PendingWrite::Append {
            kind: MemoryKind::Semantic,
            sender: sender.clone(),
            record,
            cap,
        })
        .await;
    }

    /// Recall the most relevant stored utterances for a query.
    ///
    /// Returns entries above the similarity threshold, sorted descending by
    /// `similarity * weight`, at most three. Embedding failure yields an
    /// empty result.
    pub async fn recall(&self, sender: &SenderId, query: &str) -> Vec<RecalledMemory> {
        let entries: Vec<SemanticEntry> = self
            .with_sender(sender, |mem| mem.semantic.iter().cloned().collect())
            .await;
        if entries.is_empty() {
            return Vec::new();
        }

        let Some(query_embedding) = self.inner.embedder.get(query).await else {
            return Vec::new();
        };

        let results = find_similar(
            &query_embedding,
            &entries,
            self.inner.cfg.similarity_threshold,
            RECALL_LIMIT,
        );
        if !results.is_empty() {
            debug!(sender = %sender, count = results.len(), "semantic memories recalled");
        }
        results
    }

    // --- Mood ---

    pub async fn record_mood(&self, sender: &SenderId, emotion: Emotion, now: DateTime<Utc>) {
        let cap = self.inner.cfg.max_mood_entries;
        let entry = MoodEntry {
            emotion,
            timestamp: now,
        };
        let record = to_value(&entry);
        self.with_sender(sender, |mem| push_capped(&mut mem.mood, entry, cap))
            .await;
        self.queue(PendingWrite::Append {
            kind: MemoryKind::Mood,
            sender: sender.clone(),
            record,
            cap,
        })
        .await;
    }

    pub async fn mood_drift(&self, sender: &SenderId) -> MoodDrift {
        self.with_sender(sender, |mem| mood_drift(mem.mood.iter()))
            .await
    }

    // --- Personality & relationship ---

    pub async fn personality(&self, sender: &SenderId) -> PersonalityProfile {
        self.with_sender(sender, |mem| mem.personality.clone()).await
    }

    /// Nudge the stored profile toward this turn's adaptation target.
    ///
    /// Exponential smoothing: the profile moves by `adaptation_rate` toward
    /// the target each turn, so single turns shift it slowly.
    pub async fn adapt_personality(
        &self,
        sender: &SenderId,
        emotion: Emotion,
        intent: Intent,
        text: &str,
    ) -> PersonalityProfile {
        let rate = self.inner.cfg.personality_adaptation_rate;
        let updated = self
            .with_sender(sender, |mem| {
                let relationship = mem
                    .relationship
                    .as_ref()
                    .map(|r| r.kind)
                    .unwrap_or(RelationshipKind::Companion);
                let target =
                    adaptation_target(&mem.personality, emotion, intent, text, relationship);
                mem.personality = mem.personality.blend(&target, rate);
                mem.personality.clone()
            })
            .await;
        self.queue(PendingWrite::SetSingleton {
            kind: MemoryKind::Personality,
            sender: sender.clone(),
            value: to_value(&updated),
        })
        .await;
        updated
    }

    /// Current relationship persona, recomputed from recent text when stale.
    pub async fn relationship(
        &self,
        sender: &SenderId,
        recent_text: &str,
        now: DateTime<Utc>,
    ) -> RelationshipState {
        let stale_days = self.inner.cfg.relationship_stale_days;
        let (state, recomputed) = self
            .with_sender(sender, |mem| match &mem.relationship {
                Some(r) if (now - r.updated_at).num_days() < stale_days => (r.clone(), false),
                _ => {
                    let detected = detect_relationship(recent_text);
                    let state = RelationshipState {
                        kind: detected.kind,
                        confidence: detected.confidence,
                        updated_at: now,
                    };
                    mem.relationship = Some(state.clone());
                    (state, true)
                }
            })
            .await;
        if recomputed {
            debug!(sender = %sender, kind = %state.kind, "relationship persona recomputed");
            self.queue(PendingWrite::SetSingleton {
                kind: MemoryKind::Relationship,
                sender: sender.clone(),
                value: to_value(&state),
            })
            .await;
        }
        state
    }

    // --- Lifecycle ---

    /// Drop all memory for a user, in memory and durably.
    pub async fn clear_sender(&self, sender: &SenderId) {
        self.inner.state.lock().await.remove(sender);
        for kind in MemoryKind::ALL {
            let write = if kind.is_list() {
                PendingWrite::ReplaceAll {
                    kind,
                    sender: sender.clone(),
                    records: Vec::new(),
                }
            } else {
                PendingWrite::SetSingleton {
                    kind,
                    sender: sender.clone(),
                    value: Value::Null,
                }
            };
            self.queue(write).await;
        }
        info!(sender = %sender, "cleared all memory");
    }

    /// Flush pending writes immediately (shutdown path).
    pub async fn flush_now(&self) {
        let mut timer = self.inner.flush_timer.lock().await;
        if let Some(handle) = timer.take() {
            handle.abort();
        }
        drop(timer);
        self.inner.flush().await;
    }

    // --- Internals ---

    async fn with_sender<R>(
        &self,
        sender: &SenderId,
        f: impl FnOnce(&mut SenderMemory) -> R,
    ) -> R {
        let mut state = self.inner.state.lock().await;
        let mem = state.entry(sender.clone()).or_default();
        f(mem)
    }

    async fn queue(&self, write: PendingWrite) {
        self.inner.pending.lock().await.push(write);
        self.schedule_flush().await;
    }

    /// (Re)arm the single global flush timer.
    async fn schedule_flush(&self) {
        let mut timer = self.inner.flush_timer.lock().await;
        if let Some(handle) = timer.take() {
            handle.abort();
        }
        let inner = Arc::clone(&self.inner);
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(inner.cfg.save_debounce_ms)).await;
            inner.flush().await;
        }));
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    match serde_json::to_value(value) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "failed to serialize memory record");
            Value::Null
        }
    }
}

async fn load_records<T: DeserializeOwned>(
    storage: &dyn StorageAdapter,
    kind: MemoryKind,
    sender: &SenderId,
) -> Result<Vec<T>, AttuneError> {
    let values = storage.get_recent(kind, sender, None).await?;
    let mut records = Vec::with_capacity(values.len());
    for value in values {
        match serde_json::from_value::<T>(value) {
            Ok(record) => records.push(record),
            Err(e) => warn!(kind = %kind, sender = %sender, error = %e, "skipping invalid record"),
        }
    }
    Ok(records)
}

async fn load_singleton<T: DeserializeOwned>(
    storage: &dyn StorageAdapter,
    kind: MemoryKind,
    sender: &SenderId,
) -> Result<Option<T>, AttuneError> {
    let Some(value) = storage.get_singleton(kind, sender).await? else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value::<T>(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            warn!(kind = %kind, sender = %sender, error = %e, "skipping invalid singleton");
            Ok(None)
        }
    }
}
