// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-sender reply serialization and humanized delivery delays.
//!
//! Each sender gets a single-consumer task queue: queued actions for the
//! same sender run strictly one at a time, in order, while different
//! senders proceed fully in parallel. A failed action is logged and does
//! not affect its successors.

use std::collections::HashMap;
use std::pin::Pin;
use std::time::Duration;

use attune_classify::Emotion;
use attune_config::BehaviorConfig;
use attune_core::{AttuneError, SenderId};
use futures::Future;
use rand::Rng;
use tokio::sync::{mpsc, Mutex};
use tracing::warn;

type QueuedAction = Pin<Box<dyn Future<Output = Result<(), AttuneError>> + Send>>;

/// Serializes outbound actions per sender.
#[derive(Default)]
pub struct ReplyScheduler {
    queues: Mutex<HashMap<SenderId, mpsc::UnboundedSender<QueuedAction>>>,
}

impl ReplyScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action to the tail of the sender's queue.
    ///
    /// The action starts only after every previously queued action for this
    /// sender has completed or failed.
    pub async fn enqueue<F>(&self, sender: &SenderId, action: F)
    where
        F: Future<Output = Result<(), AttuneError>> + Send + 'static,
    {
        let mut queues = self.queues.lock().await;
        let tx = queues.entry(sender.clone()).or_insert_with(|| {
            let (tx, mut rx) = mpsc::unbounded_channel::<QueuedAction>();
            let sender = sender.clone();
            tokio::spawn(async move {
                while let Some(action) = rx.recv().await {
                    if let Err(e) = action.await {
                        warn!(sender = %sender, error = %e, "queued reply action failed");
                    }
                }
            });
            tx
        });
        if tx.send(Box::pin(action)).is_err() {
            warn!(sender = %sender, "reply queue receiver gone, action dropped");
        }
    }
}

/// Multiplier applied to the reply delay for an emotion.
///
/// Contemplative emotions slow delivery; high-energy ones speed it up.
pub fn emotion_factor(emotion: Emotion) -> f64 {
    match emotion {
        Emotion::Sad => 1.3,
        Emotion::Flirty => 1.1,
        Emotion::Happy | Emotion::Excited => 0.8,
        _ => 1.0,
    }
}

/// Deterministic core of the delay computation, with the jitter injected.
pub fn compute_delay(
    reply_len: usize,
    emotion: Emotion,
    cfg: &BehaviorConfig,
    jitter_ms: u64,
) -> Duration {
    let base = cfg.min_reply_delay_ms + reply_len as u64 * cfg.reply_delay_per_char_ms + jitter_ms;
    let scaled = (base as f64 * emotion_factor(emotion)) as u64;
    Duration::from_millis(scaled.min(cfg.max_reply_delay_ms))
}

/// The delay a human would plausibly take to type this reply.
pub fn humanized_delay(reply: &str, emotion: Emotion, cfg: &BehaviorConfig) -> Duration {
    let jitter_ms = rand::thread_rng().gen_range(0..cfg.max_jitter_ms.max(1));
    compute_delay(reply.chars().count(), emotion, cfg, jitter_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn cfg() -> BehaviorConfig {
        BehaviorConfig::default()
    }

    #[tokio::test(start_paused = true)]
    async fn same_sender_actions_run_strictly_in_order() {
        let scheduler = ReplyScheduler::new();
        let alice = SenderId::from("alice");
        let log = Arc::new(Mutex::new(Vec::new()));

        // A is slow; B must still wait for it.
        let log_a = Arc::clone(&log);
        scheduler
            .enqueue(&alice, async move {
                tokio::time::sleep(Duration::from_millis(500)).await;
                log_a.lock().await.push("A");
                Ok(())
            })
            .await;
        let log_b = Arc::clone(&log);
        scheduler
            .enqueue(&alice, async move {
                log_b.lock().await.push("B");
                Ok(())
            })
            .await;

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(*log.lock().await, vec!["A", "B"]);
    }

    #[tokio::test(start_paused = true)]
    async fn different_senders_run_concurrently() {
        let scheduler = ReplyScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let log_slow = Arc::clone(&log);
        scheduler
            .enqueue(&SenderId::from("alice"), async move {
                tokio::time::sleep(Duration::from_millis(500)).await;
                log_slow.lock().await.push("alice");
                Ok(())
            })
            .await;
        let log_fast = Arc::clone(&log);
        scheduler
            .enqueue(&SenderId::from("bob"), async move {
                log_fast.lock().await.push("bob");
                Ok(())
            })
            .await;

        tokio::time::sleep(Duration::from_millis(600)).await;
        // Bob did not wait behind Alice's slow action.
        assert_eq!(*log.lock().await, vec!["bob", "alice"]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_action_does_not_block_successors() {
        let scheduler = ReplyScheduler::new();
        let alice = SenderId::from("alice");
        let log = Arc::new(Mutex::new(Vec::new()));

        scheduler
            .enqueue(&alice, async move {
                Err(AttuneError::Internal("boom".into()))
            })
            .await;
        let log_after = Arc::clone(&log);
        scheduler
            .enqueue(&alice, async move {
                log_after.lock().await.push("after");
                Ok(())
            })
            .await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(*log.lock().await, vec!["after"]);
    }

    #[test]
    fn delay_scales_with_length_and_caps() {
        let cfg = cfg();
        let short = compute_delay(10, Emotion::Neutral, &cfg, 0);
        let long = compute_delay(80, Emotion::Neutral, &cfg, 0);
        assert!(long > short);
        // 1000 + 200*50 = 11000, capped at 6000.
        let capped = compute_delay(200, Emotion::Neutral, &cfg, 0);
        assert_eq!(capped, Duration::from_millis(cfg.max_reply_delay_ms));
    }

    #[test]
    fn sad_slows_and_excited_speeds() {
        let cfg = cfg();
        let neutral = compute_delay(20, Emotion::Neutral, &cfg, 0);
        let sad = compute_delay(20, Emotion::Sad, &cfg, 0);
        let excited = compute_delay(20, Emotion::Excited, &cfg, 0);
        assert!(sad > neutral);
        assert!(excited < neutral);
    }

    #[test]
    fn jitter_adds_before_scaling() {
        let cfg = cfg();
        let without = compute_delay(20, Emotion::Neutral, &cfg, 0);
        let with = compute_delay(20, Emotion::Neutral, &cfg, 500);
        assert_eq!(with - without, Duration::from_millis(500));
    }

    #[test]
    fn humanized_delay_stays_in_bounds() {
        let cfg = cfg();
        for _ in 0..50 {
            let delay = humanized_delay("a short reply", Emotion::Neutral, &cfg);
            assert!(delay >= Duration::from_millis(cfg.min_reply_delay_ms));
            assert!(delay <= Duration::from_millis(cfg.max_reply_delay_ms));
        }
    }
}
