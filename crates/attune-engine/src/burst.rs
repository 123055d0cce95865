// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-sender message burst aggregation.
//!
//! Rapid message fragments from one user are coalesced into a single
//! logical turn: each new fragment restarts that sender's debounce timer,
//! and only a quiet period flushes the pending fragments downstream.
//! Senders never interfere with each other.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use attune_core::{MessageId, SenderId};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;

/// Separator between coalesced fragments.
const FRAGMENT_SEPARATOR: &str = " | ";

/// One aggregated logical exchange, ready for the orchestrator.
///
/// Ephemeral: consumed by the orchestrator, never persisted.
#[derive(Debug, Clone)]
pub struct Turn {
    pub sender: SenderId,
    /// All burst fragments joined in arrival order.
    pub text: String,
    /// Id of the last fragment, used for the read receipt.
    pub message_id: MessageId,
    pub received_at: DateTime<Utc>,
}

struct PendingBurst {
    fragments: Vec<String>,
    last_message_id: MessageId,
    /// Bumped on every fragment; a timer only fires for its own epoch, so
    /// a stale timer that lost the cancellation race flushes nothing.
    epoch: u64,
    timer: Option<JoinHandle<()>>,
}

struct BurstInner {
    debounce: Duration,
    pending: Mutex<HashMap<SenderId, PendingBurst>>,
    turns: mpsc::Sender<Turn>,
}

impl BurstInner {
    async fn fire(&self, sender: SenderId, epoch: u64) {
        let burst = {
            let mut pending = self.pending.lock().await;
            match pending.get(&sender) {
                Some(burst) if burst.epoch == epoch => pending.remove(&sender),
                _ => return,
            }
        };
        let Some(burst) = burst else { return };

        let turn = Turn {
            sender,
            text: burst.fragments.join(FRAGMENT_SEPARATOR),
            message_id: burst.last_message_id,
            received_at: Utc::now(),
        };
        debug!(sender = %turn.sender, fragments = burst.fragments.len(), "burst flushed");
        let _ = self.turns.send(turn).await;
    }
}

/// Coalesces rapid fragments per sender behind a debounce window.
#[derive(Clone)]
pub struct BurstAggregator {
    inner: Arc<BurstInner>,
}

impl BurstAggregator {
    /// Returns the aggregator and the receiving end of the turn stream.
    pub fn new(debounce: Duration, capacity: usize) -> (Self, mpsc::Receiver<Turn>) {
        let (turns, rx) = mpsc::channel(capacity);
        (
            Self {
                inner: Arc::new(BurstInner {
                    debounce,
                    pending: Mutex::new(HashMap::new()),
                    turns,
                }),
            },
            rx,
        )
    }

    /// Buffer a fragment and (re)start the sender's debounce timer.
    ///
    /// Any prior pending timer for this sender is cancelled; a fragment
    /// arriving after a flush simply starts a fresh cycle.
    pub async fn on_message(&self, sender: &SenderId, text: String, message_id: MessageId) {
        let mut pending = self.inner.pending.lock().await;
        let burst = pending.entry(sender.clone()).or_insert_with(|| PendingBurst {
            fragments: Vec::new(),
            last_message_id: message_id.clone(),
            epoch: 0,
            timer: None,
        });

        burst.fragments.push(text);
        burst.last_message_id = message_id;
        burst.epoch += 1;
        if let Some(timer) = burst.timer.take() {
            timer.abort();
        }

        let inner = Arc::clone(&self.inner);
        let sender = sender.clone();
        let epoch = burst.epoch;
        let debounce = self.inner.debounce;
        burst.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            inner.fire(sender, epoch).await;
        }));
    }

    /// Number of senders with a burst in flight.
    pub async fn pending_senders(&self) -> usize {
        self.inner.pending.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg_id(n: u32) -> MessageId {
        MessageId(format!("m{n}"))
    }

    #[tokio::test(start_paused = true)]
    async fn fragments_within_window_coalesce_into_one_turn() {
        let (aggregator, mut turns) = BurstAggregator::new(Duration::from_millis(2000), 8);
        let alice = SenderId::from("alice");

        aggregator.on_message(&alice, "a".into(), msg_id(1)).await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        aggregator.on_message(&alice, "b".into(), msg_id(2)).await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        aggregator.on_message(&alice, "c".into(), msg_id(3)).await;

        let turn = turns.recv().await.unwrap();
        assert_eq!(turn.text, "a | b | c");
        assert_eq!(turn.message_id, msg_id(3));

        // Exactly one turn: nothing else is pending.
        assert_eq!(aggregator.pending_senders().await, 0);
        assert!(turns.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn gaps_larger_than_window_produce_separate_turns() {
        let (aggregator, mut turns) = BurstAggregator::new(Duration::from_millis(2000), 8);
        let alice = SenderId::from("alice");

        aggregator.on_message(&alice, "first".into(), msg_id(1)).await;
        tokio::time::sleep(Duration::from_millis(2500)).await;
        aggregator.on_message(&alice, "second".into(), msg_id(2)).await;
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(turns.recv().await.unwrap().text, "first");
        assert_eq!(turns.recv().await.unwrap().text, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn senders_do_not_interfere() {
        let (aggregator, mut turns) = BurstAggregator::new(Duration::from_millis(1000), 8);
        let alice = SenderId::from("alice");
        let bob = SenderId::from("bob");

        aggregator.on_message(&alice, "from alice".into(), msg_id(1)).await;
        tokio::time::sleep(Duration::from_millis(600)).await;
        // Bob's message must not reset Alice's timer.
        aggregator.on_message(&bob, "from bob".into(), msg_id(2)).await;
        tokio::time::sleep(Duration::from_millis(600)).await;

        let first = turns.recv().await.unwrap();
        assert_eq!(first.sender, alice);
        assert_eq!(first.text, "from alice");
        let second = turns.recv().await.unwrap();
        assert_eq!(second.sender, bob);
    }

    #[tokio::test(start_paused = true)]
    async fn fragment_after_flush_starts_fresh_cycle() {
        let (aggregator, mut turns) = BurstAggregator::new(Duration::from_millis(1000), 8);
        let alice = SenderId::from("alice");

        aggregator.on_message(&alice, "one".into(), msg_id(1)).await;
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(turns.recv().await.unwrap().text, "one");

        aggregator.on_message(&alice, "two".into(), msg_id(2)).await;
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(turns.recv().await.unwrap().text, "two");
    }
}
