// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message-flow engine for the Attune companion: burst aggregation,
//! per-turn orchestration, and humanized reply scheduling.
//!
//! Concurrency model: single-process, event-driven. Per-sender state is
//! serialized by the burst aggregator's timer cancellation and the reply
//! scheduler's per-sender queues; across senders everything proceeds in
//! parallel with no ordering guarantees.

pub mod burst;
pub mod orchestrator;
pub mod prompt;
pub mod scheduler;
pub mod temporal;

use std::sync::Arc;
use std::time::Duration;

use attune_config::AttuneConfig;
use attune_core::{AttuneError, ChannelAdapter, InboundMessage, ProviderAdapter};
use attune_memory::MemoryManager;
use tracing::info;

pub use burst::{BurstAggregator, Turn};
pub use orchestrator::{Orchestrator, TurnPhase};
pub use scheduler::{compute_delay, emotion_factor, humanized_delay, ReplyScheduler};
pub use temporal::{period_for_hour, temporal_context};

/// Top-level wiring: burst aggregator in front of the orchestrator.
pub struct Engine {
    orchestrator: Arc<Orchestrator>,
    burst: BurstAggregator,
    channel: Arc<dyn ChannelAdapter + Send + Sync>,
}

impl Engine {
    /// Build the engine and start its turn pump.
    ///
    /// Each flushed burst is handled on its own task, so turns for
    /// different senders never wait on each other.
    pub fn new(
        config: Arc<AttuneConfig>,
        memory: MemoryManager,
        provider: Arc<dyn ProviderAdapter + Send + Sync>,
        channel: Arc<dyn ChannelAdapter + Send + Sync>,
    ) -> Self {
        let debounce = Duration::from_millis(config.behavior.debounce_ms);
        let (burst, mut turns) = BurstAggregator::new(debounce, 64);
        let orchestrator = Arc::new(Orchestrator::new(
            config,
            memory,
            provider,
            Arc::clone(&channel),
        ));

        let pump = Arc::clone(&orchestrator);
        tokio::spawn(async move {
            while let Some(turn) = turns.recv().await {
                let orchestrator = Arc::clone(&pump);
                tokio::spawn(async move {
                    orchestrator.handle_turn(turn).await;
                });
            }
        });

        Self {
            orchestrator,
            burst,
            channel,
        }
    }

    /// Feed one inbound message through gating and burst buffering.
    pub async fn on_incoming(&self, msg: InboundMessage) {
        if self.orchestrator.preprocess(&msg).await {
            self.burst
                .on_message(&msg.sender, msg.text, msg.message_id)
                .await;
        }
    }

    /// Drive the engine from the channel until it closes or fails.
    pub async fn run(&self) -> Result<(), AttuneError> {
        info!("engine running");
        loop {
            let msg = self.channel.receive().await?;
            self.on_incoming(msg).await;
        }
    }

    /// The memory manager behind this engine.
    pub fn memory(&self) -> &MemoryManager {
        self.orchestrator.memory()
    }
}
