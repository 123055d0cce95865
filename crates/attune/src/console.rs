// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line-oriented console channel for local operation.
//!
//! Every stdin line becomes one inbound message from the `console` user;
//! replies print to stdout. Useful for trying the agent without a real
//! messaging transport attached.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::debug;

use attune_core::{
    AdapterType, AttuneError, ChannelAdapter, HealthStatus, InboundMessage, MessageId,
    OutboundMessage, PluginAdapter, PresenceState, SenderId,
};

/// The single pseudo-user a console session talks as.
const CONSOLE_SENDER: &str = "console";

pub struct ConsoleChannel {
    agent_name: String,
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleChannel {
    pub fn new(agent_name: String) -> Self {
        Self {
            agent_name,
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

#[async_trait]
impl PluginAdapter for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, AttuneError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AttuneError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for ConsoleChannel {
    async fn connect(&mut self) -> Result<(), AttuneError> {
        println!("connected. type a message and press enter (ctrl-d to quit).");
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, AttuneError> {
        println!("{}> {}", self.agent_name, msg.text);
        Ok(MessageId(uuid::Uuid::new_v4().to_string()))
    }

    async fn send_presence(
        &self,
        _sender: &SenderId,
        state: PresenceState,
    ) -> Result<(), AttuneError> {
        if state == PresenceState::Composing {
            println!("{} is typing...", self.agent_name);
        }
        Ok(())
    }

    async fn mark_read(&self, _sender: &SenderId, id: &MessageId) -> Result<(), AttuneError> {
        debug!(message_id = %id, "marked read");
        Ok(())
    }

    async fn receive(&self) -> Result<InboundMessage, AttuneError> {
        let mut lines = self.lines.lock().await;
        loop {
            let line = lines.next_line().await.map_err(|e| AttuneError::Channel {
                message: "stdin read failed".to_string(),
                source: Some(Box::new(e)),
            })?;
            let Some(line) = line else {
                return Err(AttuneError::Channel {
                    message: "stdin closed".to_string(),
                    source: None,
                });
            };
            if line.trim().is_empty() {
                continue;
            }
            return Ok(InboundMessage {
                sender: SenderId::from(CONSOLE_SENDER),
                text: line,
                message_id: MessageId(uuid::Uuid::new_v4().to_string()),
                quoted_text: None,
            });
        }
    }
}
