// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the OpenAI-compatible chat and embeddings endpoints.

use attune_core::PromptMessage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireMessage {
    pub role: String,
    pub content: String,
}

impl From<&PromptMessage> for WireMessage {
    fn from(msg: &PromptMessage) -> Self {
        Self {
            role: msg.role.to_string(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: WireMessage,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmbeddingsRequest {
    pub model: String,
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingsResponse {
    #[serde(default)]
    pub data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingData {
    pub embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use attune_core::PromptRole;

    #[test]
    fn chat_request_serializes_openai_shape() {
        let request = ChatRequest {
            model: "gemma3:4b-it-qat".into(),
            messages: vec![WireMessage {
                role: "user".into(),
                content: "hello".into(),
            }],
            max_tokens: 150,
            temperature: 0.8,
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gemma3:4b-it-qat");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 150);
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn chat_response_parses_choices() {
        let json = r#"{
            "choices": [
                { "message": { "role": "assistant", "content": "hey there" } }
            ]
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "hey there");
    }

    #[test]
    fn chat_response_tolerates_missing_choices() {
        let response: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(response.choices.is_empty());
    }

    #[test]
    fn embeddings_response_parses_vector() {
        let json = r#"{ "data": [ { "embedding": [0.1, -0.2, 0.3] } ] }"#;
        let response: EmbeddingsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data[0].embedding.len(), 3);
    }

    #[test]
    fn prompt_message_maps_roles_lowercase() {
        let msg = PromptMessage::new(PromptRole::System, "persona");
        let wire = WireMessage::from(&msg);
        assert_eq!(wire.role, "system");
    }
}
