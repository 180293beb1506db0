use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::message::Role;

#[derive(Debug, Serialize, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Request body for `POST /api/chat`. The aggregation service fans the same
/// message list out to every listed model and collects one reply per model.
#[derive(Serialize)]
pub struct ChatRequest {
    pub api_key: String,
    pub models: Vec<String>,
    pub messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub responses: HashMap<String, String>,
}

/// Request body for `POST /api/models`.
#[derive(Serialize)]
pub struct ModelsRequest {
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ModelEntry {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

pub mod client;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_serializes_wire_shape() {
        let request = ChatRequest {
            api_key: "sk-test".into(),
            models: vec!["a/m1".into()],
            messages: vec![ChatMessage {
                role: Role::User,
                content: "hi".into(),
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "api_key": "sk-test",
                "models": ["a/m1"],
                "messages": [{"role": "user", "content": "hi"}],
            })
        );
    }

    #[test]
    fn chat_response_tolerates_missing_responses_map() {
        let parsed: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.responses.is_empty());
    }

    #[test]
    fn models_response_parses_entries() {
        let parsed: ModelsResponse = serde_json::from_str(
            r#"{"models": [{"id": "a/m1", "name": "Model One"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.models.len(), 1);
        assert_eq!(parsed.models[0].id, "a/m1");
        assert_eq!(parsed.models[0].name, "Model One");
    }
}
