//! Chat Messages
//!
//! Wire format shared by the chat widget, the chat endpoint and the upstream
//! chat-completion gateway.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Role of a message sender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// Visitor input
    User,
    /// Assistant (LLM) response
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single role/content pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Body accepted by the chat endpoint
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
}

/// One candidate reply in a completion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: Message,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Chat-completion-shaped response.
///
/// Fields this crate does not model are kept in `extra` so the response can
/// be relayed to the browser without loss.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    pub choices: Vec<Choice>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ChatCompletion {
    /// Build a single-choice completion (used by fakes and the log-only provider)
    pub fn from_reply(model: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            id: None,
            model: Some(model.into()),
            choices: vec![Choice {
                index: 0,
                message: Message::assistant(reply),
                finish_reason: Some("stop".into()),
            }],
            usage: None,
            extra: HashMap::new(),
        }
    }

    /// Text of the first choice, if any
    pub fn reply(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn test_completion_keeps_unknown_fields() {
        let raw = r#"{
            "id": "gen-1",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "google/gemini-2.5-flash",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello"}, "finish_reason": "stop"}]
        }"#;
        let completion: ChatCompletion = serde_json::from_str(raw).unwrap();
        assert_eq!(completion.reply(), Some("Hello"));
        assert_eq!(completion.extra["object"], "chat.completion");

        let back = serde_json::to_value(&completion).unwrap();
        assert_eq!(back["created"], 1_700_000_000);
        assert_eq!(back["choices"][0]["message"]["content"], "Hello");
    }

    #[test]
    fn test_empty_choices_has_no_reply() {
        let completion: ChatCompletion = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(completion.reply().is_none());
    }
}
