use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// One turn of a conversation as exchanged with the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Some(Utc::now().to_rfc3339()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }
}

/// Copy `history` and append the latest exchange.
pub fn extend_history(history: &[ChatMessage], user: &str, assistant: &str) -> Vec<ChatMessage> {
    let mut updated = history.to_vec();
    updated.push(ChatMessage::user(user));
    updated.push(ChatMessage::assistant(assistant));
    updated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_serialize_lowercase() {
        let msg = ChatMessage::assistant("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_timestamp_is_optional_on_input() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role":"user","content":"שלום"}"#).unwrap();
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.timestamp, None);
    }

    #[test]
    fn test_extend_history_keeps_previous_turns() {
        let history = vec![ChatMessage::system("be nice")];
        let updated = extend_history(&history, "hello", "hi there");

        assert_eq!(updated.len(), 3);
        assert_eq!(updated[1].role, MessageRole::User);
        assert_eq!(updated[2].content, "hi there");
        assert_eq!(history.len(), 1);
    }
}
