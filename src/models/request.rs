use serde::Serialize;

use super::message::{Message, Role};

/// Parent id sent with every request.
pub const PLACEHOLDER_PARENT_MESSAGE_ID: &str = "d42fb76d-984a-4234-b02c-53fdcd53a0ba";

/// Request body for the conversation endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConversationRequest {
    /// Always "next"
    pub action: &'static str,
    /// The whole history, oldest first
    pub messages: Vec<WireMessage>,
    pub parent_message_id: &'static str,
    pub suggestions: Vec<String>,
    pub model: String,
    pub history_and_training_disabled: bool,
}

impl ConversationRequest {
    /// Build the request for the given history.
    pub fn from_history(history: &[Message], model: &str) -> Self {
        Self {
            action: "next",
            messages: history.iter().map(WireMessage::from).collect(),
            parent_message_id: PLACEHOLDER_PARENT_MESSAGE_ID,
            suggestions: Vec::new(),
            model: model.to_string(),
            history_and_training_disabled: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WireMessage {
    pub author: Author,
    pub content: WireContent,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Author {
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WireContent {
    pub content_type: &'static str,
    pub parts: Vec<String>,
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        Self {
            author: Author { role: message.role },
            content: WireContent {
                content_type: "text",
                parts: vec![message.text.clone()],
            },
            metadata: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let history = vec![
            Message::new(Role::System, "be brief"),
            Message::new(Role::User, "hello").in_conversation("c1"),
        ];

        let body = serde_json::to_value(ConversationRequest::from_history(&history, "m-1")).unwrap();

        assert_eq!(
            body,
            json!({
                "action": "next",
                "messages": [
                    {
                        "author": {"role": "system"},
                        "content": {"content_type": "text", "parts": ["be brief"]},
                        "metadata": {}
                    },
                    {
                        "author": {"role": "user"},
                        "content": {"content_type": "text", "parts": ["hello"]},
                        "metadata": {}
                    }
                ],
                "parent_message_id": "d42fb76d-984a-4234-b02c-53fdcd53a0ba",
                "suggestions": [],
                "model": "m-1",
                "history_and_training_disabled": false
            })
        );
    }

    #[test]
    fn test_empty_history() {
        let req = ConversationRequest::from_history(&[], "m");
        assert!(req.messages.is_empty());
    }
}
