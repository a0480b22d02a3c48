use serde::Deserialize;

use super::message::Role;

/// One streamed event payload from the conversation endpoint.
///
/// Only the conversation id and the message author, id and first content
/// part are used; the rest is read so it can be logged.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GptResponse {
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub moderation_response: Option<ModerationResponse>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl GptResponse {
    /// Conversation id, ignoring empty strings.
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ResponseMessage {
    pub id: String,
    pub author: ResponseAuthor,
    pub content: ResponseContent,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub end_turn: Option<bool>,
}

impl ResponseMessage {
    /// Text of the first content part; empty when there are no parts or
    /// the first part is not a string.
    pub fn text(&self) -> &str {
        self.content
            .parts
            .first()
            .and_then(|part| part.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ResponseAuthor {
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ResponseContent {
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub parts: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModerationResponse {
    #[serde(default)]
    pub flagged: bool,
    #[serde(default)]
    pub blocked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_payload() {
        let json = r#"{
            "conversation_id": "c1",
            "message": {
                "id": "m1",
                "author": {"role": "assistant", "name": null, "metadata": {}},
                "create_time": 1700000000.5,
                "content": {"content_type": "text", "parts": ["hi"]},
                "status": "in_progress",
                "weight": 1.0,
                "recipient": "all"
            },
            "error": null
        }"#;

        let resp: GptResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.conversation_id(), Some("c1"));

        let msg = resp.message.unwrap();
        assert_eq!(msg.id, "m1");
        assert_eq!(msg.author.role, Role::Assistant);
        assert_eq!(msg.text(), "hi");
        assert_eq!(msg.status.as_deref(), Some("in_progress"));
        assert_eq!(msg.end_turn, None);
    }

    #[test]
    fn test_conversation_id_only() {
        let resp: GptResponse = serde_json::from_str(r#"{"conversation_id":"c9"}"#).unwrap();
        assert_eq!(resp.conversation_id(), Some("c9"));
        assert!(resp.message.is_none());
    }

    #[test]
    fn test_empty_conversation_id_is_absent() {
        let resp: GptResponse = serde_json::from_str(r#"{"conversation_id":""}"#).unwrap();
        assert_eq!(resp.conversation_id(), None);
    }

    #[test]
    fn test_message_without_parts() {
        let resp: GptResponse = serde_json::from_str(
            r#"{"message":{"id":"m2","author":{"role":"assistant"},"content":{"content_type":"text","parts":[]}}}"#,
        )
        .unwrap();
        assert_eq!(resp.message.unwrap().text(), "");
    }

    #[test]
    fn test_non_text_part() {
        let resp: GptResponse = serde_json::from_str(
            r#"{"message":{"id":"m3","author":{"role":"assistant"},"content":{"parts":[{"asset":"x"}]}}}"#,
        )
        .unwrap();
        assert_eq!(resp.message.unwrap().text(), "");
    }

    #[test]
    fn test_moderation() {
        let resp: GptResponse = serde_json::from_str(
            r#"{"moderation_response":{"flagged":true,"blocked":false,"moderation_id":"x"}}"#,
        )
        .unwrap();
        let moderation = resp.moderation_response.unwrap();
        assert!(moderation.flagged);
        assert!(!moderation.blocked);
    }

    #[test]
    fn test_malformed_payload_rejected() {
        assert!(serde_json::from_str::<GptResponse>("not json").is_err());
        assert!(serde_json::from_str::<GptResponse>(r#"{"message":{"id":"m"}}"#).is_err());
    }
}
