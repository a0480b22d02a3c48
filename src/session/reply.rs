//! Folding streamed payloads into the reply message.

use crate::models::{GptResponse, Message};
use crate::sse::DONE_MARKER;

/// What one payload did to the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyUpdate {
    /// The done marker: the reply is complete
    Done,
    Updated {
        /// Conversation id carried by the payload
        conversation_id: Option<String>,
        /// Whether role, id and text were replaced
        progress: bool,
    },
    /// Unparseable, or nothing this client uses
    Ignored,
}

/// The reply being accumulated for one send.
#[derive(Debug, Clone)]
pub struct PendingReply {
    message: Message,
}

impl Default for PendingReply {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingReply {
    pub fn new() -> Self {
        Self {
            message: Message::pending_reply(),
        }
    }

    /// Apply one event payload.
    pub fn apply(&mut self, payload: &str) -> ReplyUpdate {
        if payload == DONE_MARKER {
            return ReplyUpdate::Done;
        }

        let response: GptResponse = match serde_json::from_str(payload) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unparseable stream payload");
                return ReplyUpdate::Ignored;
            }
        };

        if let Some(moderation) = &response.moderation_response {
            if moderation.flagged || moderation.blocked {
                tracing::warn!(
                    flagged = moderation.flagged,
                    blocked = moderation.blocked,
                    "Reply was flagged by moderation"
                );
            }
        }
        if let Some(error) = response.error.as_ref().filter(|e| !e.is_null()) {
            tracing::debug!(error = %error, "Stream payload carried an error field");
        }

        let conversation_id = response.conversation_id().map(str::to_string);
        if let Some(id) = &conversation_id {
            self.message.conversation_id = id.clone();
        }

        let progress = match &response.message {
            Some(msg) => {
                self.message.role = msg.author.role;
                self.message.id = msg.id.clone();
                self.message.text = msg.text().to_string();
                true
            }
            None => false,
        };

        if conversation_id.is_none() && !progress {
            return ReplyUpdate::Ignored;
        }
        ReplyUpdate::Updated {
            conversation_id,
            progress,
        }
    }

    /// The reply so far.
    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn into_message(self) -> Message {
        self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    const PAYLOAD: &str = r#"{"conversation_id":"c1","message":{"id":"m1","author":{"role":"assistant"},"content":{"content_type":"text","parts":["hi"]}}}"#;

    #[test]
    fn test_starts_empty() {
        let reply = PendingReply::new();
        assert_eq!(reply.message().role, Role::Assistant);
        assert!(reply.message().id.is_empty());
        assert!(reply.message().conversation_id.is_empty());
        assert!(reply.message().text.is_empty());
    }

    #[test]
    fn test_done_marker() {
        let mut reply = PendingReply::new();
        assert_eq!(reply.apply("[DONE]"), ReplyUpdate::Done);
        assert_eq!(reply.apply(" [DONE]"), ReplyUpdate::Ignored);
    }

    #[test]
    fn test_full_payload() {
        let mut reply = PendingReply::new();
        assert_eq!(
            reply.apply(PAYLOAD),
            ReplyUpdate::Updated {
                conversation_id: Some("c1".to_string()),
                progress: true,
            }
        );

        let msg = reply.into_message();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.id, "m1");
        assert_eq!(msg.conversation_id, "c1");
        assert_eq!(msg.text, "hi");
    }

    #[test]
    fn test_text_is_replaced_not_appended() {
        let mut reply = PendingReply::new();
        reply.apply(PAYLOAD);
        reply.apply(&PAYLOAD.replace("\"hi\"", "\"hi there\""));
        assert_eq!(reply.message().text, "hi there");
    }

    #[test]
    fn test_conversation_id_only() {
        let mut reply = PendingReply::new();
        assert_eq!(
            reply.apply(r#"{"conversation_id":"c2"}"#),
            ReplyUpdate::Updated {
                conversation_id: Some("c2".to_string()),
                progress: false,
            }
        );
        assert_eq!(reply.message().conversation_id, "c2");
    }

    #[test]
    fn test_malformed_payloads_ignored() {
        let mut reply = PendingReply::new();
        reply.apply(PAYLOAD);

        assert_eq!(reply.apply("{not json"), ReplyUpdate::Ignored);
        assert_eq!(reply.apply("{}"), ReplyUpdate::Ignored);
        assert_eq!(reply.apply(r#"{"message":{"id":"x"}}"#), ReplyUpdate::Ignored);
        assert_eq!(reply.message().text, "hi");
    }

    #[test]
    fn test_moderation_only_payload_ignored() {
        let mut reply = PendingReply::new();
        assert_eq!(
            reply.apply(r#"{"moderation_response":{"flagged":true,"blocked":true}}"#),
            ReplyUpdate::Ignored
        );
    }
}
