//! SSE line, record and framed-event types.

use super::envelope::ApiError;

/// Represents a parsed SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Event type declaration (e.g., "event: message")
    Event(String),
    /// Data payload (e.g., "data: {\"text\": \"hello\"}")
    Data(String),
    /// Last event id
    Id(String),
    /// Reconnection time requested by the server, as sent
    Retry(String),
    /// Empty line - signals end of event
    Empty,
    /// Comment line (starts with ':')
    Comment(String),
    /// Field this client does not know about
    Unknown { field: String, value: String },
}

/// One complete unit emitted by the SSE parser.
#[derive(Debug, Clone, PartialEq)]
pub enum SseRecord {
    /// A dispatched event. `data` holds the joined `data:` lines.
    Event {
        event: Option<String>,
        id: Option<String>,
        data: String,
    },
    /// A valid `retry:` field, in milliseconds
    ReconnectInterval(u64),
}

impl SseRecord {
    /// Data payload of an event record; `None` for reconnect intervals.
    pub fn data(&self) -> Option<&str> {
        match self {
            SseRecord::Event { data, .. } => Some(data),
            SseRecord::ReconnectInterval(_) => None,
        }
    }
}

/// What the framer hands to its consumer for each decoded chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum FramedEvent {
    /// Data string of one SSE event
    Message(String),
    /// An error envelope sent as a raw chunk instead of an SSE frame
    ApiError(ApiError),
}
