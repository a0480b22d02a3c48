use crate::models::Message;
use crate::sse::ApiError;

/// Notifications published while a message is being sent.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The user message was added to the history; sent before the request.
    Prompt(Message),
    /// The reply so far, after each content update.
    Progress(Message),
    /// The server reported an error inside the stream. The send carries on.
    ApiError(ApiError),
}
