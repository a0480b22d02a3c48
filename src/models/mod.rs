//! Conversation data: history messages, the request body and the streamed
//! response payloads.

mod message;
mod request;
mod response;

pub use message::{Message, Role};
pub use request::{
    Author, ConversationRequest, WireContent, WireMessage, PLACEHOLDER_PARENT_MESSAGE_ID,
};
pub use response::{
    GptResponse, ModerationResponse, ResponseAuthor, ResponseContent, ResponseMessage,
};
