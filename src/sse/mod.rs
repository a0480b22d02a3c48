//! SSE (Server-Sent Events) response framing
//!
//! Turns the streamed body of a chat completion request into discrete
//! event payloads. SSE format consists of:
//! - `event: <type>` - event type line
//! - `data: <payload>` - data line, joined with `\n` when repeated
//! - `id: <id>` / `retry: <ms>` - bookkeeping fields
//! - Empty line - signals end of event
//! - Lines starting with `:` - comments (ignored)
//!
//! A chunk can also be a bare JSON error envelope instead of SSE text;
//! those are surfaced as [`FramedEvent::ApiError`].
//!
//! # Module structure
//! - `decoder` - UTF-8 decoding that survives split characters
//! - `envelope` - Error envelope detection
//! - `events` - Line, record and framed event types
//! - `parser` - Incremental line/frame parser
//! - `framer` - Chunk pipeline, async stream and `fetch_sse`

mod decoder;
mod envelope;
mod events;
mod framer;
mod parser;

// Re-export public types
pub use decoder::Utf8Decoder;
pub use envelope::{sniff_error_envelope, ApiError, INVALID_REQUEST_ERROR};
pub use events::{FramedEvent, SseLine, SseRecord};
pub use framer::{fetch_sse, fetch_sse_with, frame_stream, FramedStream, SseFramer};
pub use parser::{parse_sse_line, SseParser};

/// Payload that marks the end of a completion stream.
pub const DONE_MARKER: &str = "[DONE]";
