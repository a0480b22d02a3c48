//! Turns a response body into a stream of framed events.
//!
//! Each chunk is decoded, checked for an error envelope, and otherwise fed
//! to the incremental SSE parser. [`SseFramer`] does this synchronously;
//! [`frame_stream`] wraps it around an async body with `stream::unfold`.

use std::collections::VecDeque;
use std::pin::Pin;

use futures::stream::{self, Stream};
use futures_util::StreamExt;

use super::decoder::Utf8Decoder;
use super::envelope::{sniff_error_envelope, ApiError};
use super::events::{FramedEvent, SseRecord};
use super::parser::SseParser;
use crate::error::ChatResult;
use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// Framed events read from one response body.
pub type FramedStream = Pin<Box<dyn Stream<Item = Result<FramedEvent, HttpError>> + Send>>;

/// Chunk-at-a-time framer for one response body.
#[derive(Debug, Default)]
pub struct SseFramer {
    decoder: Utf8Decoder,
    parser: SseParser,
}

impl SseFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one body chunk, returning the events it completes.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<FramedEvent> {
        let text = self.decoder.decode(bytes);
        self.feed_text(&text)
    }

    /// Flush at end of body. An unterminated trailing frame is dropped.
    pub fn finish(&mut self) -> Vec<FramedEvent> {
        let tail = self.decoder.finish();
        let mut events = self.feed_text(&tail);
        events.extend(self.parser.finish().and_then(forward));
        events
    }

    fn feed_text(&mut self, text: &str) -> Vec<FramedEvent> {
        if text.is_empty() {
            return Vec::new();
        }

        if let Some(err) = sniff_error_envelope(text) {
            return vec![FramedEvent::ApiError(err)];
        }

        self.parser.feed(text).into_iter().filter_map(forward).collect()
    }
}

fn forward(record: SseRecord) -> Option<FramedEvent> {
    match record {
        SseRecord::Event { data, .. } => Some(FramedEvent::Message(data)),
        SseRecord::ReconnectInterval(ms) => {
            tracing::debug!(retry_ms = ms, "Ignoring SSE reconnect interval");
            None
        }
    }
}

struct FrameState {
    /// `None` once the body is exhausted or failed
    body: Option<ByteStream>,
    framer: SseFramer,
    pending: VecDeque<FramedEvent>,
}

/// Frame a response body.
///
/// The returned stream owns `body` and drops it as soon as it ends, fails,
/// or the stream itself is dropped. A read error is yielded once and ends
/// the stream.
pub fn frame_stream(body: ByteStream) -> FramedStream {
    let state = FrameState {
        body: Some(body),
        framer: SseFramer::new(),
        pending: VecDeque::new(),
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.pending.pop_front() {
                return Some((Ok(event), state));
            }

            let Some(body) = state.body.as_mut() else {
                return None;
            };
            let next = body.next().await;

            match next {
                Some(Ok(chunk)) => {
                    let events = state.framer.feed(&chunk);
                    state.pending.extend(events);
                }
                Some(Err(e)) => {
                    state.body = None;
                    return Some((Err(e), state));
                }
                None => {
                    state.body = None;
                    let events = state.framer.finish();
                    state.pending.extend(events);
                }
            }
        }
    }))
}

/// POST `body` to `url` and frame the streamed response.
///
/// A non-success status fails here with [`crate::error::ChatError::Status`]
/// before any of the body is read.
pub async fn fetch_sse(
    http: &dyn HttpClient,
    url: &str,
    body: &str,
    headers: &Headers,
) -> ChatResult<FramedStream> {
    let response = http.post_stream(url, body, headers).await?;
    Ok(frame_stream(response))
}

/// Callback flavour of [`fetch_sse`].
///
/// Runs the whole stream, handing each message to `on_event`. Error
/// envelopes go to `on_error`, or to the log when no handler is given;
/// they never end the stream.
pub async fn fetch_sse_with<F>(
    http: &dyn HttpClient,
    url: &str,
    body: &str,
    headers: &Headers,
    mut on_event: F,
    mut on_error: Option<&mut (dyn FnMut(ApiError) + Send)>,
) -> ChatResult<()>
where
    F: FnMut(String),
{
    let mut events = fetch_sse(http, url, body, headers).await?;

    while let Some(event) = events.next().await {
        match event? {
            FramedEvent::Message(data) => on_event(data),
            FramedEvent::ApiError(err) => match on_error.as_deref_mut() {
                Some(handler) => handler(err),
                None => tracing::error!("{}", err),
            },
        }
    }

    Ok(())
}
