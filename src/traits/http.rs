//! HTTP transport trait abstraction.
//!
//! The session only ever needs one kind of request: a POST whose response
//! body is consumed incrementally. Keeping that behind a trait lets the
//! streaming pipeline run against an in-memory mock in tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Body of a streaming response, yielded chunk by chunk in arrival order.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// HTTP transport errors.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// Connection failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// Server returned a non-success status.
    ///
    /// `message` is the response body, or the canonical status phrase
    /// when the body could not be read.
    ServerError { status: u16, message: String },
    /// Reading the response body failed mid-stream
    Io(String),
    /// Invalid URL
    InvalidUrl(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::ServerError { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for the streaming HTTP transport.
///
/// Implementations must check the response status before handing back the
/// body: a non-2xx response is reported as [`HttpError::ServerError`] and no
/// body stream is returned.
///
/// # Example
///
/// ```ignore
/// use gptchat::traits::{HttpClient, Headers};
/// use futures::StreamExt;
///
/// async fn dump<C: HttpClient>(client: &C) -> Result<(), gptchat::traits::HttpError> {
///     let mut body = client.post_stream("https://example.com/sse", "{}", &Headers::new()).await?;
///     while let Some(chunk) = body.next().await {
///         println!("{} bytes", chunk?.len());
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a POST request and return the response body as a stream.
    ///
    /// # Arguments
    /// * `url` - The URL to request
    /// * `body` - Request body as a string
    /// * `headers` - Request headers
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError>;
}
