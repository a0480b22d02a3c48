//! Mock HTTP client for testing.
//!
//! Returns scripted body streams or errors and records every request so
//! tests can assert on URL, headers and payload.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body
    pub body: String,
}

impl RecordedRequest {
    /// Parse the recorded body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a body made of these chunks, in order
    Stream(Vec<Bytes>),
    /// Yield these chunks, then fail the body read with the error
    StreamThenError(Vec<Bytes>, HttpError),
    /// Fail the request before any body is produced
    Error(HttpError),
}

impl MockResponse {
    /// Body made of string chunks.
    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockResponse::Stream(
            chunks
                .into_iter()
                .map(|c| Bytes::from(c.into()))
                .collect(),
        )
    }

    /// Non-success status with the given body text.
    pub fn status(status: u16, message: &str) -> Self {
        MockResponse::Error(HttpError::ServerError {
            status,
            message: message.to_string(),
        })
    }
}

/// Mock HTTP client for testing.
///
/// Responses are matched by exact URL first, then by prefix. Responses
/// queued with [`MockHttpClient::push_response`] take priority and are
/// consumed one per request, which is how multi-turn tests script a
/// different reply for each send.
///
/// # Example
///
/// ```ignore
/// use gptchat::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_default_response(MockResponse::chunks(["data: [DONE]\n\n"]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// One-shot responses consumed in order
    queued: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a specific URL.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        responses.insert(url.to_string(), response);
    }

    /// Queue a response for the next request, whatever its URL.
    pub fn push_response(&self, response: MockResponse) {
        self.queued.lock().unwrap_or_else(PoisonError::into_inner).push_back(response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap_or_else(PoisonError::into_inner);
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn record_request(&self, url: &str, headers: &Headers, body: &str) {
        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
        requests.push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
            body: body.to_string(),
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        if let Some(response) = self.queued.lock().unwrap_or_else(PoisonError::into_inner).pop_front() {
            return Some(response);
        }

        let responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }

        self.default_response.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.record_request(url, headers, body);

        match self.get_response(url) {
            Some(MockResponse::Stream(chunks)) => {
                let stream = futures::stream::iter(chunks.into_iter().map(Ok));
                Ok(Box::pin(stream))
            }
            Some(MockResponse::StreamThenError(chunks, err)) => {
                let items = chunks
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(err)));
                Ok(Box::pin(futures::stream::iter(items)))
            }
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    async fn collect(mut stream: ByteStream) -> Vec<Result<Bytes, HttpError>> {
        let mut items = Vec::new();
        while let Some(item) = stream.next().await {
            items.push(item);
        }
        items
    }

    #[tokio::test]
    async fn test_post_stream_with_chunks() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/stream",
            MockResponse::chunks(["chunk1", "chunk2", "chunk3"]),
        );

        let stream = client
            .post_stream("https://example.com/stream", "{}", &Headers::new())
            .await
            .unwrap();
        let chunks = collect(stream).await;

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], Ok(Bytes::from("chunk1")));
        assert_eq!(chunks[2], Ok(Bytes::from("chunk3")));
    }

    #[tokio::test]
    async fn test_stream_then_error() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::StreamThenError(
            vec![Bytes::from("partial")],
            HttpError::Io("reset".to_string()),
        ));

        let stream = client
            .post_stream("https://example.com", "{}", &Headers::new())
            .await
            .unwrap();
        let items = collect(stream).await;

        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert_eq!(items[1], Err(HttpError::Io("reset".to_string())));
    }

    #[tokio::test]
    async fn test_status_error() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::status(401, "Unauthorized"));

        let result = client
            .post_stream("https://example.com", "{}", &Headers::new())
            .await;

        match result {
            Err(HttpError::ServerError { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Unauthorized");
            }
            _ => panic!("Expected ServerError"),
        }
    }

    #[tokio::test]
    async fn test_no_response_configured() {
        let client = MockHttpClient::new();
        let result = client
            .post_stream("https://example.com/missing", "{}", &Headers::new())
            .await;
        assert!(matches!(result, Err(HttpError::Other(_))));
    }

    #[tokio::test]
    async fn test_queued_responses_consumed_in_order() {
        let client = MockHttpClient::new();
        client.push_response(MockResponse::chunks(["first"]));
        client.push_response(MockResponse::chunks(["second"]));
        client.set_default_response(MockResponse::chunks(["fallback"]));

        let mut bodies = Vec::new();
        for _ in 0..3 {
            let stream = client
                .post_stream("https://example.com", "{}", &Headers::new())
                .await
                .unwrap();
            let chunks = collect(stream).await;
            bodies.push(chunks[0].clone().unwrap());
        }

        assert_eq!(bodies, vec![
            Bytes::from("first"),
            Bytes::from("second"),
            Bytes::from("fallback"),
        ]);
    }

    #[tokio::test]
    async fn test_requests_recorded() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::chunks(Vec::<String>::new()));

        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), "Bearer token123".to_string());

        client
            .post_stream("https://example.com/api", r#"{"a":1}"#, &headers)
            .await
            .unwrap();

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://example.com/api");
        assert_eq!(
            requests[0].headers.get("Authorization"),
            Some(&"Bearer token123".to_string())
        );
        assert_eq!(requests[0].json()["a"], 1);

        client.clear_requests();
        assert!(client.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::chunks(["x"]));
        let cloned = client.clone();

        cloned
            .post_stream("https://example.com", "{}", &Headers::new())
            .await
            .unwrap();

        assert_eq!(client.get_requests().len(), 1);
    }
}
