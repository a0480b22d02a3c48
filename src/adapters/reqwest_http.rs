//! Reqwest-based HTTP client adapter.
//!
//! Production implementation of [`HttpClient`] on top of `reqwest`.

use async_trait::async_trait;
use futures_util::StreamExt;
use std::time::Duration;

use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use gptchat::adapters::ReqwestHttpClient;
/// use gptchat::traits::{Headers, HttpClient};
///
/// let client = ReqwestHttpClient::new();
/// let body = client.post_stream("https://api.example.com/sse", "{}", &Headers::new()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a client whose connection attempts give up after `timeout`.
    ///
    /// Only the connect phase is bounded; a long-running response stream is
    /// never cut off by this setting.
    pub fn with_connect_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(Self::convert_error)?;
        Ok(Self { client })
    }

    /// Create a new ReqwestHttpClient with a custom reqwest::Client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying reqwest::Client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Convert reqwest error to HttpError.
    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Apply headers to a request builder.
    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the failure reason for a non-success response: the body when it
/// could be read and is non-empty, the canonical status phrase otherwise.
fn failure_reason(status: reqwest::StatusCode, body: Result<String, reqwest::Error>) -> String {
    let phrase = || {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    };
    match body {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => phrase(),
        Err(e) => {
            tracing::debug!("Failed to read error body for HTTP {}: {}", status, e);
            phrase()
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        let builder = self.client.post(url).body(body.to_string());
        let builder = Self::apply_headers(builder, headers);

        let response = builder.send().await.map_err(Self::convert_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let message = failure_reason(status, response.text().await);
            return Err(HttpError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let stream = response.bytes_stream().map(|result| {
            result.map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout(e.to_string())
                } else {
                    HttpError::Io(e.to_string())
                }
            })
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reqwest_http_client_default() {
        let client = ReqwestHttpClient::default();
        let _ = client.inner();
    }

    #[test]
    fn test_reqwest_http_client_with_connect_timeout() {
        let client = ReqwestHttpClient::with_connect_timeout(Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_apply_headers() {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Authorization".to_string(), "Bearer token".to_string());

        let client = reqwest::Client::new();
        let builder = client.post("https://example.com");
        let request = ReqwestHttpClient::apply_headers(builder, &headers)
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer token"
        );
    }

    #[test]
    fn test_failure_reason_prefers_body() {
        let reason = failure_reason(reqwest::StatusCode::UNAUTHORIZED, Ok("bad token".to_string()));
        assert_eq!(reason, "bad token");
    }

    #[test]
    fn test_failure_reason_empty_body_uses_phrase() {
        let reason = failure_reason(reqwest::StatusCode::UNAUTHORIZED, Ok("  ".to_string()));
        assert_eq!(reason, "Unauthorized");
    }

    #[tokio::test]
    async fn test_post_stream_connection_refused() {
        let client = ReqwestHttpClient::new();
        let result = client
            .post_stream("http://127.0.0.1:59999/test", "{}", &Headers::new())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_post_stream_invalid_url() {
        let client = ReqwestHttpClient::new();
        let result = client
            .post_stream("not-a-valid-url", "{}", &Headers::new())
            .await;
        assert!(result.is_err());
    }
}
