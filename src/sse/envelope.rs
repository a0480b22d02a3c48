//! Detection of structured error envelopes sent outside SSE framing.
//!
//! The API sometimes answers with a bare JSON object such as
//! `{"detail":{"type":"invalid_request_error","message":"...","code":"..."}}`
//! in place of an SSE frame. Each decoded chunk is tried as such an
//! envelope before it reaches the SSE parser. The check has exactly two
//! outcomes: the known shape matches, or the chunk falls through untouched.

use serde::Deserialize;

/// The only `detail.type` value recognised as an error envelope.
pub const INVALID_REQUEST_ERROR: &str = "invalid_request_error";

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    detail: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Error reported by the API inside the response stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Human-readable message from the server
    pub message: String,
    /// Machine-readable code, e.g. `invalid_api_key`
    pub code: Option<String>,
    /// Error type, always [`INVALID_REQUEST_ERROR`] today
    pub kind: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ChatGPT error {}: {} ({})",
            self.message,
            self.code.as_deref().unwrap_or("unknown"),
            self.kind
        )
    }
}

impl std::error::Error for ApiError {}

/// Try to read `chunk` as an error envelope.
///
/// Returns `None` for anything that is not JSON, and for JSON that lacks
/// `detail.type == "invalid_request_error"`.
pub fn sniff_error_envelope(chunk: &str) -> Option<ApiError> {
    let envelope: ErrorEnvelope = serde_json::from_str(chunk.trim()).ok()?;
    let detail = envelope.detail?;

    if detail.kind.as_deref() != Some(INVALID_REQUEST_ERROR) {
        return None;
    }

    Some(ApiError {
        message: detail.message.unwrap_or_default(),
        code: detail.code,
        kind: INVALID_REQUEST_ERROR.to_string(),
    })
}
