//! The error type returned by chat operations.

use thiserror::Error;

use super::category::ErrorCategory;
use crate::models::Message;
use crate::traits::HttpError;

/// Everything that can make a send fail.
///
/// Error envelopes reported inside an otherwise healthy stream are not
/// here: they arrive as session events and never fail the send.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The server answered with a non-success status.
    #[error("ChatGPT error {status}: {reason}")]
    Status { status: u16, reason: String },

    /// The request could not be made or the body could not be read.
    #[error(transparent)]
    Http(HttpError),

    /// The body ended without the done marker.
    #[error("response stream ended before [DONE]")]
    StreamEnded {
        /// What had been received up to that point
        partial: Message,
    },

    /// The request payload could not be serialized.
    #[error("failed to encode request: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ChatError {
    /// HTTP status, for status errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the credentials were rejected.
    pub fn requires_reauth(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Classify this error for handling decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::Status { status, .. } => match *status {
                401 | 403 => ErrorCategory::Auth,
                s if s >= 500 => ErrorCategory::Server,
                _ => ErrorCategory::Client,
            },
            ChatError::Http(HttpError::InvalidUrl(_)) => ErrorCategory::Configuration,
            ChatError::Http(_) => ErrorCategory::Network,
            ChatError::StreamEnded { .. } => ErrorCategory::Server,
            ChatError::Json(_) => ErrorCategory::Client,
            ChatError::Config(_) => ErrorCategory::Configuration,
        }
    }

    /// Returns true if retrying the same send may succeed.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

impl From<HttpError> for ChatError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, message } => ChatError::Status {
                status,
                reason: message,
            },
            other => ChatError::Http(other),
        }
    }
}
