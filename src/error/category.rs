//! Error category classification.
//!
//! Lets callers decide what to do about a failed send without matching on
//! every [`ChatError`](super::ChatError) variant.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, timeout or a broken body stream.
    /// Generally transient and retryable.
    Network,

    /// The server rejected the credentials (401/403).
    Auth,

    /// Backend errors (5xx) and streams that end without the done marker.
    Server,

    /// The request itself was rejected (other 4xx) or could not be built.
    Client,

    /// Missing or invalid settings.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient
    /// and the operation can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Short hint shown to CLI users.
    pub fn hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your connection and try again.",
            ErrorCategory::Auth => "Check GPTCHAT_ACCESS_TOKEN; it may have expired.",
            ErrorCategory::Server => "The service had a problem. Try again shortly.",
            ErrorCategory::Client => "The request was rejected.",
            ErrorCategory::Configuration => "Check your settings.",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
