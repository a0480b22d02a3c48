//! Error handling for chat operations.
//!
//! - **Error Categories**: high-level classification for handling decisions
//! - **Unified Error Type**: [`ChatError`] covers every way a send can fail
//! - **Result Type Alias**: [`ChatResult<T>`] for consistent return types
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, timeout, broken body | Yes |
//! | Auth | 401 / 403 | No |
//! | Server | 5xx, stream ended early | Yes |
//! | Client | Other 4xx, unencodable request | No |
//! | Configuration | Bad settings | No |

mod category;
mod chat_error;
mod result;

// Re-export all public types
pub use category::ErrorCategory;
pub use chat_error::ChatError;
pub use result::ChatResult;
