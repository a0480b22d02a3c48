//! Session configuration.
//!
//! Settings can be built up in code or read from `GPTCHAT_*` environment
//! variables. Empty variables count as unset.

use std::fmt;
use std::time::Duration;

use crate::error::{ChatError, ChatResult};

/// Endpoint used when no proxy is configured.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Model requested when none is configured.
pub const DEFAULT_MODEL: &str = "text-davinci-002-render-sha";

pub const ENV_ACCESS_TOKEN: &str = "GPTCHAT_ACCESS_TOKEN";
pub const ENV_PROXY: &str = "GPTCHAT_PROXY";
pub const ENV_ORGANIZATION: &str = "GPTCHAT_ORGANIZATION";
pub const ENV_MODEL: &str = "GPTCHAT_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "GPTCHAT_TIMEOUT_SECS";

/// Configuration for a [`ChatSession`](crate::session::ChatSession).
///
/// # Example
///
/// ```ignore
/// use gptchat::config::ChatConfig;
///
/// let config = ChatConfig::default()
///     .with_token("sk-...")
///     .with_organization("org-123");
/// ```
#[derive(Clone)]
pub struct ChatConfig {
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Replaces the default endpoint when set
    pub proxy: Option<String>,
    /// Sent as `OpenAI-Organization` when set
    pub organization: Option<String>,
    pub model: String,
    /// Connect timeout; reading the stream is not bounded
    pub request_timeout: Option<Duration>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            token: None,
            proxy: None,
            organization: None,
            model: DEFAULT_MODEL.to_string(),
            request_timeout: None,
        }
    }
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("proxy", &self.proxy)
            .field("organization", &self.organization)
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ChatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> ChatResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> ChatResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        config.token = get(ENV_ACCESS_TOKEN);
        config.proxy = get(ENV_PROXY);
        config.organization = get(ENV_ORGANIZATION);
        if let Some(model) = get(ENV_MODEL) {
            config.model = model;
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ChatError::Config(format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// The URL requests go to: the proxy if set, otherwise the default.
    pub fn endpoint(&self) -> &str {
        self.proxy.as_deref().unwrap_or(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default() {
        let config = ChatConfig::default();
        assert_eq!(config.token, None);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.endpoint(), DEFAULT_API_URL);
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_builder() {
        let config = ChatConfig::new()
            .with_token("tok")
            .with_proxy("http://localhost:9000/chat")
            .with_organization("org-1")
            .with_model("gpt-4")
            .with_request_timeout(Duration::from_secs(5));

        assert_eq!(config.token.as_deref(), Some("tok"));
        assert_eq!(config.endpoint(), "http://localhost:9000/chat");
        assert_eq!(config.organization.as_deref(), Some("org-1"));
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_from_lookup() {
        let config = ChatConfig::from_lookup(lookup(&[
            (ENV_ACCESS_TOKEN, "tok"),
            (ENV_PROXY, "http://proxy.local"),
            (ENV_MODEL, "gpt-4"),
            (ENV_TIMEOUT_SECS, " 30 "),
        ]))
        .unwrap();

        assert_eq!(config.token.as_deref(), Some("tok"));
        assert_eq!(config.proxy.as_deref(), Some("http://proxy.local"));
        assert_eq!(config.organization, None);
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = ChatConfig::from_lookup(lookup(&[
            (ENV_ACCESS_TOKEN, ""),
            (ENV_MODEL, "  "),
            (ENV_ORGANIZATION, ""),
        ]))
        .unwrap();

        assert_eq!(config.token, None);
        assert_eq!(config.organization, None);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_bad_timeout() {
        let err = ChatConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
        assert!(err.to_string().contains(ENV_TIMEOUT_SECS));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ChatConfig::new().with_token("secret-token");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
