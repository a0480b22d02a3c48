//! Conversation session.
//!
//! [`ChatSession`] owns the message history and the conversation id, and
//! runs one request/stream exchange per [`ChatSession::send_message`].
//! Observers follow along through [`ChatSession::subscribe`].

mod events;
mod history;
mod reply;

pub use events::SessionEvent;
pub use history::HistoryKey;
pub use reply::{PendingReply, ReplyUpdate};

use std::fmt;
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc::{self, error::SendError, UnboundedReceiver, UnboundedSender};

use crate::adapters::ReqwestHttpClient;
use crate::config::{ChatConfig, DEFAULT_API_URL, DEFAULT_MODEL};
use crate::error::{ChatError, ChatResult};
use crate::models::{ConversationRequest, Message, Role};
use crate::sse::{fetch_sse, ApiError, FramedEvent};
use crate::traits::{Headers, HttpClient};

/// A conversation with the chat completion API.
///
/// Sends take `&mut self`, so a session runs at most one exchange at a time.
///
/// # Example
///
/// ```ignore
/// use gptchat::session::{ChatSession, SessionEvent};
///
/// let mut session = ChatSession::new("token");
/// let mut events = session.subscribe();
/// let reply = session.send_message("Hello").await?;
/// println!("{}", reply.text);
/// ```
pub struct ChatSession {
    token: String,
    proxy: Option<String>,
    organization: Option<String>,
    /// Model requested for every send
    pub model: String,
    conversation_id: Option<String>,
    history: Vec<Message>,
    http: Arc<dyn HttpClient>,
    events: Option<UnboundedSender<SessionEvent>>,
}

impl fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSession")
            .field("token", &"<redacted>")
            .field("proxy", &self.proxy)
            .field("organization", &self.organization)
            .field("model", &self.model)
            .field("conversation_id", &self.conversation_id)
            .field("history_len", &self.history.len())
            .finish()
    }
}

impl ChatSession {
    /// Create a session that talks to the API through reqwest.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_client(token, Arc::new(ReqwestHttpClient::new()))
    }

    /// Create a session on top of any [`HttpClient`].
    pub fn with_client(token: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            token: token.into(),
            proxy: None,
            organization: None,
            model: DEFAULT_MODEL.to_string(),
            conversation_id: None,
            history: Vec::new(),
            http,
            events: None,
        }
    }

    /// Create a session from configuration. Fails without a token.
    pub fn from_config(config: ChatConfig) -> ChatResult<Self> {
        let http = match config.request_timeout {
            Some(timeout) => ReqwestHttpClient::with_connect_timeout(timeout)?,
            None => ReqwestHttpClient::new(),
        };
        Self::from_config_with_client(config, Arc::new(http))
    }

    /// Like [`ChatSession::from_config`], with a caller-supplied client.
    pub fn from_config_with_client(
        config: ChatConfig,
        http: Arc<dyn HttpClient>,
    ) -> ChatResult<Self> {
        let token = config
            .token
            .ok_or_else(|| ChatError::Config("an access token is required".to_string()))?;

        let mut session = Self::with_client(token, http);
        session.model = config.model;
        session.use_proxy(config.proxy);
        session.use_organization(config.organization);
        Ok(session)
    }

    /// Append a message with no id, in the current conversation.
    pub fn add_message(&mut self, role: Role, text: impl Into<String>) {
        let message = Message::new(role, text)
            .in_conversation(self.conversation_id.clone().unwrap_or_default());
        self.history.push(message);
    }

    /// Send requests to `proxy` instead of the default endpoint.
    pub fn use_proxy(&mut self, proxy: Option<String>) {
        self.proxy = proxy;
    }

    /// Send an `OpenAI-Organization` header when set.
    pub fn use_organization(&mut self, organization: Option<String>) {
        self.organization = organization;
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Remove one message by position or by id. Returns the removed message,
    /// or `None` when nothing matched.
    pub fn remove_from_history(&mut self, key: impl Into<HistoryKey>) -> Option<Message> {
        history::remove(&mut self.history, &key.into())
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.history.last()
    }

    /// Conversation id assigned by the server, once one has been seen.
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn set_conversation_id(&mut self, conversation_id: Option<String>) {
        self.conversation_id = conversation_id;
    }

    /// Where requests are sent.
    pub fn endpoint(&self) -> &str {
        self.proxy.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Receive the events of every following send.
    ///
    /// Only the most recent subscriber receives events.
    pub fn subscribe(&mut self) -> UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    /// Send `text` as a user message and stream the reply.
    ///
    /// Resolves with the reply once the done marker arrives; the reply is
    /// also appended to the history. Error envelopes in the stream are
    /// published as [`SessionEvent::ApiError`] and do not fail the send.
    ///
    /// # Errors
    ///
    /// - [`ChatError::Status`] for a non-success response
    /// - [`ChatError::Http`] when the request or a body read fails
    /// - [`ChatError::StreamEnded`] when the body ends without the marker
    pub async fn send_message(&mut self, text: impl Into<String>) -> ChatResult<Message> {
        self.add_message(Role::User, text);
        if let Some(prompt) = self.history.last().cloned() {
            let _ = self.emit(SessionEvent::Prompt(prompt));
        }

        let request = ConversationRequest::from_history(&self.history, &self.model);
        let body = serde_json::to_string(&request)?;
        let url = self.endpoint().to_string();
        let headers = self.headers();

        tracing::debug!(
            url = %url,
            model = %self.model,
            messages = self.history.len(),
            "Sending conversation request"
        );

        let mut events = fetch_sse(self.http.as_ref(), &url, &body, &headers).await?;
        let mut reply = PendingReply::new();

        while let Some(event) = events.next().await {
            match event? {
                FramedEvent::Message(data) => match reply.apply(&data) {
                    ReplyUpdate::Done => {
                        let message = reply.into_message();
                        self.history.push(message.clone());
                        return Ok(message);
                    }
                    ReplyUpdate::Updated {
                        conversation_id,
                        progress,
                    } => {
                        if conversation_id.is_some() {
                            self.conversation_id = conversation_id;
                        }
                        if progress {
                            let _ = self.emit(SessionEvent::Progress(reply.message().clone()));
                        }
                    }
                    ReplyUpdate::Ignored => {}
                },
                FramedEvent::ApiError(err) => self.report_api_error(err),
            }
        }

        let partial = reply.into_message();
        tracing::warn!(
            received = partial.text.len(),
            "Response stream ended before the done marker"
        );
        Err(ChatError::StreamEnded { partial })
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Authorization".to_string(), format!("Bearer {}", self.token));
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        if let Some(org) = &self.organization {
            headers.insert("OpenAI-Organization".to_string(), org.clone());
        }
        headers
    }

    /// Publish to the subscriber. Hands the event back if nobody is
    /// listening.
    fn emit(&mut self, event: SessionEvent) -> Result<(), SessionEvent> {
        let Some(tx) = &self.events else {
            return Err(event);
        };
        match tx.send(event) {
            Ok(()) => Ok(()),
            Err(SendError(event)) => {
                self.events = None;
                Err(event)
            }
        }
    }

    fn report_api_error(&mut self, err: ApiError) {
        if let Err(SessionEvent::ApiError(err)) = self.emit(SessionEvent::ApiError(err)) {
            tracing::error!(code = ?err.code, "{}", err);
        }
    }
}
