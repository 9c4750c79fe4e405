//! Chat Session
//!
//! Transcript and send flow for the chat widget. Replies come from
//! `POST /api/chat`; failures become an inline error message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ChatConfig;

/// Body of `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Reply from the chat endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub text: String,
    #[serde(default)]
    pub audio_url: Option<String>,
}

/// Errors that can occur talking to the chat endpoint
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Chat API returned HTTP {0}")]
    Status(u16),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Chat reply had no text")]
    EmptyReply,
}

/// Anything that can answer a chat message
#[async_trait(?Send)]
pub trait ChatBackend {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Ai,
    User,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
    pub audio_url: Option<String>,
    pub is_error: bool,
}

impl ChatMessage {
    fn user(text: &str) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.to_string(),
            audio_url: None,
            is_error: false,
        }
    }

    fn ai(text: &str, audio_url: Option<String>) -> Self {
        Self {
            speaker: Speaker::Ai,
            text: text.to_string(),
            audio_url,
            is_error: false,
        }
    }

    fn error(text: &str) -> Self {
        Self {
            is_error: true,
            ..Self::ai(text, None)
        }
    }
}

/// Transcript plus the typing indicator
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    /// Requests sent and not yet answered
    pending: usize,
    error_message: String,
}

impl ChatSession {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            messages: vec![ChatMessage::ai(&config.greeting, None)],
            pending: 0,
            error_message: config.error_message.clone(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True while any request is still waiting for its reply
    pub fn is_typing(&self) -> bool {
        self.pending > 0
    }

    /// Record the user's message and show the typing indicator.
    /// Blank input is ignored.
    pub fn begin_send(&mut self, input: &str) -> Option<ChatRequest> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::user(message));
        self.pending += 1;
        Some(ChatRequest {
            message: message.to_string(),
        })
    }

    /// Settle one pending request and append the reply or the error message.
    /// The indicator stays up while other requests are outstanding.
    pub fn finish_send(&mut self, result: Result<ChatReply, ChatError>) -> &ChatMessage {
        self.pending = self.pending.saturating_sub(1);

        let message = match result.and_then(|reply| {
            if reply.text.trim().is_empty() {
                Err(ChatError::EmptyReply)
            } else {
                Ok(reply)
            }
        }) {
            Ok(reply) => ChatMessage::ai(&reply.text, reply.audio_url),
            Err(e) => {
                tracing::warn!("Chat request failed: {}", e);
                ChatMessage::error(&self.error_message)
            }
        };

        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Send a message and wait for the reply
    pub async fn send<B: ChatBackend>(&mut self, backend: &B, input: &str) -> Option<&ChatMessage> {
        let request = self.begin_send(input)?;
        let result = backend.send(&request).await;
        Some(self.finish_send(result))
    }
}

/// Chat backend posting to a running site
#[cfg(feature = "native")]
pub struct HttpChatBackend {
    client: reqwest::Client,
    url: String,
}

#[cfg(feature = "native")]
impl HttpChatBackend {
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: format!("{}/api/chat", base_url.trim_end_matches('/')),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(feature = "native")]
#[async_trait(?Send)]
impl ChatBackend for HttpChatBackend {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        tracing::debug!("POST {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ChatError::Status(response.status().as_u16()));
        }

        response
            .json::<ChatReply>()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct ScriptedBackend {
        reply: Result<ChatReply, ChatError>,
        seen: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl ChatBackend for ScriptedBackend {
        async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
            self.seen.borrow_mut().push(request.message.clone());
            self.reply.clone()
        }
    }

    fn backend(reply: Result<ChatReply, ChatError>) -> ScriptedBackend {
        ScriptedBackend {
            reply,
            seen: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn test_session_starts_with_greeting() {
        let session = ChatSession::new(&ChatConfig::default());
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].speaker, Speaker::Ai);
        assert!(!session.is_typing());
    }

    #[test]
    fn test_reply_decodes_camel_case_audio_url() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"text": "Hello", "audioUrl": "/static/audio/1.mp3"}"#).unwrap();
        assert_eq!(reply.audio_url.as_deref(), Some("/static/audio/1.mp3"));

        let reply: ChatReply = serde_json::from_str(r#"{"text": "Hi"}"#).unwrap();
        assert!(reply.audio_url.is_none());
    }

    #[tokio::test]
    async fn test_send_appends_user_and_ai_messages() {
        let backend = backend(Ok(ChatReply {
            text: "I design things.".into(),
            audio_url: Some("/audio/a.mp3".into()),
        }));
        let mut session = ChatSession::new(&ChatConfig::default());

        let reply = session.send(&backend, "  What do you do?  ").await.unwrap();
        assert_eq!(reply.text, "I design things.");
        assert_eq!(reply.audio_url.as_deref(), Some("/audio/a.mp3"));

        assert_eq!(backend.seen.borrow().as_slice(), ["What do you do?"]);
        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[1].speaker, Speaker::User);
        assert!(!session.is_typing());
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let backend = backend(Ok(ChatReply { text: "x".into(), audio_url: None }));
        let mut session = ChatSession::new(&ChatConfig::default());

        assert!(session.send(&backend, "   ").await.is_none());
        assert!(backend.seen.borrow().is_empty());
        assert_eq!(session.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_shows_inline_error() {
        let backend = backend(Err(ChatError::Status(502)));
        let mut session = ChatSession::new(&ChatConfig::default());

        let reply = session.send(&backend, "hello").await.unwrap();
        assert!(reply.is_error);
        assert_eq!(reply.text, ChatConfig::default().error_message);
        assert!(!session.is_typing());
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_http_backend_url() {
        let backend = HttpChatBackend::new("http://localhost:8080/", std::time::Duration::from_secs(5)).unwrap();
        assert_eq!(backend.url(), "http://localhost:8080/api/chat");
    }

    #[test]
    fn test_typing_stays_up_until_every_reply_arrives() {
        let mut session = ChatSession::new(&ChatConfig::default());
        session.begin_send("one").unwrap();
        session.begin_send("two").unwrap();

        session.finish_send(Ok(ChatReply { text: "first".into(), audio_url: None }));
        assert!(session.is_typing());

        session.finish_send(Err(ChatError::Network("reset".into())));
        assert!(!session.is_typing());
        assert_eq!(session.messages().len(), 5);
    }

    #[test]
    fn test_blank_reply_counts_as_failure() {
        let mut session = ChatSession::new(&ChatConfig::default());
        session.begin_send("hello").unwrap();
        assert!(session.is_typing());

        let reply = session.finish_send(Ok(ChatReply { text: " ".into(), audio_url: None }));
        assert!(reply.is_error);
    }
}
