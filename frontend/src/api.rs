use gloo_net::http::Request;

use crate::errors::{ChatError, TransportError};
use crate::models::{ChatReply, ChatRequest};

/// Status the chat endpoint uses to signal rate limiting.
pub const RATE_LIMITED_STATUS: u16 = 429;

/// Status line and body of a chat endpoint response. The body is only kept
/// for successful statuses; error bodies are ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The single network boundary of the widget.
#[allow(async_fn_in_trait)]
pub trait ChatTransport {
    /// Issues one `POST /api/chat`. `Err` means no response was obtained.
    async fn post_chat(&self, request: &ChatRequest) -> Result<HttpReply, TransportError>;
}

/// Builds the chat endpoint URL from the configured API base. An empty base
/// yields a relative URL.
pub fn chat_endpoint(api_base: &str) -> String {
    format!("{}/api/chat", api_base.trim().trim_end_matches('/'))
}

/// Turns a raw response into a reply or a classified error.
pub fn classify(reply: HttpReply) -> Result<ChatReply, ChatError> {
    if reply.status == RATE_LIMITED_STATUS {
        return Err(ChatError::RateLimited);
    }
    if !reply.is_success() {
        return Err(ChatError::RequestFailed { status: reply.status });
    }
    Ok(serde_json::from_str::<ChatReply>(&reply.body)?)
}

/// Talks to the chat endpoint with `fetch` through gloo-net.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    endpoint: String,
}

impl HttpTransport {
    pub fn new(api_base: &str) -> Self {
        Self { endpoint: chat_endpoint(api_base) }
    }
}

impl ChatTransport for HttpTransport {
    async fn post_chat(&self, request: &ChatRequest) -> Result<HttpReply, TransportError> {
        let resp = Request::post(&self.endpoint)
            .json(request)
            .map_err(|e| TransportError::new(format!("Serialize error: {e}")))?
            .send()
            .await
            .map_err(|e| TransportError::new(format!("Network error: {e}")))?;

        let status = resp.status();
        if !resp.ok() {
            return Ok(HttpReply::new(status, String::new()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::new(format!("Body error: {e}")))?;
        Ok(HttpReply::new(status, body))
    }
}
