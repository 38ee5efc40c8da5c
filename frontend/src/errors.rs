use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::i18n::Strings;

/// Failure to reach or use browser storage. Never shown to the user: the
/// session store turns these into "no persistence this time".
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read '{key}': {message}")]
    Read { key: String, message: String },

    #[error("Failed to write '{key}': {message}")]
    Write { key: String, message: String },

    #[error("Failed to remove '{key}': {message}")]
    Remove { key: String, message: String },
}

/// No response was obtained from the chat endpoint.
#[derive(Debug, Error)]
#[error("Transport error: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError(message.into())
    }
}

/// Classified outcome of a failed chat exchange.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Rate limited by the chat endpoint")]
    RateLimited,

    #[error("Chat endpoint answered with status {status}")]
    RequestFailed { status: u16 },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Malformed reply: {0}")]
    InvalidReply(#[from] serde_json::Error),
}

impl ChatError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ChatError::RateLimited)
    }

    /// The fixed assistant message rendered for this failure.
    pub fn user_message(&self, strings: &Strings) -> &'static str {
        if self.is_rate_limited() {
            strings.rate_limited
        } else {
            strings.request_failed
        }
    }
}

/// Errors raised while building or mounting the widget.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("No global `window` exists")]
    NoWindow,

    #[error("Window has no document")]
    NoDocument,

    #[error("Document has no body")]
    NoBody,

    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("A widget root already exists on this page")]
    AlreadyMounted,

    #[error("Invalid embed options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

impl WidgetError {
    pub fn dom(err: JsValue) -> Self {
        WidgetError::Dom(format!("{err:?}"))
    }
}

impl From<WidgetError> for JsValue {
    fn from(err: WidgetError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
