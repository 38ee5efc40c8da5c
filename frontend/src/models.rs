use serde::{Deserialize, Serialize};

/// Who authored a rendered message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// CSS modifier class used by the message bubble.
    pub fn css_class(&self) -> &'static str {
        match self {
            Role::User => "mb-msg mb-user",
            Role::Assistant => "mb-msg mb-assistant",
        }
    }
}

/// A display-only chat message. `id` is local to the page and only serves
/// as a render key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn new(id: u64, role: Role, text: impl Into<String>) -> Self {
        Self { id, role, text: text.into() }
    }

    /// Text split on newlines; each line is rendered separated by a `<br>`.
    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }
}

/// Request body for `POST /api/chat`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, session_id: Option<String>) -> Self {
        Self { message: message.into(), session_id }
    }
}

/// Successful reply from `POST /api/chat`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    pub reply: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatReply {
    /// The session id the server handed back, ignoring empty strings.
    pub fn new_session_id(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// A canned prompt offered as a one-click shortcut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuickAction {
    pub label: &'static str,
    pub prompt: &'static str,
}
