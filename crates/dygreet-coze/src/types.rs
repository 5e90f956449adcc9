//! Request and event payload shapes for the v3 chat API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub bot_id: &'a str,
    pub user_id: &'a str,
    pub stream: bool,
    pub auto_save_history: bool,
    pub additional_messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
    pub content_type: &'a str,
}

/// Payload of `conversation.message.delta` events.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageDelta {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: String,
}

/// Payload of `conversation.chat.failed` events.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatStatus {
    pub last_error: Option<ApiFailure>,
}

/// Payload of `conversation.chat.completed` events.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompleted {
    pub usage: Option<TokenUsage>,
}

/// Token accounting attached to the completion event.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenUsage {
    #[serde(default)]
    pub token_count: i64,
    #[serde(default)]
    pub output_count: i64,
}

/// The API's `{code, msg}` error shape, used both in failed-chat events and
/// in plain JSON error bodies.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiFailure {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}
