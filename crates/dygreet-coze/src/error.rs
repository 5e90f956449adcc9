use thiserror::Error;

/// Errors from the Coze chat client.
#[derive(Debug, Error)]
pub enum CozeError {
    /// Network-level failure or non-2xx status.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API reported an application-level error (non-zero code).
    #[error("Coze API error {code}: {msg}")]
    Api { code: i64, msg: String },

    /// The event stream ended without a chat-completed event.
    #[error("chat stream ended unexpectedly: {reason}")]
    Stream { reason: String },

    /// The chat completed but produced no answer text.
    #[error("chat completed with an empty answer")]
    EmptyCompletion,

    /// The configured base URL could not be parsed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
