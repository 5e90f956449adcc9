use thiserror::Error;

/// Errors from the Douyin web API client.
#[derive(Debug, Error)]
pub enum DouyinError {
    /// Network-level failure or non-2xx status from `reqwest`.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A response arrived but carried no usable payload.
    #[error("empty response body from {context}")]
    EmptyBody { context: String },

    /// The response body did not match the expected shape.
    #[error("failed to deserialize {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// No `sec_user_id` could be extracted from the target URL.
    #[error("could not extract sec_user_id from '{url}'")]
    UserIdMissing { url: String },

    /// Both the primary and fallback profile endpoints came back empty.
    #[error("profile unavailable for sec_user_id '{sec_user_id}'")]
    ProfileUnavailable { sec_user_id: String },

    /// The configured base URL could not be parsed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
