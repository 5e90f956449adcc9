use std::path::PathBuf;

use thiserror::Error;

/// Errors from cookie acquisition and the credential store.
#[derive(Debug, Error)]
pub enum CookieError {
    /// The underlying browser cookie extraction failed for one browser.
    #[error("cookie extraction from {browser} failed: {reason}")]
    Extraction { browser: String, reason: String },

    /// No browser yielded a valid cookie set.
    #[error("no valid Douyin cookie found; tried: {}", attempted.join(", "))]
    NoValidCookie { attempted: Vec<String> },

    /// Reading or writing the credential store file failed.
    #[error("credential store I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing a backup or cookie-info artifact failed.
    #[error("failed to serialize {context}: {source}")]
    Serialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
