use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading configuration or the target list.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable is set but its value cannot be parsed.
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    /// The target-list file does not exist. A commented template has been
    /// written at the path so the user can populate it and rerun.
    #[error("target list not found at {path}; a template was created — add target URLs and rerun")]
    TargetsMissing { path: PathBuf },

    /// Reading or writing a configuration file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
