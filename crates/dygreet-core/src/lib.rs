//! Shared configuration, target-list parsing, and text utilities for the
//! dygreet pipeline.

mod app_config;
mod config;
mod error;
mod pacer;
mod sanitize;
mod targets;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use pacer::Pacer;
pub use sanitize::{clean_control_chars, safe_file_stem};
pub use targets::{load_targets, TargetKind, TargetUrl};
