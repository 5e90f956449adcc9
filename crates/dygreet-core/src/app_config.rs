use std::path::PathBuf;

/// Runtime configuration for the dygreet pipeline, sourced from environment
/// variables (see [`crate::load_app_config`]).
#[derive(Clone)]
pub struct AppConfig {
    /// Path to the target-list file (one or more profile URLs per line).
    pub targets_path: PathBuf,
    /// Path to the line-oriented cookie config file.
    pub cookie_config_path: PathBuf,
    /// Directory for per-target profile/video JSON artifacts and the run report.
    pub output_dir: PathBuf,
    /// Directory for generated greeting text files.
    pub talk_output_dir: PathBuf,
    /// Optional append-only log file mirrored alongside console output.
    pub log_file: Option<PathBuf>,
    pub log_level: String,

    pub request_timeout_secs: u64,
    pub user_agent: String,

    /// Per-page retry cap for the video lister.
    pub page_retry_max: u32,
    /// Fixed delay between per-page retries.
    pub page_retry_delay_ms: u64,
    /// Minimum interval between remote API calls (pacing policy).
    pub min_call_interval_ms: u64,
    /// Fixed delay between consecutive targets.
    pub inter_target_delay_secs: u64,
    /// Delay between consecutive pipeline stages of one target.
    pub stage_delay_secs: u64,

    /// Video collection cap; 0 means unlimited.
    pub max_videos: usize,
    /// Probe each video's remote byte size via range requests.
    pub probe_sizes: bool,

    pub coze_api_token: Option<String>,
    pub coze_bot_id: Option<String>,
    pub coze_base_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("targets_path", &self.targets_path)
            .field("cookie_config_path", &self.cookie_config_path)
            .field("output_dir", &self.output_dir)
            .field("talk_output_dir", &self.talk_output_dir)
            .field("log_file", &self.log_file)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("page_retry_max", &self.page_retry_max)
            .field("page_retry_delay_ms", &self.page_retry_delay_ms)
            .field("min_call_interval_ms", &self.min_call_interval_ms)
            .field("inter_target_delay_secs", &self.inter_target_delay_secs)
            .field("stage_delay_secs", &self.stage_delay_secs)
            .field("max_videos", &self.max_videos)
            .field("probe_sizes", &self.probe_sizes)
            .field(
                "coze_api_token",
                &self.coze_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field("coze_bot_id", &self.coze_bot_id)
            .field("coze_base_url", &self.coze_base_url)
            .finish()
    }
}
