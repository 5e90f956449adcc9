use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Load pipeline configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid. No variables are
/// strictly required at load time; the Coze token/bot id are checked by the
/// AI stage when it actually runs.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got '{other}'"),
            }),
        }
    };

    let targets_path = PathBuf::from(or_default("DYGREET_TARGETS_PATH", "urls_config.txt"));
    let cookie_config_path = PathBuf::from(or_default(
        "DYGREET_COOKIE_CONFIG_PATH",
        "config/cookie_config.txt",
    ));
    let output_dir = PathBuf::from(or_default("DYGREET_OUTPUT_DIR", "integrated_output"));
    let talk_output_dir = PathBuf::from(or_default("DYGREET_TALK_OUTPUT_DIR", "Talk_output"));
    let log_file = lookup("DYGREET_LOG_FILE").ok().map(PathBuf::from);
    let log_level = or_default("DYGREET_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("DYGREET_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("DYGREET_USER_AGENT", DEFAULT_USER_AGENT);

    let page_retry_max = parse_u32("DYGREET_PAGE_RETRY_MAX", "5")?;
    let page_retry_delay_ms = parse_u64("DYGREET_PAGE_RETRY_DELAY_MS", "2000")?;
    let min_call_interval_ms = parse_u64("DYGREET_MIN_CALL_INTERVAL_MS", "1000")?;
    let inter_target_delay_secs = parse_u64("DYGREET_INTER_TARGET_DELAY_SECS", "5")?;
    let stage_delay_secs = parse_u64("DYGREET_STAGE_DELAY_SECS", "3")?;

    let max_videos = parse_usize("DYGREET_MAX_VIDEOS", "0")?;
    let probe_sizes = parse_bool("DYGREET_PROBE_SIZES", "false")?;

    let coze_api_token = lookup("COZE_API_TOKEN").ok();
    let coze_bot_id = lookup("COZE_BOT_ID").ok();
    let coze_base_url = or_default("COZE_BASE_URL", "https://api.coze.cn");

    Ok(AppConfig {
        targets_path,
        cookie_config_path,
        output_dir,
        talk_output_dir,
        log_file,
        log_level,
        request_timeout_secs,
        user_agent,
        page_retry_max,
        page_retry_delay_ms,
        min_call_interval_ms,
        inter_target_delay_secs,
        stage_delay_secs,
        max_videos,
        probe_sizes,
        coze_api_token,
        coze_bot_id,
        coze_base_url,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn defaults_apply_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.targets_path, PathBuf::from("urls_config.txt"));
        assert_eq!(
            cfg.cookie_config_path,
            PathBuf::from("config/cookie_config.txt")
        );
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.page_retry_max, 5);
        assert_eq!(cfg.page_retry_delay_ms, 2000);
        assert_eq!(cfg.min_call_interval_ms, 1000);
        assert_eq!(cfg.inter_target_delay_secs, 5);
        assert_eq!(cfg.max_videos, 0);
        assert!(!cfg.probe_sizes);
        assert!(cfg.coze_api_token.is_none());
        assert_eq!(cfg.coze_base_url, "https://api.coze.cn");
    }

    #[test]
    fn overrides_are_read() {
        let mut map = HashMap::new();
        map.insert("DYGREET_PAGE_RETRY_MAX", "3");
        map.insert("DYGREET_MAX_VIDEOS", "20");
        map.insert("DYGREET_PROBE_SIZES", "true");
        map.insert("COZE_API_TOKEN", "pat_test");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.page_retry_max, 3);
        assert_eq!(cfg.max_videos, 20);
        assert!(cfg.probe_sizes);
        assert_eq!(cfg.coze_api_token.as_deref(), Some("pat_test"));
    }

    #[test]
    fn invalid_retry_max_is_rejected() {
        let mut map = HashMap::new();
        map.insert("DYGREET_PAGE_RETRY_MAX", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DYGREET_PAGE_RETRY_MAX"),
            "expected InvalidEnvVar(DYGREET_PAGE_RETRY_MAX), got: {result:?}"
        );
    }

    #[test]
    fn invalid_bool_is_rejected() {
        let mut map = HashMap::new();
        map.insert("DYGREET_PROBE_SIZES", "maybe");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DYGREET_PROBE_SIZES"),
            "expected InvalidEnvVar(DYGREET_PROBE_SIZES), got: {result:?}"
        );
    }

    #[test]
    fn token_is_redacted_in_debug_output() {
        let mut map = HashMap::new();
        map.insert("COZE_API_TOKEN", "pat_secret_value");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("pat_secret_value"));
        assert!(rendered.contains("[redacted]"));
    }
}
