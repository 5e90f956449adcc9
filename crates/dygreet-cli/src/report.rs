//! Per-target results and the final run report.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

/// How far one target progressed. Each stage implies the ones before it, so
/// the success flags in the report are derived from this single value and
/// can never contradict each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Progress {
    /// No usable cookie; nothing was attempted for this target.
    NoCookie,
    /// Cookie in hand, but profile or video crawl failed.
    CookieReady,
    /// Profile and videos collected; greeting generation failed.
    Crawled,
    /// Greeting generated and written.
    Greeted,
}

/// Outcome of one target, as serialized into the run report.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TargetResult {
    pub index: usize,
    pub url: String,
    pub nickname: String,
    pub sec_user_id: String,
    pub cookie_success: bool,
    pub crawl_success: bool,
    pub ai_success: bool,
    pub video_count: usize,
    pub error: Option<String>,
}

impl TargetResult {
    pub(crate) fn new(
        index: usize,
        url: &str,
        progress: Progress,
        nickname: String,
        sec_user_id: String,
        video_count: usize,
        error: Option<String>,
    ) -> Self {
        Self {
            index,
            url: url.to_string(),
            nickname,
            sec_user_id,
            cookie_success: progress >= Progress::CookieReady,
            crawl_success: progress >= Progress::Crawled,
            ai_success: progress >= Progress::Greeted,
            video_count,
            error,
        }
    }
}

/// The final report written to `run_report_{timestamp}.json` and summarized
/// on stdout.
#[derive(Debug, Serialize)]
pub(crate) struct RunReport {
    pub started_at: String,
    pub finished_at: String,
    pub total_targets: usize,
    pub cookie_successes: usize,
    pub crawl_successes: usize,
    pub ai_successes: usize,
    pub interrupted: bool,
    pub results: Vec<TargetResult>,
}

impl RunReport {
    pub(crate) fn new(
        started_at: DateTime<Local>,
        results: Vec<TargetResult>,
        interrupted: bool,
    ) -> Self {
        Self {
            started_at: started_at.to_rfc3339(),
            finished_at: Local::now().to_rfc3339(),
            total_targets: results.len(),
            cookie_successes: results.iter().filter(|r| r.cookie_success).count(),
            crawl_successes: results.iter().filter(|r| r.crawl_success).count(),
            ai_successes: results.iter().filter(|r| r.ai_success).count(),
            interrupted,
            results,
        }
    }

    /// Writes the report as pretty JSON into `dir` and returns the path.
    pub(crate) fn save(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("run_report_{stamp}.json"));
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }

    /// Prints the per-target table and the aggregate line.
    pub(crate) fn print_summary(&self) {
        println!();
        println!("{:<4} {:<20} {:^6} {:^6} {:^6} {:>7}  error", "#", "nickname", "cookie", "crawl", "ai", "videos");
        for r in &self.results {
            let name = if r.nickname.is_empty() { r.url.as_str() } else { r.nickname.as_str() };
            println!(
                "{:<4} {:<20} {:^6} {:^6} {:^6} {:>7}  {}",
                r.index,
                truncate(name, 20),
                mark(r.cookie_success),
                mark(r.crawl_success),
                mark(r.ai_success),
                r.video_count,
                r.error.as_deref().unwrap_or("-"),
            );
        }
        println!();
        println!(
            "{} targets: {} cookie / {} crawl / {} greeting{}",
            self.total_targets,
            self.cookie_successes,
            self.crawl_successes,
            self.ai_successes,
            if self.interrupted { " (interrupted)" } else { "" },
        );
    }
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "x"
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars.saturating_sub(1)).collect::<String>() + "…"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(progress: Progress) -> TargetResult {
        TargetResult::new(1, "https://www.douyin.com/user/x", progress, "n".into(), "sec".into(), 0, None)
    }

    #[test]
    fn greeted_implies_all_earlier_stages() {
        let r = result(Progress::Greeted);
        assert!(r.cookie_success && r.crawl_success && r.ai_success);
    }

    #[test]
    fn crawled_without_greeting() {
        let r = result(Progress::Crawled);
        assert!(r.cookie_success && r.crawl_success);
        assert!(!r.ai_success);
    }

    #[test]
    fn cookie_only() {
        let r = result(Progress::CookieReady);
        assert!(r.cookie_success);
        assert!(!r.crawl_success && !r.ai_success);
    }

    #[test]
    fn no_cookie_fails_every_stage() {
        let r = result(Progress::NoCookie);
        assert!(!r.cookie_success && !r.crawl_success && !r.ai_success);
    }

    #[test]
    fn report_counts_stage_successes() {
        let report = RunReport::new(
            Local::now(),
            vec![
                result(Progress::Greeted),
                result(Progress::Crawled),
                result(Progress::NoCookie),
            ],
            false,
        );
        assert_eq!(report.total_targets, 3);
        assert_eq!(report.cookie_successes, 2);
        assert_eq!(report.crawl_successes, 2);
        assert_eq!(report.ai_successes, 1);
    }

    #[test]
    fn report_is_saved_as_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let report = RunReport::new(Local::now(), vec![result(Progress::Greeted)], false);
        let path = report.save(dir.path()).unwrap();

        let body = std::fs::read_to_string(path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["total_targets"], 1);
        assert_eq!(parsed["results"][0]["ai_success"], true);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("短名字", 20), "短名字");
        let long = "一二三四五六七八九十一二三四五六七八九十多余";
        assert!(truncate(long, 20).chars().count() <= 20);
    }
}
