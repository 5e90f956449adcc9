//! Full-run orchestration: cookie, crawl, and greeting stages per target.
//!
//! Per-target failures are captured in the run report and never abort the
//! run; later targets still get their chance. Ctrl-C stops cleanly between
//! (or during) targets and the partial report is still written.

use std::time::Duration;

use chrono::Local;

use dygreet_cookies::{
    acquire, pull, validate, Browser, CookieJar, CookieSource, Credential, CredentialStore,
    RookieSource,
};
use dygreet_core::{load_targets, AppConfig, ConfigError, Pacer, TargetKind, TargetUrl};
use dygreet_coze::CozeClient;
use dygreet_douyin::{
    extract_sec_user_id, DouyinClient, DouyinError, ListingPolicy, ProfileRecord,
};

use crate::artifacts::ArtifactWriter;
use crate::report::{Progress, RunReport, TargetResult};

pub(crate) async fn execute(config: &AppConfig, skip_ai: bool) -> anyhow::Result<()> {
    let started_at = Local::now();

    let targets = match load_targets(&config.targets_path) {
        Ok(targets) => targets,
        Err(ConfigError::TargetsMissing { path }) => {
            println!("no target list found; a template was written to {}", path.display());
            println!("add Douyin profile URLs to it and rerun.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    if targets.is_empty() {
        println!(
            "target list {} contains no valid URLs",
            config.targets_path.display()
        );
        return Ok(());
    }
    tracing::info!(targets = targets.len(), "starting run");

    let store = CredentialStore::new(&config.cookie_config_path);
    let coze = if skip_ai { None } else { build_coze(config)? };
    if skip_ai {
        tracing::info!("greeting stage disabled (--skip-ai)");
    } else if coze.is_none() {
        tracing::warn!("COZE_API_TOKEN/COZE_BOT_ID not set; the greeting stage will be skipped");
    }

    let writer = ArtifactWriter::new(&config.output_dir, &config.talk_output_dir);
    let mut pacer = Pacer::new(Duration::from_millis(config.min_call_interval_ms));
    let policy = listing_policy(config);

    let mut results = Vec::new();
    let mut interrupted = false;
    let total = targets.len();

    for (i, target) in targets.iter().enumerate() {
        let index = i + 1;
        if i > 0 {
            tokio::select! {
                () = tokio::time::sleep(Duration::from_secs(config.inter_target_delay_secs)) => {}
                _ = tokio::signal::ctrl_c() => {
                    interrupted = true;
                    break;
                }
            }
        }

        tracing::info!(index, total, url = %target, "processing target");
        tokio::select! {
            result = process_target(index, target, &store, coze.as_ref(), &writer, &policy, &mut pacer, config) => {
                results.push(result);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!(index, "interrupted mid-target");
                interrupted = true;
                break;
            }
        }
    }

    finish(config, RunReport::new(started_at, results, interrupted))
}

fn finish(config: &AppConfig, report: RunReport) -> anyhow::Result<()> {
    let path = report.save(&config.output_dir)?;
    report.print_summary();
    println!("report written to {}", path.display());
    Ok(())
}

pub(crate) fn listing_policy(config: &AppConfig) -> ListingPolicy {
    ListingPolicy {
        retry_max: config.page_retry_max,
        retry_delay: Duration::from_millis(config.page_retry_delay_ms),
        max_videos: config.max_videos,
        ..ListingPolicy::default()
    }
}

/// Runs the browser acquisition scan for one pipeline target and persists
/// the winner.
///
/// The store never supplies the credential here — at most a `browser=`
/// directive narrows the first attempt. Re-running the scan for every target
/// means a cookie that expires mid-run (or a stale `cookie=` line) only
/// costs the target it fails on, never the rest of the batch.
pub(crate) fn fresh_cookie(store: &CredentialStore) -> Option<String> {
    fresh_cookie_from(&RookieSource, store)
}

fn fresh_cookie_from<S: CookieSource>(source: &S, store: &CredentialStore) -> Option<String> {
    if let Ok(Some(Credential::FromBrowser(browser))) = store.read_active() {
        if let Some(jar) = pull(source, browser) {
            let check = validate(&jar);
            if check.valid {
                if !check.logged_in {
                    tracing::warn!(%browser, "browser cookie is valid but not logged in");
                }
                persist_cookie(store, &jar, browser);
                return Some(jar.to_cookie_header());
            }
            tracing::warn!(
                %browser,
                missing = ?check.missing_fields,
                "configured browser's cookie is incomplete; scanning all browsers"
            );
        }
    }

    match acquire(source) {
        Ok(acquired) => {
            let header = acquired.jar.to_cookie_header();
            persist_cookie(store, &acquired.jar, acquired.browser);
            Some(header)
        }
        Err(e) => {
            tracing::error!(error = %e, "cookie acquisition failed");
            None
        }
    }
}

/// Store-preferring credential lookup for the one-shot `videos` command: a
/// structurally valid `cookie=` entry wins without touching a browser, the
/// browser scan is the fallback. The batch pipeline uses [`fresh_cookie`]
/// instead.
pub(crate) fn obtain_cookie(store: &CredentialStore) -> Option<String> {
    let source = RookieSource;

    match store.read_active() {
        Ok(Some(Credential::CookieString(header))) => {
            let check = validate(&CookieJar::parse_header(&header));
            if check.valid {
                if !check.logged_in {
                    tracing::warn!("configured cookie is valid but not logged in");
                }
                return Some(header);
            }
            tracing::warn!(
                missing = ?check.missing_fields,
                "configured cookie is incomplete; scanning browsers"
            );
        }
        Ok(Some(Credential::FromBrowser(browser))) => {
            if let Some(jar) = pull(&source, browser) {
                let check = validate(&jar);
                if check.valid {
                    if !check.logged_in {
                        tracing::warn!(%browser, "browser cookie is valid but not logged in");
                    }
                    let header = jar.to_cookie_header();
                    persist_cookie(store, &jar, browser);
                    return Some(header);
                }
                tracing::warn!(
                    %browser,
                    missing = ?check.missing_fields,
                    "configured browser's cookie is incomplete; scanning all browsers"
                );
            }
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "credential store unreadable; scanning browsers");
        }
    }

    match acquire(&source) {
        Ok(acquired) => {
            let header = acquired.jar.to_cookie_header();
            persist_cookie(store, &acquired.jar, acquired.browser);
            Some(header)
        }
        Err(e) => {
            tracing::error!(error = %e, "cookie acquisition failed");
            None
        }
    }
}

fn persist_cookie(store: &CredentialStore, jar: &CookieJar, browser: Browser) {
    if let Err(e) = store.write_active(&jar.to_cookie_header(), browser.label()) {
        tracing::warn!(error = %e, "could not persist cookie to the credential store");
    }
}

fn build_coze(config: &AppConfig) -> anyhow::Result<Option<CozeClient>> {
    match (&config.coze_api_token, &config.coze_bot_id) {
        (Some(token), Some(bot_id)) => Ok(Some(CozeClient::with_base_url(
            token,
            bot_id,
            config.request_timeout_secs,
            &config.coze_base_url,
        )?)),
        _ => Ok(None),
    }
}

pub(crate) async fn resolve_target(
    douyin: &DouyinClient,
    target: &TargetUrl,
) -> Result<String, DouyinError> {
    let resolved;
    let url = match target.kind() {
        TargetKind::ShortLink => {
            resolved = douyin.resolve_short_link(target.as_str()).await?;
            resolved.as_str()
        }
        TargetKind::Profile | TargetKind::ShareLink => target.as_str(),
    };
    extract_sec_user_id(url).ok_or_else(|| DouyinError::UserIdMissing {
        url: url.to_string(),
    })
}

#[allow(clippy::too_many_arguments)]
async fn process_target(
    index: usize,
    target: &TargetUrl,
    store: &CredentialStore,
    coze: Option<&CozeClient>,
    writer: &ArtifactWriter,
    policy: &ListingPolicy,
    pacer: &mut Pacer,
    config: &AppConfig,
) -> TargetResult {
    let Some(cookie_header) = fresh_cookie(store) else {
        return TargetResult::new(
            index,
            target.as_str(),
            Progress::NoCookie,
            String::new(),
            String::new(),
            0,
            Some("no valid Douyin cookie".to_string()),
        );
    };
    tokio::time::sleep(Duration::from_secs(config.stage_delay_secs)).await;

    let douyin = match DouyinClient::new(&cookie_header, &config.user_agent, config.request_timeout_secs)
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "could not build Douyin client");
            return TargetResult::new(
                index,
                target.as_str(),
                Progress::CookieReady,
                String::new(),
                String::new(),
                0,
                Some(e.to_string()),
            );
        }
    };

    let sec_user_id = match resolve_target(&douyin, target).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(url = %target, error = %e, "target resolution failed");
            return TargetResult::new(
                index,
                target.as_str(),
                Progress::CookieReady,
                String::new(),
                String::new(),
                0,
                Some(e.to_string()),
            );
        }
    };

    pacer.wait().await;
    let profile = match douyin.fetch_profile(&sec_user_id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(sec_user_id, error = %e, "profile fetch failed");
            return TargetResult::new(
                index,
                target.as_str(),
                Progress::CookieReady,
                String::new(),
                sec_user_id,
                0,
                Some(e.to_string()),
            );
        }
    };
    tracing::info!(
        nickname = %profile.nickname,
        followers = profile.follower_count,
        "profile fetched"
    );
    if let Err(e) = writer.write_profile(index, target.as_str(), &profile) {
        tracing::warn!(error = %e, "could not write profile artifact");
    }

    let listing = douyin.list_videos(&sec_user_id, policy, pacer).await;
    let mut videos = listing.videos;
    if config.probe_sizes {
        for video in &mut videos {
            pacer.wait().await;
            video.size_bytes = Some(douyin.probe_size(&video.media_url).await);
        }
    }
    if let Err(e) = writer.write_videos(index, &profile, &videos) {
        tracing::warn!(error = %e, "could not write videos artifact");
    }

    let Some(coze) = coze else {
        return TargetResult::new(
            index,
            target.as_str(),
            Progress::Crawled,
            profile.nickname.clone(),
            sec_user_id,
            videos.len(),
            Some("greeting stage skipped".to_string()),
        );
    };

    tokio::time::sleep(Duration::from_secs(config.stage_delay_secs)).await;

    let prompt = prompt_payload(index, target.as_str(), &profile);
    match coze.chat(&sec_user_id, &prompt).await {
        Ok(greeting) => match writer.write_greeting(&profile, &greeting) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "greeting written");
                TargetResult::new(
                    index,
                    target.as_str(),
                    Progress::Greeted,
                    profile.nickname.clone(),
                    sec_user_id,
                    videos.len(),
                    None,
                )
            }
            Err(e) => TargetResult::new(
                index,
                target.as_str(),
                Progress::Crawled,
                profile.nickname.clone(),
                sec_user_id,
                videos.len(),
                Some(format!("greeting write failed: {e}")),
            ),
        },
        Err(e) => {
            tracing::warn!(sec_user_id, error = %e, "greeting generation failed");
            TargetResult::new(
                index,
                target.as_str(),
                Progress::Crawled,
                profile.nickname.clone(),
                sec_user_id,
                videos.len(),
                Some(e.to_string()),
            )
        }
    }
}

/// The greeting bot takes the crawled profile itself as its user message,
/// wrapped in the same envelope the profile artifact uses. Prompt wording
/// lives in the bot's own configuration, not here.
fn prompt_payload(index: usize, source_url: &str, profile: &ProfileRecord) -> String {
    let envelope = serde_json::json!({
        "extraction_time": Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        "source_url": source_url,
        "processing_index": index,
        "user_info": profile,
    });
    serde_json::to_string_pretty(&envelope).unwrap_or_default()
}
