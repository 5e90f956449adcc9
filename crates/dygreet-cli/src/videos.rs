//! `videos` command: list one user's videos without greetings or artifacts.

use std::time::Duration;

use dygreet_cookies::CredentialStore;
use dygreet_core::{AppConfig, Pacer, TargetUrl};
use dygreet_douyin::{format_size, DouyinClient};

use crate::artifacts::ArtifactWriter;
use crate::pipeline;

pub(crate) async fn execute(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let target = TargetUrl::parse(url)
        .ok_or_else(|| anyhow::anyhow!("'{url}' is not a recognized Douyin profile URL"))?;

    let store = CredentialStore::new(&config.cookie_config_path);
    let Some(cookie_header) = pipeline::obtain_cookie(&store) else {
        anyhow::bail!("no valid Douyin cookie available");
    };
    let douyin = DouyinClient::new(&cookie_header, &config.user_agent, config.request_timeout_secs)?;

    let sec_user_id = pipeline::resolve_target(&douyin, &target).await?;
    let mut pacer = Pacer::new(Duration::from_millis(config.min_call_interval_ms));

    pacer.wait().await;
    let profile = douyin.fetch_profile(&sec_user_id).await?;
    println!(
        "{} (@{}) — {} followers, {} posts, {}",
        profile.nickname,
        profile.unique_id,
        profile.follower_count,
        profile.aweme_count,
        if profile.ip_location.is_empty() {
            "region unknown".to_string()
        } else {
            profile.ip_location.clone()
        }
    );

    let policy = pipeline::listing_policy(config);
    let mut outcome = douyin.list_videos(&sec_user_id, &policy, &mut pacer).await;
    if outcome.incomplete {
        eprintln!("warning: listing stopped early after repeated page failures");
    }
    if config.probe_sizes {
        for video in &mut outcome.videos {
            pacer.wait().await;
            video.size_bytes = Some(douyin.probe_size(&video.media_url).await);
        }
    }

    for (i, video) in outcome.videos.iter().enumerate() {
        let date = chrono::DateTime::from_timestamp(video.create_time, 0)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "????-??-??".to_string());
        let size = match video.size_bytes {
            Some(bytes) => format!("  {}", format_size(bytes)),
            None => String::new(),
        };
        println!(
            "{:>3}. [{date}] {}  ({} likes){size}",
            i + 1,
            video.desc,
            video.stats.digg_count
        );
    }
    println!(
        "{} videos{}",
        outcome.videos.len(),
        if outcome.truncated { " (capped)" } else { "" }
    );

    let writer = ArtifactWriter::new(&config.output_dir, &config.talk_output_dir);
    let path = writer.write_videos(1, &profile, &outcome.videos)?;
    println!("written to {}", path.display());
    Ok(())
}
