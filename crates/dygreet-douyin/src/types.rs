//! Raw API shapes and the normalized record types.
//!
//! The unofficial API omits, renames, and re-types fields freely, so every
//! raw field is optional and normalization pins down a concrete value (or a
//! documented empty default) before the data leaves this crate.

use serde::{Deserialize, Serialize};

use dygreet_core::clean_control_chars;

/// `{ "url_list": [...] }` wrapper used for avatars, covers, and play
/// addresses. The last entry is consistently the highest-quality variant.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct UrlList {
    #[serde(default)]
    pub url_list: Vec<String>,
}

impl UrlList {
    pub(crate) fn last(&self) -> Option<&str> {
        self.url_list.last().map(String::as_str)
    }
}

/// Alternate download block with camelCase keys, seen on share-page payloads.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawDownload {
    #[serde(rename = "urlList", default)]
    pub url_list: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawVideoInfo {
    pub play_addr: Option<UrlList>,
    pub cover: Option<UrlList>,
    #[serde(rename = "dynamicCover")]
    pub dynamic_cover: Option<String>,
    pub download: Option<RawDownload>,
    pub duration: Option<i64>,
}

/// Counters arrive as JSON numbers or strings depending on the endpoint
/// build; anything unparseable counts as zero.
fn flexible_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_i64().unwrap_or(0),
        serde_json::Value::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    })
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawStats {
    #[serde(default, deserialize_with = "flexible_count")]
    pub play_count: i64,
    #[serde(default, deserialize_with = "flexible_count")]
    pub digg_count: i64,
    #[serde(default, deserialize_with = "flexible_count")]
    pub comment_count: i64,
    #[serde(default, deserialize_with = "flexible_count")]
    pub share_count: i64,
    #[serde(default, deserialize_with = "flexible_count")]
    pub download_count: i64,
}

/// One entry of `aweme_list`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawAweme {
    pub aweme_id: Option<String>,
    pub desc: Option<String>,
    pub create_time: Option<i64>,
    pub aweme_type: Option<i64>,
    pub video: Option<RawVideoInfo>,
    pub statistics: Option<RawStats>,
}

/// One page of the `aweme/post` listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPostPage {
    #[serde(default)]
    pub max_cursor: i64,
    #[serde(default)]
    pub has_more: i64,
    #[serde(default)]
    pub aweme_list: Vec<RawAweme>,
}

impl RawPostPage {
    pub(crate) fn has_more(&self) -> bool {
        self.has_more != 0
    }
}

/// Engagement counters for one video.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VideoStats {
    pub play_count: i64,
    pub digg_count: i64,
    pub comment_count: i64,
    pub share_count: i64,
    pub download_count: i64,
}

/// A normalized video entry, ready for artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct VideoRecord {
    pub aweme_id: String,
    pub desc: String,
    pub create_time: i64,
    pub media_url: String,
    pub cover_url: String,
    pub duration_ms: i64,
    pub stats: VideoStats,
    /// Filled in by the optional size probe; `None` means not probed.
    pub size_bytes: Option<i64>,
}

/// Post types the pipeline treats as downloadable videos. Everything else
/// (image posts, live replays) is dropped during listing.
pub(crate) fn is_video_type(aweme_type: i64) -> bool {
    aweme_type <= 66 || aweme_type == 69 || aweme_type == 107
}

impl VideoRecord {
    /// Normalizes a raw aweme entry. Returns `None` when the entry is not a
    /// video type or carries no id.
    pub(crate) fn from_raw(raw: RawAweme) -> Option<Self> {
        if !is_video_type(raw.aweme_type.unwrap_or(0)) {
            return None;
        }
        let aweme_id = raw.aweme_id.filter(|id| !id.is_empty())?;
        let video = raw.video.unwrap_or_default();

        let media_url = video
            .play_addr
            .as_ref()
            .and_then(UrlList::last)
            .map(str::to_string)
            .or_else(|| {
                video
                    .download
                    .as_ref()
                    .and_then(|d| d.url_list.last())
                    .map(|u| u.replace("watermark=1", "watermark=0"))
            })
            .unwrap_or_default();

        let cover_url = video
            .cover
            .as_ref()
            .and_then(UrlList::last)
            .map(str::to_string)
            .or_else(|| video.dynamic_cover.as_ref().map(|c| format!("https:{c}")))
            .unwrap_or_default();

        let stats = raw.statistics.map_or_else(VideoStats::default, |s| VideoStats {
            play_count: s.play_count,
            digg_count: s.digg_count,
            comment_count: s.comment_count,
            share_count: s.share_count,
            download_count: s.download_count,
        });

        Some(Self {
            aweme_id,
            desc: clean_control_chars(&raw.desc.unwrap_or_default()),
            create_time: raw.create_time.unwrap_or(0),
            media_url,
            cover_url,
            duration_ms: video.duration.unwrap_or(0),
            stats,
            size_bytes: None,
        })
    }
}
