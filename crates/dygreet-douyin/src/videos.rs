//! Cursor-paginated video listing.

use std::time::Duration;

use dygreet_core::Pacer;

use crate::client::DouyinClient;
use crate::error::DouyinError;
use crate::retry::retry_fixed;
use crate::types::{RawPostPage, VideoRecord};

const POST_PATH: &str = "aweme/v1/web/aweme/post/";

/// Tunables for one listing run.
#[derive(Debug, Clone)]
pub struct ListingPolicy {
    /// Entries requested per page.
    pub page_size: u32,
    /// Additional attempts per page on transient failures.
    pub retry_max: u32,
    /// Fixed sleep between attempts.
    pub retry_delay: Duration,
    /// Stop after this many videos; `0` means unlimited.
    pub max_videos: usize,
}

impl Default for ListingPolicy {
    fn default() -> Self {
        Self {
            page_size: 18,
            retry_max: 5,
            retry_delay: Duration::from_millis(2000),
            max_videos: 0,
        }
    }
}

/// Result of walking a user's post listing.
#[derive(Debug)]
pub struct ListingOutcome {
    pub videos: Vec<VideoRecord>,
    pub pages_fetched: u32,
    /// Raw entries seen before the video-type filter.
    pub entries_seen: usize,
    /// `true` when the `max_videos` cap cut the walk short.
    pub truncated: bool,
    /// `true` when a page exhausted its retries and the walk stopped early
    /// with whatever had been collected.
    pub incomplete: bool,
}

impl DouyinClient {
    /// Walks the cursor-paginated post listing for one user.
    ///
    /// Each page fetch is retried on transient failures with a fixed delay.
    /// A page that exhausts its retries ends the walk early; everything
    /// collected so far is kept and `incomplete` is set, so a flaky later
    /// page never throws away earlier ones. An empty `aweme_list` terminates
    /// the walk even when the server still claims `has_more` — the API does
    /// that on the last page and on throttled accounts, and trusting
    /// `has_more` there loops forever.
    pub async fn list_videos(
        &self,
        sec_user_id: &str,
        policy: &ListingPolicy,
        pacer: &mut Pacer,
    ) -> ListingOutcome {
        let mut outcome = ListingOutcome {
            videos: Vec::new(),
            pages_fetched: 0,
            entries_seen: 0,
            truncated: false,
            incomplete: false,
        };
        let mut cursor: i64 = 0;
        let count = policy.page_size.to_string();

        loop {
            pacer.wait().await;
            let page = match retry_fixed(policy.retry_max, policy.retry_delay, || {
                self.fetch_post_page(sec_user_id, cursor, &count)
            })
            .await
            {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(
                        sec_user_id,
                        cursor,
                        collected = outcome.videos.len(),
                        error = %e,
                        "page fetch exhausted retries; keeping partial listing"
                    );
                    outcome.incomplete = true;
                    break;
                }
            };
            outcome.pages_fetched += 1;

            if page.aweme_list.is_empty() {
                tracing::debug!(
                    sec_user_id,
                    cursor,
                    has_more = page.has_more(),
                    "empty page, listing complete"
                );
                break;
            }

            let has_more = page.has_more();
            let next_cursor = page.max_cursor;
            outcome.entries_seen += page.aweme_list.len();

            for raw in page.aweme_list {
                if let Some(record) = VideoRecord::from_raw(raw) {
                    outcome.videos.push(record);
                    if policy.max_videos > 0 && outcome.videos.len() >= policy.max_videos {
                        outcome.truncated = true;
                        tracing::info!(
                            sec_user_id,
                            max_videos = policy.max_videos,
                            "video cap reached, stopping listing early"
                        );
                        return outcome;
                    }
                }
            }

            if !has_more {
                break;
            }
            cursor = next_cursor;
        }

        tracing::info!(
            sec_user_id,
            videos = outcome.videos.len(),
            pages = outcome.pages_fetched,
            filtered_out = outcome.entries_seen - outcome.videos.len(),
            "video listing complete"
        );
        outcome
    }

    async fn fetch_post_page(
        &self,
        sec_user_id: &str,
        cursor: i64,
        count: &str,
    ) -> Result<RawPostPage, DouyinError> {
        let cursor_str = cursor.to_string();
        let body = self
            .get_json(
                POST_PATH,
                &[
                    ("max_cursor", cursor_str.as_str()),
                    ("count", count),
                    ("sec_user_id", sec_user_id),
                    ("publish_video_strategy_type", "2"),
                ],
            )
            .await?;

        serde_json::from_value(body).map_err(|e| DouyinError::Deserialize {
            context: format!("{POST_PATH} (cursor={cursor})"),
            source: e,
        })
    }
}
