//! Profile fetch with primary/fallback endpoints and field normalization.

use serde::{Deserialize, Serialize};

use dygreet_core::clean_control_chars;

use crate::client::DouyinClient;
use crate::error::DouyinError;
use crate::types::UrlList;

/// Which endpoint the record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    Primary,
    Fallback,
}

/// A normalized user profile, ready for artifacts and greeting prompts.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileRecord {
    pub sec_user_id: String,
    pub nickname: String,
    pub signature: String,
    pub avatar_url: String,
    pub ip_location: String,
    pub follower_count: i64,
    pub following_count: i64,
    pub total_favorited: i64,
    pub aweme_count: i64,
    pub unique_id: String,
    pub source: ProfileSource,
}

/// Raw user payload. Both endpoints share this shape closely enough that one
/// optional-everything struct covers them; counts arrive as numbers or
/// strings depending on the endpoint.
#[derive(Debug, Default, Deserialize)]
struct RawUser {
    nickname: Option<String>,
    signature: Option<String>,
    unique_id: Option<String>,
    avatar_thumb: Option<UrlList>,
    avatar_larger: Option<UrlList>,
    follower_count: Option<serde_json::Value>,
    following_count: Option<serde_json::Value>,
    total_favorited: Option<serde_json::Value>,
    aweme_count: Option<serde_json::Value>,
    ip_location: Option<String>,
    city: Option<String>,
    province: Option<String>,
    region: Option<String>,
    location: Option<String>,
    region_name: Option<String>,
    enterprise_verify_reason: Option<String>,
}

fn count_of(value: Option<&serde_json::Value>) -> i64 {
    match value {
        Some(v) => v
            .as_i64()
            .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
            .unwrap_or(0),
        None => 0,
    }
}

/// Region resolution tries each location-bearing field in a fixed order,
/// then falls back to the last segment of the enterprise verification text
/// (which often ends in a city name after a `·` separator).
fn resolve_ip_location(raw: &RawUser) -> String {
    let candidates = [
        &raw.ip_location,
        &raw.city,
        &raw.province,
        &raw.region,
        &raw.location,
        &raw.region_name,
    ];
    for candidate in candidates {
        if let Some(value) = candidate {
            // The web endpoint prefixes the region with an "IP属地" label.
            let trimmed = value
                .trim()
                .trim_start_matches("IP属地：")
                .trim_start_matches("IP属地:")
                .trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }

    raw.enterprise_verify_reason
        .as_deref()
        .and_then(|reason| reason.split('·').next_back())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(String::new, str::to_string)
}

fn resolve_avatar(raw: &RawUser) -> String {
    raw.avatar_thumb
        .as_ref()
        .and_then(UrlList::last)
        .or_else(|| raw.avatar_larger.as_ref().and_then(UrlList::last))
        .map_or_else(String::new, str::to_string)
}

fn normalize(raw: RawUser, sec_user_id: &str, source: ProfileSource) -> ProfileRecord {
    ProfileRecord {
        sec_user_id: sec_user_id.to_string(),
        nickname: clean_control_chars(&raw.nickname.clone().unwrap_or_default()),
        signature: clean_control_chars(&raw.signature.clone().unwrap_or_default()),
        avatar_url: resolve_avatar(&raw),
        ip_location: resolve_ip_location(&raw),
        follower_count: count_of(raw.follower_count.as_ref()),
        following_count: count_of(raw.following_count.as_ref()),
        total_favorited: count_of(raw.total_favorited.as_ref()),
        aweme_count: count_of(raw.aweme_count.as_ref()),
        unique_id: raw.unique_id.clone().unwrap_or_default(),
        source,
    }
}

impl DouyinClient {
    /// Fetches and normalizes a user profile.
    ///
    /// Tries the web profile endpoint first; if it fails or returns no
    /// `user` payload (common for unauthenticated cookies), falls back to
    /// the older share-page API.
    ///
    /// # Errors
    ///
    /// Returns [`DouyinError::ProfileUnavailable`] when both endpoints fail
    /// or come back without a user payload.
    pub async fn fetch_profile(&self, sec_user_id: &str) -> Result<ProfileRecord, DouyinError> {
        match self.fetch_profile_primary(sec_user_id).await {
            Ok(Some(record)) => return Ok(record),
            Ok(None) => {
                tracing::warn!(sec_user_id, "primary profile endpoint returned no user payload");
            }
            Err(e) => {
                tracing::warn!(sec_user_id, error = %e, "primary profile endpoint failed");
            }
        }

        match self.fetch_profile_fallback(sec_user_id).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(DouyinError::ProfileUnavailable {
                sec_user_id: sec_user_id.to_string(),
            }),
            Err(e) => {
                tracing::warn!(sec_user_id, error = %e, "fallback profile endpoint failed");
                Err(DouyinError::ProfileUnavailable {
                    sec_user_id: sec_user_id.to_string(),
                })
            }
        }
    }

    async fn fetch_profile_primary(
        &self,
        sec_user_id: &str,
    ) -> Result<Option<ProfileRecord>, DouyinError> {
        let body = self
            .get_json(
                "aweme/v1/web/user/profile/other/",
                &[
                    ("publish_video_strategy_type", "2"),
                    ("sec_user_id", sec_user_id),
                    ("personal_center_strategy", "1"),
                ],
            )
            .await?;

        Self::parse_user(body, "user", sec_user_id, ProfileSource::Primary)
    }

    async fn fetch_profile_fallback(
        &self,
        sec_user_id: &str,
    ) -> Result<Option<ProfileRecord>, DouyinError> {
        let body = self
            .get_json("web/api/v2/user/info/", &[("sec_uid", sec_user_id)])
            .await?;

        Self::parse_user(body, "user_info", sec_user_id, ProfileSource::Fallback)
    }

    fn parse_user(
        body: serde_json::Value,
        key: &str,
        sec_user_id: &str,
        source: ProfileSource,
    ) -> Result<Option<ProfileRecord>, DouyinError> {
        let Some(user) = body.get(key).filter(|v| !v.is_null()).cloned() else {
            return Ok(None);
        };
        let raw: RawUser = serde_json::from_value(user).map_err(|e| DouyinError::Deserialize {
            context: format!("profile '{key}' payload"),
            source: e,
        })?;
        Ok(Some(normalize(raw, sec_user_id, source)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: serde_json::Value) -> RawUser {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn ip_location_prefers_the_direct_field() {
        let user = raw(serde_json::json!({
            "ip_location": "广东",
            "city": "深圳"
        }));
        assert_eq!(resolve_ip_location(&user), "广东");
    }

    #[test]
    fn ip_location_label_prefix_is_stripped() {
        let user = raw(serde_json::json!({ "ip_location": "IP属地：广东" }));
        assert_eq!(resolve_ip_location(&user), "广东");
    }

    #[test]
    fn ip_location_cascades_through_empty_fields() {
        let user = raw(serde_json::json!({
            "ip_location": "",
            "city": "  ",
            "province": "浙江"
        }));
        assert_eq!(resolve_ip_location(&user), "浙江");
    }

    #[test]
    fn enterprise_reason_last_segment_is_the_final_fallback() {
        let user = raw(serde_json::json!({
            "enterprise_verify_reason": "某某公司 · 杭州"
        }));
        assert_eq!(resolve_ip_location(&user), "杭州");
    }

    #[test]
    fn no_location_data_yields_empty_string() {
        assert_eq!(resolve_ip_location(&raw(serde_json::json!({}))), "");
    }

    #[test]
    fn avatar_prefers_thumb_last_url() {
        let user = raw(serde_json::json!({
            "avatar_thumb": { "url_list": ["https://t1", "https://t2"] },
            "avatar_larger": { "url_list": ["https://l1"] }
        }));
        assert_eq!(resolve_avatar(&user), "https://t2");
    }

    #[test]
    fn avatar_falls_back_to_larger() {
        let user = raw(serde_json::json!({
            "avatar_thumb": { "url_list": [] },
            "avatar_larger": { "url_list": ["https://l1"] }
        }));
        assert_eq!(resolve_avatar(&user), "https://l1");
    }

    #[test]
    fn string_counts_are_parsed() {
        let user = raw(serde_json::json!({
            "follower_count": "1234",
            "total_favorited": 99
        }));
        let record = normalize(user, "sec", ProfileSource::Fallback);
        assert_eq!(record.follower_count, 1234);
        assert_eq!(record.total_favorited, 99);
        assert_eq!(record.aweme_count, 0);
    }

    #[test]
    fn nickname_control_characters_are_cleaned() {
        let user = raw(serde_json::json!({ "nickname": "名字\n第二行" }));
        let record = normalize(user, "sec", ProfileSource::Primary);
        assert_eq!(record.nickname, "名字 第二行");
    }
}
