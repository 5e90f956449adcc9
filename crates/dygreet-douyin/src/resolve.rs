//! Extraction of the `sec_user_id` from profile and share URLs.

use regex::Regex;

/// Pulls the `sec_user_id` out of a resolved Douyin URL.
///
/// Handles both the desktop profile shape (`/user/<id>`) and the mobile
/// share shape (`/share/user/<id>`). Query strings and fragments after the
/// id are ignored.
#[must_use]
pub fn extract_sec_user_id(url: &str) -> Option<String> {
    let user = Regex::new(r"/user/([\w-]+)").expect("valid regex");
    let share = Regex::new(r"/share/user/([\w-]+)").expect("valid regex");

    // The share shape also matches the user pattern, so try it first.
    share
        .captures(url)
        .or_else(|| user.captures(url))
        .map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_profile_url() {
        assert_eq!(
            extract_sec_user_id("https://www.douyin.com/user/MS4wLjABAAAA-abc_123"),
            Some("MS4wLjABAAAA-abc_123".to_string())
        );
    }

    #[test]
    fn extracts_from_share_url() {
        assert_eq!(
            extract_sec_user_id("https://www.iesdouyin.com/share/user/1234567890"),
            Some("1234567890".to_string())
        );
    }

    #[test]
    fn ignores_query_string() {
        assert_eq!(
            extract_sec_user_id("https://www.douyin.com/user/MS4wLjABAAAAxyz?from_tab_name=main"),
            Some("MS4wLjABAAAAxyz".to_string())
        );
    }

    #[test]
    fn non_user_url_yields_none() {
        assert_eq!(extract_sec_user_id("https://www.douyin.com/video/7001"), None);
    }
}
