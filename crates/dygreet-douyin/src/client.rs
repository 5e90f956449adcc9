//! HTTP client for the Douyin web API.
//!
//! Wraps `reqwest` with the cookie/referer headers the web endpoints expect,
//! a desktop user agent, and typed error handling. Redirects are never
//! followed automatically so short-link resolution can read the `Location`
//! header itself.

use std::time::Duration;

use reqwest::{header, redirect::Policy, Client, Url};

use crate::error::DouyinError;

const DEFAULT_BASE_URL: &str = "https://www.douyin.com";
const REFERER: &str = "https://www.douyin.com/";
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Client for the Douyin web API.
///
/// Carries the borrowed cookie header verbatim on every request. Use
/// [`DouyinClient::new`] for production or [`DouyinClient::with_base_url`]
/// to point at a mock server in tests.
pub struct DouyinClient {
    client: Client,
    cookie: String,
    base_url: Url,
}

impl DouyinClient {
    /// Creates a client pointed at the production Douyin web API.
    ///
    /// # Errors
    ///
    /// Returns [`DouyinError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        cookie_header: &str,
        user_agent: &str,
        timeout_secs: u64,
    ) -> Result<Self, DouyinError> {
        Self::with_base_url(cookie_header, user_agent, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DouyinError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`DouyinError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        cookie_header: &str,
        user_agent: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, DouyinError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(user_agent)
            .redirect(Policy::none())
            .build()?;

        // Keep exactly one trailing slash so Url::join treats the base as a
        // directory rather than replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| DouyinError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            cookie: cookie_header.to_string(),
            base_url,
        })
    }

    /// Resolves a `v.douyin.com` short link by reading the redirect target.
    ///
    /// Returns the `Location` header of the first redirect response, or the
    /// request URL itself when the server answers 2xx directly.
    ///
    /// # Errors
    ///
    /// - [`DouyinError::Http`] on network failure or a 4xx/5xx status.
    /// - [`DouyinError::EmptyBody`] when a redirect carries no `Location`.
    pub async fn resolve_short_link(&self, url: &str) -> Result<String, DouyinError> {
        let response = self.get(url).send().await?;

        if response.status().is_redirection() {
            return response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| DouyinError::EmptyBody {
                    context: format!("short link redirect for {url}"),
                });
        }

        let response = response.error_for_status()?;
        Ok(response.url().to_string())
    }

    /// Sends a GET to an API path under the base URL and parses the body as
    /// JSON. An empty body is an error distinct from malformed JSON because
    /// the API signals throttling and expired cookies that way.
    pub(crate) async fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, DouyinError> {
        let url = self.build_url(path, params)?;
        let response = self.get(url.as_str()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        if body.trim().is_empty() {
            return Err(DouyinError::EmptyBody {
                context: path.to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| DouyinError::Deserialize {
            context: path.to_string(),
            source: e,
        })
    }

    pub(crate) fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header(header::COOKIE, &self.cookie)
            .header(header::REFERER, REFERER)
    }

    pub(crate) fn head(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .head(url)
            .header(header::COOKIE, &self.cookie)
            .header(header::REFERER, REFERER)
    }

    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, DouyinError> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| DouyinError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> DouyinClient {
        DouyinClient::with_base_url("odin_tt=a", "test-agent", 30, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_joins_path_and_params() {
        let client = test_client("https://www.douyin.com");
        let url = client
            .build_url("aweme/v1/web/aweme/post/", &[("max_cursor", "0"), ("count", "18")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.douyin.com/aweme/v1/web/aweme/post/?max_cursor=0&count=18"
        );
    }

    #[test]
    fn build_url_tolerates_trailing_slash_in_base() {
        let client = test_client("http://127.0.0.1:9999/");
        let url = client
            .build_url("/web/api/v2/user/info/", &[("sec_uid", "abc")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9999/web/api/v2/user/info/?sec_uid=abc"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = DouyinClient::with_base_url("c", "ua", 30, "not a url");
        assert!(matches!(result, Err(DouyinError::InvalidBaseUrl { .. })));
    }
}
