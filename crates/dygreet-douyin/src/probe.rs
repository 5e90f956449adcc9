//! Layered media size probing.
//!
//! CDN nodes are inconsistent about `HEAD` support, so the probe tries three
//! strategies in order of cost: a `HEAD` request, a two-byte ranged `GET`
//! (reading the total from `Content-Range`), and finally a plain `GET` whose
//! body is never awaited. A probe never fails the pipeline; unknown sizes
//! come back as `-1`.

use reqwest::header;

use crate::client::DouyinClient;

impl DouyinClient {
    /// Probes the byte size of a media URL, or `-1` when every strategy
    /// comes up empty.
    pub async fn probe_size(&self, url: &str) -> i64 {
        if url.is_empty() {
            return -1;
        }

        if let Some(size) = self.probe_head(url).await {
            return size;
        }
        if let Some(size) = self.probe_range(url).await {
            return size;
        }
        if let Some(size) = self.probe_get(url).await {
            return size;
        }

        tracing::debug!(url, "all size probe strategies failed");
        -1
    }

    async fn probe_head(&self, url: &str) -> Option<i64> {
        let response = self.head(url).send().await.ok()?;
        content_length_of(response.headers()).filter(|n| *n > 0)
    }

    async fn probe_range(&self, url: &str) -> Option<i64> {
        let response = self
            .get(url)
            .header(header::RANGE, "bytes=0-1")
            .send()
            .await
            .ok()?;
        if response.status() != reqwest::StatusCode::PARTIAL_CONTENT {
            return None;
        }
        let content_range = response.headers().get(header::CONTENT_RANGE)?.to_str().ok()?;
        // "bytes 0-1/12345" -> total after the slash
        content_range
            .rsplit('/')
            .next()
            .and_then(|total| total.parse::<i64>().ok())
            .filter(|n| *n > 0)
    }

    async fn probe_get(&self, url: &str) -> Option<i64> {
        let response = self.get(url).send().await.ok()?;
        content_length_of(response.headers()).filter(|n| *n > 0)
    }
}

fn content_length_of(headers: &header::HeaderMap) -> Option<i64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Renders a byte count for logs and report tables; `-1` is "unknown".
#[must_use]
pub fn format_size(bytes: i64) -> String {
    if bytes < 0 {
        return "unknown".to_string();
    }
    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if value < 1024.0 {
            return format!("{value:.2} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.2} TB")
}
