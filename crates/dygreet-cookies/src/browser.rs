//! Browser enumeration and the cookie extraction seam.

use std::fmt;

use crate::CookieError;

/// Cookie scope for every extraction call.
pub const DOUYIN_DOMAIN: &str = "douyin.com";

/// The fixed set of supported browsers, in acquisition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Browser {
    Chrome,
    Edge,
    Firefox,
    Opera,
    Brave,
    Arc,
    Vivaldi,
    Chromium,
}

impl Browser {
    /// All supported browsers, in the order acquisition tries them.
    pub const ALL: [Browser; 8] = [
        Browser::Chrome,
        Browser::Edge,
        Browser::Firefox,
        Browser::Opera,
        Browser::Brave,
        Browser::Arc,
        Browser::Vivaldi,
        Browser::Chromium,
    ];

    /// Lowercase label used in the credential store's `browser=` directive.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Edge => "edge",
            Browser::Firefox => "firefox",
            Browser::Opera => "opera",
            Browser::Brave => "brave",
            Browser::Arc => "arc",
            Browser::Vivaldi => "vivaldi",
            Browser::Chromium => "chromium",
        }
    }

    /// Parses a store directive label back into a browser.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.label() == label.to_lowercase())
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Extraction seam over installed-browser cookie databases.
///
/// Production uses [`RookieSource`]; tests substitute an in-memory fake so
/// acquisition logic can be exercised without browser profiles on disk.
pub trait CookieSource {
    /// Returns `(name, value)` pairs for `domain` from `browser`'s cookie
    /// store, in store order.
    ///
    /// # Errors
    ///
    /// Returns [`CookieError::Extraction`] when the browser is not installed,
    /// its cookie database is locked, or decryption fails.
    fn cookies_for_domain(
        &self,
        browser: Browser,
        domain: &str,
    ) -> Result<Vec<(String, String)>, CookieError>;
}

/// [`CookieSource`] backed by the `rookie` crate (the same extraction engine
/// the upstream `rookiepy` binding wraps).
#[derive(Debug, Default)]
pub struct RookieSource;

impl CookieSource for RookieSource {
    fn cookies_for_domain(
        &self,
        browser: Browser,
        domain: &str,
    ) -> Result<Vec<(String, String)>, CookieError> {
        let domains = Some(vec![domain.to_string()]);
        let cookies = match browser {
            Browser::Chrome => rookie::chrome(domains),
            Browser::Edge => rookie::edge(domains),
            Browser::Firefox => rookie::firefox(domains),
            Browser::Opera => rookie::opera(domains),
            Browser::Brave => rookie::brave(domains),
            Browser::Arc => rookie::arc(domains),
            Browser::Vivaldi => rookie::vivaldi(domains),
            Browser::Chromium => rookie::chromium(domains),
        }
        .map_err(|e| CookieError::Extraction {
            browser: browser.label().to_string(),
            reason: e.to_string(),
        })?;

        Ok(cookies.into_iter().map(|c| (c.name, c.value)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for browser in Browser::ALL {
            assert_eq!(Browser::from_label(browser.label()), Some(browser));
        }
    }

    #[test]
    fn from_label_is_case_insensitive() {
        assert_eq!(Browser::from_label("Chrome"), Some(Browser::Chrome));
    }

    #[test]
    fn unknown_label_is_none() {
        assert_eq!(Browser::from_label("netscape"), None);
    }

    #[test]
    fn chrome_is_tried_first() {
        assert_eq!(Browser::ALL[0], Browser::Chrome);
    }
}
