//! First-valid-wins cookie acquisition across installed browsers.

use std::collections::BTreeMap;

use crate::browser::{Browser, CookieSource, DOUYIN_DOMAIN};
use crate::jar::{validate, CookieCheck, CookieJar};
use crate::CookieError;

/// A successfully acquired cookie jar and where it came from.
#[derive(Debug, Clone)]
pub struct Acquired {
    pub jar: CookieJar,
    pub browser: Browser,
    pub check: CookieCheck,
}

/// Pulls the Douyin cookie jar from one browser.
///
/// Extraction failures (browser not installed, locked database) and empty
/// results both come back as `None`; the failure reason is logged, not
/// propagated, since acquisition treats each browser as a best-effort source.
pub fn pull<S: CookieSource>(source: &S, browser: Browser) -> Option<CookieJar> {
    match source.cookies_for_domain(browser, DOUYIN_DOMAIN) {
        Ok(pairs) if pairs.is_empty() => {
            tracing::debug!(browser = %browser, "no douyin cookies in this browser");
            None
        }
        Ok(pairs) => Some(CookieJar::from_pairs(pairs)),
        Err(e) => {
            tracing::debug!(browser = %browser, error = %e, "cookie extraction failed");
            None
        }
    }
}

/// Scans every supported browser and reports which ones currently hold at
/// least one Douyin cookie. Browsers that are missing, locked, or empty map
/// to `false` rather than being dropped.
pub fn available_browsers<S: CookieSource>(source: &S) -> BTreeMap<Browser, bool> {
    Browser::ALL
        .into_iter()
        .map(|b| (b, pull(source, b).is_some()))
        .collect()
}

/// Tries every supported browser in order and returns the first jar that
/// passes structural validation.
///
/// A jar that is valid but not logged in still wins; the caller can inspect
/// `check.logged_in` and warn. Browsers that yield an invalid jar are
/// recorded and the scan continues.
///
/// # Errors
///
/// Returns [`CookieError::NoValidCookie`] listing every attempted browser
/// when none produced a valid jar.
pub fn acquire<S: CookieSource>(source: &S) -> Result<Acquired, CookieError> {
    let mut attempted = Vec::new();

    for browser in Browser::ALL {
        attempted.push(browser.label().to_string());
        let Some(jar) = pull(source, browser) else {
            continue;
        };

        let check = validate(&jar);
        if check.valid {
            tracing::info!(
                browser = %browser,
                cookies = jar.len(),
                logged_in = check.logged_in,
                "acquired valid douyin cookie"
            );
            return Ok(Acquired { jar, browser, check });
        }
        tracing::warn!(
            browser = %browser,
            missing = ?check.missing_fields,
            "browser cookie present but incomplete"
        );
    }

    Err(CookieError::NoValidCookie { attempted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory stand-in for real browser cookie stores.
    struct FakeSource {
        by_browser: HashMap<Browser, Vec<(String, String)>>,
        failing: Vec<Browser>,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                by_browser: HashMap::new(),
                failing: Vec::new(),
            }
        }

        fn with(mut self, browser: Browser, pairs: &[(&str, &str)]) -> Self {
            self.by_browser.insert(
                browser,
                pairs
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            );
            self
        }

        fn failing(mut self, browser: Browser) -> Self {
            self.failing.push(browser);
            self
        }
    }

    impl CookieSource for FakeSource {
        fn cookies_for_domain(
            &self,
            browser: Browser,
            _domain: &str,
        ) -> Result<Vec<(String, String)>, CookieError> {
            if self.failing.contains(&browser) {
                return Err(CookieError::Extraction {
                    browser: browser.label().to_string(),
                    reason: "database locked".to_string(),
                });
            }
            Ok(self.by_browser.get(&browser).cloned().unwrap_or_default())
        }
    }

    const VALID: &[(&str, &str)] = &[("odin_tt", "a"), ("passport_csrf_token", "b")];

    #[test]
    fn first_browser_with_valid_jar_wins() {
        let source = FakeSource::new()
            .with(Browser::Edge, VALID)
            .with(Browser::Firefox, VALID);

        let acquired = acquire(&source).unwrap();
        assert_eq!(acquired.browser, Browser::Edge);
        assert!(acquired.check.valid);
    }

    #[test]
    fn invalid_jar_is_skipped_for_a_later_valid_one() {
        let source = FakeSource::new()
            .with(Browser::Chrome, &[("ttwid", "x")])
            .with(Browser::Brave, VALID);

        let acquired = acquire(&source).unwrap();
        assert_eq!(acquired.browser, Browser::Brave);
    }

    #[test]
    fn extraction_failure_does_not_abort_the_scan() {
        let source = FakeSource::new()
            .failing(Browser::Chrome)
            .with(Browser::Edge, VALID);

        let acquired = acquire(&source).unwrap();
        assert_eq!(acquired.browser, Browser::Edge);
    }

    #[test]
    fn no_valid_cookie_lists_all_attempted_browsers() {
        let err = acquire(&FakeSource::new()).unwrap_err();
        match err {
            CookieError::NoValidCookie { attempted } => {
                assert_eq!(attempted.len(), Browser::ALL.len());
                assert_eq!(attempted[0], "chrome");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn valid_but_not_logged_in_still_wins() {
        let source = FakeSource::new().with(Browser::Chrome, VALID);
        let acquired = acquire(&source).unwrap();
        assert!(acquired.check.valid);
        assert!(!acquired.check.logged_in);
    }

    #[test]
    fn available_browsers_maps_every_browser() {
        let source = FakeSource::new()
            .failing(Browser::Chrome)
            .with(Browser::Edge, VALID)
            .with(Browser::Vivaldi, &[("anything", "x")]);

        let map = available_browsers(&source);
        assert_eq!(map.len(), Browser::ALL.len());
        assert!(!map[&Browser::Chrome]);
        assert!(map[&Browser::Edge]);
        assert!(map[&Browser::Vivaldi]);
        assert!(!map[&Browser::Firefox]);
    }

    #[test]
    fn pull_returns_none_for_empty_store() {
        let source = FakeSource::new();
        assert!(pull(&source, Browser::Chrome).is_none());
    }
}
