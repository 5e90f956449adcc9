//! Cookie jar representation and the two-tier validity check.

use serde::Serialize;

/// Fields that must be present and non-empty for a jar to be usable at all.
const REQUIRED_FIELDS: [&str; 2] = ["odin_tt", "passport_csrf_token"];

/// Field whose presence marks an authenticated (logged-in) session.
const LOGIN_FIELD: &str = "sessionid_ss";

/// An ordered set of cookie `(name, value)` pairs for one domain.
///
/// Order is preserved from the browser's cookie store so the rendered header
/// matches what the browser itself would send.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CookieJar {
    pairs: Vec<(String, String)>,
}

impl CookieJar {
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Parses a `Cookie` header value (`name=value; name=value`) back into a
    /// jar. Segments without `=` are skipped.
    #[must_use]
    pub fn parse_header(header: &str) -> Self {
        let pairs = header
            .split(';')
            .filter_map(|segment| {
                let (name, value) = segment.trim().split_once('=')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some((name.to_string(), value.trim().to_string()))
            })
            .collect();
        Self { pairs }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Value of the first cookie named `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Renders the jar as a `Cookie` header value: `name=value; name=value`.
    #[must_use]
    pub fn to_cookie_header(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Outcome of validating a [`CookieJar`].
///
/// `valid` and `logged_in` are distinct tiers: a jar can be structurally
/// usable for anonymous API calls while the session field is absent.
#[derive(Debug, Clone, Serialize)]
pub struct CookieCheck {
    pub valid: bool,
    pub logged_in: bool,
    pub missing_fields: Vec<String>,
    pub message: String,
}

/// Checks a jar against the required and session fields.
///
/// `valid` requires every field in `REQUIRED_FIELDS` present and non-empty;
/// `missing_fields` lists exactly the ones that failed. `logged_in`
/// additionally requires the session field. Not-logged-in is reported in the
/// message but is not an error.
#[must_use]
pub fn validate(jar: &CookieJar) -> CookieCheck {
    let missing_fields: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| jar.get(field).is_none_or(str::is_empty))
        .map(|field| (*field).to_string())
        .collect();

    if !missing_fields.is_empty() {
        return CookieCheck {
            valid: false,
            logged_in: false,
            message: format!("cookie missing required fields: {}", missing_fields.join(", ")),
            missing_fields,
        };
    }

    let logged_in = jar.get(LOGIN_FIELD).is_some_and(|v| !v.is_empty());
    CookieCheck {
        valid: true,
        logged_in,
        missing_fields,
        message: if logged_in {
            "cookie valid, logged-in session".to_string()
        } else {
            "cookie valid, but not logged in".to_string()
        },
    }
}
