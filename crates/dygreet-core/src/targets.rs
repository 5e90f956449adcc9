//! Target-list file parsing.
//!
//! The target list is a plain-text file of Douyin profile URLs. Blank lines
//! and `#` comments are skipped; a single line may carry several URLs
//! separated by commas, semicolons, or whitespace. Candidates that do not
//! match a known Douyin URL shape are logged and dropped — a bad line never
//! aborts the load.

use std::fmt;
use std::path::Path;

use regex::Regex;

use crate::ConfigError;

const TEMPLATE: &str = "\
# Douyin target URL list
# One URL per line, or several per line separated by commas/semicolons.
# Lines starting with # are ignored.
#
# Supported forms:
#   https://www.douyin.com/user/MS4wLjABAAAA...
#   https://v.douyin.com/iSNbMea7/
#   https://www.iesdouyin.com/share/user/123456789
#
# Example (remove the leading # to activate):
# https://v.douyin.com/link1/, https://v.douyin.com/link2/
";

/// Which of the recognized URL shapes a target matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Canonical profile page: `www.douyin.com/user/{sec_uid}`.
    Profile,
    /// Short redirect link: `v.douyin.com/{code}`.
    ShortLink,
    /// Alternate share host: `www.iesdouyin.com/share/user/{uid}`.
    ShareLink,
}

/// A target URL validated against the known Douyin URL shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl {
    url: String,
    kind: TargetKind,
}

impl TargetUrl {
    /// Validates `candidate` against the three known URL shapes.
    #[must_use]
    pub fn parse(candidate: &str) -> Option<Self> {
        let patterns: [(TargetKind, &str); 3] = [
            (TargetKind::Profile, r"^https?://www\.douyin\.com/user/[\w-]+"),
            (TargetKind::ShortLink, r"^https?://v\.douyin\.com/[\w-]+"),
            (
                TargetKind::ShareLink,
                r"^https?://www\.iesdouyin\.com/share/user/\d+",
            ),
        ];
        for (kind, pattern) in patterns {
            let re = Regex::new(pattern).expect("valid regex");
            if re.is_match(candidate) {
                return Some(Self {
                    url: candidate.to_string(),
                    kind,
                });
            }
        }
        None
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn kind(&self) -> TargetKind {
        self.kind
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Loads and validates the target list at `path`.
///
/// Order is preserved: line order first, then left-to-right within a line.
/// Invalid candidates are logged with their line number and dropped.
///
/// # Errors
///
/// - [`ConfigError::TargetsMissing`] if the file does not exist; a commented
///   template is written at `path` first so the user can populate it.
/// - [`ConfigError::Io`] if the file cannot be read or the template cannot
///   be written.
pub fn load_targets(path: &Path) -> Result<Vec<TargetUrl>, ConfigError> {
    if !path.exists() {
        write_template(path)?;
        return Err(ConfigError::TargetsMissing {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_targets(&content))
}

/// Parses target-list text. Separated from file I/O for testability.
#[must_use]
pub(crate) fn parse_targets(content: &str) -> Vec<TargetUrl> {
    let separator = Regex::new(r"[,;\s]+").expect("valid regex");
    let mut targets = Vec::new();

    for (line_no, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        for candidate in separator.split(line).filter(|c| !c.is_empty()) {
            match TargetUrl::parse(candidate) {
                Some(target) => targets.push(target),
                None => {
                    tracing::warn!(
                        line = line_no + 1,
                        url = candidate,
                        "dropping invalid target URL"
                    );
                }
            }
        }
    }

    targets
}

fn write_template(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }
    std::fs::write(path, TEMPLATE).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "created target list template");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_all_three_url_shapes() {
        let profile = TargetUrl::parse("https://www.douyin.com/user/MS4wLjABAAAAk9ajo7u").unwrap();
        assert_eq!(profile.kind(), TargetKind::Profile);

        let short = TargetUrl::parse("https://v.douyin.com/iSNbMea7").unwrap();
        assert_eq!(short.kind(), TargetKind::ShortLink);

        let share = TargetUrl::parse("https://www.iesdouyin.com/share/user/123456").unwrap();
        assert_eq!(share.kind(), TargetKind::ShareLink);
    }

    #[test]
    fn rejects_unrelated_hosts() {
        assert!(TargetUrl::parse("https://bad-url").is_none());
        assert!(TargetUrl::parse("https://www.example.com/user/abc").is_none());
    }

    #[test]
    fn mixed_line_keeps_only_valid_candidate() {
        let targets = parse_targets("https://www.douyin.com/user/X123, https://bad-url\n");
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].as_str(), "https://www.douyin.com/user/X123");
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let content = "# header\n\nhttps://v.douyin.com/abc\n# https://v.douyin.com/commented\n";
        let targets = parse_targets(content);
        assert_eq!(targets.len(), 1);
    }

    #[test]
    fn multiple_separators_on_one_line() {
        let content =
            "https://v.douyin.com/a; https://v.douyin.com/b\thttps://v.douyin.com/c\n";
        let targets = parse_targets(content);
        let urls: Vec<&str> = targets.iter().map(TargetUrl::as_str).collect();
        assert_eq!(
            urls,
            [
                "https://v.douyin.com/a",
                "https://v.douyin.com/b",
                "https://v.douyin.com/c"
            ]
        );
    }

    #[test]
    fn order_is_line_then_subsplit() {
        let content = "https://v.douyin.com/z\nhttps://v.douyin.com/a, https://v.douyin.com/m\n";
        let targets = parse_targets(content);
        let urls: Vec<&str> = targets.iter().map(TargetUrl::as_str).collect();
        assert_eq!(
            urls,
            [
                "https://v.douyin.com/z",
                "https://v.douyin.com/a",
                "https://v.douyin.com/m"
            ]
        );
    }

    #[test]
    fn missing_file_writes_template_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls_config.txt");

        let result = load_targets(&path);
        assert!(matches!(result, Err(ConfigError::TargetsMissing { .. })));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("# Douyin target URL list"));

        // A second load reads the template: all lines commented, zero targets.
        let targets = load_targets(&path).unwrap();
        assert!(targets.is_empty());
    }
}
