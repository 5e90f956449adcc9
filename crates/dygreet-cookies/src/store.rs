//! Line-oriented credential store file.
//!
//! The store file holds one active credential: either a literal `cookie=`
//! string or a `browser=` directive naming the browser to pull a live cookie
//! from. Comments and unknown lines are preserved verbatim across rewrites,
//! and the previous content is backed up to a timestamped JSON artifact
//! before every overwrite.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use crate::browser::Browser;
use crate::jar::{validate, CookieJar};
use crate::CookieError;

const PLACEHOLDER: &str = "your_cookie_string_here";

const DEFAULT_TEMPLATE: &str = "\
# Douyin cookie configuration
#
# Option 1: paste the full cookie string (uncomment the line):
#cookie=your_cookie_string_here
#
# Option 2: pull cookies automatically from a browser:
browser=chrome
#
# Notes:
# - Cookies expire after hours to days; refresh by re-logging into the
#   Douyin web client and rerunning the cookie command.
";

/// The active credential read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// A literal `key=value; key=value` cookie string, ready for the
    /// `Cookie` header.
    CookieString(String),
    /// Pull a live cookie from this browser instead.
    FromBrowser(Browser),
}

#[derive(Serialize)]
struct Backup<'a> {
    timestamp: String,
    config_content: &'a str,
}

#[derive(Serialize)]
struct CookieInfo<'a> {
    timestamp: String,
    user_url: &'a str,
    browser_source: &'a str,
    cookie_jar: &'a CookieJar,
    cookie_string: String,
    validation: crate::jar::CookieCheck,
}

/// File-backed credential store.
pub struct CredentialStore {
    path: PathBuf,
    backup_path: PathBuf,
    info_path: PathBuf,
}

impl CredentialStore {
    /// Creates a store over `path`. Backup and cookie-info artifacts are
    /// written as siblings (`cookie_backup.json`, `cookie_info.json`).
    #[must_use]
    pub fn new(path: &Path) -> Self {
        let dir = path.parent().map_or_else(PathBuf::new, Path::to_path_buf);
        Self {
            path: path.to_path_buf(),
            backup_path: dir.join("cookie_backup.json"),
            info_path: dir.join("cookie_info.json"),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the active credential.
    ///
    /// The first uncommented `cookie=` line wins; failing that, a
    /// `browser=<name>` line yields a pull directive. Returns `Ok(None)` when
    /// the file is missing (a default template is written as a side effect)
    /// or only the placeholder value is present.
    ///
    /// # Errors
    ///
    /// Returns [`CookieError::Io`] if the file cannot be read or the template
    /// cannot be written.
    pub fn read_active(&self) -> Result<Option<Credential>, CookieError> {
        if !self.path.exists() {
            self.write_default_template()?;
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| CookieError::Io {
            path: self.path.clone(),
            source,
        })?;

        let mut browser_directive: Option<Browser> = None;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(value) = line.strip_prefix("cookie=") {
                let value = value.trim();
                if !value.is_empty() && value != PLACEHOLDER {
                    return Ok(Some(Credential::CookieString(value.to_string())));
                }
            } else if let Some(label) = line.strip_prefix("browser=") {
                if browser_directive.is_none() {
                    browser_directive = Browser::from_label(label.trim());
                }
            }
        }

        Ok(browser_directive.map(Credential::FromBrowser))
    }

    /// Replaces the active credential, preserving the rest of the file.
    ///
    /// The current file content is backed up first (a backup failure is
    /// logged, not fatal). Only the `cookie=`/`#cookie=` and `browser=` lines
    /// are rewritten; comments and unknown lines pass through verbatim. A
    /// `# last updated:` comment is refreshed or appended.
    ///
    /// # Errors
    ///
    /// Returns [`CookieError::Io`] if the rewritten file cannot be written.
    pub fn write_active(&self, cookie_string: &str, browser_label: &str) -> Result<(), CookieError> {
        if let Err(e) = self.backup() {
            tracing::warn!(error = %e, "credential backup failed; continuing with overwrite");
        }

        let content = if self.path.exists() {
            std::fs::read_to_string(&self.path).map_err(|source| CookieError::Io {
                path: self.path.clone(),
                source,
            })?
        } else {
            DEFAULT_TEMPLATE.to_string()
        };

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut new_lines: Vec<String> = Vec::new();
        let mut cookie_written = false;
        let mut stamp_written = false;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with("cookie=") || trimmed.starts_with("#cookie=") {
                if !cookie_written {
                    new_lines.push(format!("cookie={cookie_string}"));
                    cookie_written = true;
                }
            } else if trimmed.starts_with("browser=") {
                new_lines.push(format!("browser={browser_label}"));
            } else if trimmed.starts_with("# last updated:") {
                new_lines.push(format!("# last updated: {timestamp}"));
                stamp_written = true;
            } else {
                new_lines.push(line.to_string());
            }
        }

        if !cookie_written {
            new_lines.push(format!("cookie={cookie_string}"));
        }
        if !stamp_written {
            new_lines.push(format!("# last updated: {timestamp}"));
        }

        self.write_file(&self.path, &(new_lines.join("\n") + "\n"))?;
        tracing::info!(path = %self.path.display(), "credential store updated");
        Ok(())
    }

    /// Writes a detailed cookie-info JSON artifact next to the store file.
    ///
    /// # Errors
    ///
    /// Returns [`CookieError::Serialize`] or [`CookieError::Io`] on failure.
    pub fn save_cookie_info(
        &self,
        jar: &CookieJar,
        user_url: &str,
        browser: Browser,
    ) -> Result<(), CookieError> {
        let info = CookieInfo {
            timestamp: Local::now().to_rfc3339(),
            user_url,
            browser_source: browser.label(),
            cookie_jar: jar,
            cookie_string: jar.to_cookie_header(),
            validation: validate(jar),
        };
        let body = serde_json::to_string_pretty(&info).map_err(|source| CookieError::Serialize {
            context: "cookie info".to_string(),
            source,
        })?;
        self.write_file(&self.info_path, &body)
    }

    fn backup(&self) -> Result<(), CookieError> {
        if !self.path.exists() {
            return Ok(());
        }
        let current = std::fs::read_to_string(&self.path).map_err(|source| CookieError::Io {
            path: self.path.clone(),
            source,
        })?;
        let backup = Backup {
            timestamp: Local::now().to_rfc3339(),
            config_content: &current,
        };
        let body =
            serde_json::to_string_pretty(&backup).map_err(|source| CookieError::Serialize {
                context: "credential backup".to_string(),
                source,
            })?;
        self.write_file(&self.backup_path, &body)
    }

    fn write_default_template(&self) -> Result<(), CookieError> {
        self.write_file(&self.path, DEFAULT_TEMPLATE)?;
        tracing::info!(path = %self.path.display(), "created default cookie config");
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), CookieError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| CookieError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }
        std::fs::write(path, content).map_err(|source| CookieError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> CredentialStore {
        CredentialStore::new(&dir.join("cookie_config.txt"))
    }

    #[test]
    fn missing_file_creates_template_and_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let active = store.read_active().unwrap();
        assert_eq!(active, None);
        assert!(store.path().exists());
    }

    #[test]
    fn template_read_yields_browser_directive() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.read_active().unwrap(); // creates template

        let active = store.read_active().unwrap();
        assert_eq!(active, Some(Credential::FromBrowser(Browser::Chrome)));
    }

    #[test]
    fn placeholder_cookie_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookie_config.txt");
        std::fs::write(&path, "cookie=your_cookie_string_here\n").unwrap();

        let store = CredentialStore::new(&path);
        assert_eq!(store.read_active().unwrap(), None);
    }

    #[test]
    fn first_uncommented_cookie_line_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookie_config.txt");
        std::fs::write(
            &path,
            "#cookie=commented\ncookie=odin_tt=a; passport_csrf_token=b\ncookie=second\n",
        )
        .unwrap();

        let store = CredentialStore::new(&path);
        assert_eq!(
            store.read_active().unwrap(),
            Some(Credential::CookieString(
                "odin_tt=a; passport_csrf_token=b".to_string()
            ))
        );
    }

    #[test]
    fn write_preserves_comments_and_replaces_directives() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookie_config.txt");
        std::fs::write(
            &path,
            "# keep this comment\ncookie=old_value\nbrowser=edge\nunknown line kept\n",
        )
        .unwrap();

        let store = CredentialStore::new(&path);
        store.write_active("new_value", "chrome").unwrap();

        let rewritten = std::fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains("# keep this comment"));
        assert!(rewritten.contains("cookie=new_value"));
        assert!(rewritten.contains("browser=chrome"));
        assert!(rewritten.contains("unknown line kept"));
        assert!(rewritten.contains("# last updated:"));
        assert!(!rewritten.contains("old_value"));
    }

    #[test]
    fn write_backs_up_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookie_config.txt");
        std::fs::write(&path, "cookie=previous\n").unwrap();

        let store = CredentialStore::new(&path);
        store.write_active("next", "chrome").unwrap();

        let backup = std::fs::read_to_string(dir.path().join("cookie_backup.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&backup).unwrap();
        assert!(parsed["config_content"]
            .as_str()
            .unwrap()
            .contains("cookie=previous"));
        assert!(parsed["timestamp"].is_string());
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.read_active().unwrap(); // template

        store
            .write_active("odin_tt=a; passport_csrf_token=b", "firefox")
            .unwrap();
        assert_eq!(
            store.read_active().unwrap(),
            Some(Credential::CookieString(
                "odin_tt=a; passport_csrf_token=b".to_string()
            ))
        );
    }

    #[test]
    fn cookie_info_artifact_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let jar = CookieJar::from_pairs(vec![
            ("odin_tt".to_string(), "a".to_string()),
            ("passport_csrf_token".to_string(), "b".to_string()),
        ]);

        store
            .save_cookie_info(&jar, "https://v.douyin.com/abc", Browser::Chrome)
            .unwrap();

        let info = std::fs::read_to_string(dir.path().join("cookie_info.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&info).unwrap();
        assert_eq!(parsed["browser_source"], "chrome");
        assert_eq!(parsed["validation"]["valid"], true);
        assert_eq!(parsed["validation"]["logged_in"], false);
    }
}
