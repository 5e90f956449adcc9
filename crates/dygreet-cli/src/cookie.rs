//! `cookie` command: acquire from a browser and persist to the store.

use dygreet_cookies::{acquire, pull, validate, Acquired, Browser, CredentialStore, RookieSource};
use dygreet_core::AppConfig;

pub(crate) fn execute(config: &AppConfig, browser_label: Option<&str>) -> anyhow::Result<()> {
    let store = CredentialStore::new(&config.cookie_config_path);
    let source = RookieSource;

    let acquired = match browser_label {
        Some(label) => {
            let browser = Browser::from_label(label)
                .ok_or_else(|| anyhow::anyhow!("unknown browser '{label}'"))?;
            let jar = pull(&source, browser)
                .ok_or_else(|| anyhow::anyhow!("no Douyin cookies found in {browser}"))?;
            let check = validate(&jar);
            if !check.valid {
                anyhow::bail!(
                    "cookie from {browser} is incomplete: missing {}",
                    check.missing_fields.join(", ")
                );
            }
            Acquired {
                jar,
                browser,
                check,
            }
        }
        None => acquire(&source)?,
    };

    store.write_active(&acquired.jar.to_cookie_header(), acquired.browser.label())?;
    store.save_cookie_info(&acquired.jar, "https://www.douyin.com/", acquired.browser)?;

    println!(
        "cookie acquired from {} ({} cookies, {})",
        acquired.browser,
        acquired.jar.len(),
        if acquired.check.logged_in {
            "logged in"
        } else {
            "not logged in"
        }
    );
    println!("saved to {}", store.path().display());
    Ok(())
}
