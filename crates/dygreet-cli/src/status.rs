//! `status` command: configuration, credential state, and browser scan.

use dygreet_cookies::{available_browsers, Credential, CredentialStore, RookieSource};
use dygreet_core::{load_targets, AppConfig};

pub(crate) fn execute(config: &AppConfig) -> anyhow::Result<()> {
    println!("targets file:   {}", config.targets_path.display());
    if config.targets_path.exists() {
        match load_targets(&config.targets_path) {
            Ok(targets) => println!("  {} valid target(s)", targets.len()),
            Err(e) => println!("  unreadable: {e}"),
        }
    } else {
        println!("  missing (a template is created on the first run)");
    }

    println!("cookie config:  {}", config.cookie_config_path.display());
    if config.cookie_config_path.exists() {
        let store = CredentialStore::new(&config.cookie_config_path);
        match store.read_active() {
            Ok(Some(Credential::CookieString(_))) => println!("  literal cookie configured"),
            Ok(Some(Credential::FromBrowser(browser))) => {
                println!("  browser directive: {browser}");
            }
            Ok(None) => println!("  no active credential"),
            Err(e) => println!("  unreadable: {e}"),
        }
    } else {
        println!("  missing (created on first use)");
    }

    println!("browsers:");
    for (browser, present) in available_browsers(&RookieSource) {
        println!(
            "  {:<10} {}",
            browser.label(),
            if present { "douyin cookies" } else { "-" }
        );
    }

    println!("output dir:     {}", config.output_dir.display());
    println!("talk output:    {}", config.talk_output_dir.display());
    println!(
        "coze:           {} ({})",
        if config.coze_api_token.is_some() && config.coze_bot_id.is_some() {
            "configured"
        } else {
            "not configured"
        },
        config.coze_base_url
    );
    Ok(())
}
