//! `fame resolve <name>`: show the profile URL an artist resolves to.

use crate::browser::chromium::ChromiumLauncher;
use crate::browser::{BrowserSession, LaunchOptions};
use crate::cli::output::{self, Styled};
use crate::config::FameConfig;
use crate::resolve::ProfileResolver;
use anyhow::{Context, Result};

/// Run the resolve command.
pub async fn run(name: &str, config: &FameConfig) -> Result<()> {
    let s = Styled::new();
    let mut session = BrowserSession::new();
    session
        .initialize(
            &config.browser.platform,
            &config.browser.platforms,
            &ChromiumLauncher,
            &LaunchOptions::from(&config.browser),
        )
        .await
        .context("failed to start browser")?;

    let resolver = ProfileResolver::new(config);
    let result = resolver.resolve(name, &mut session).await;
    session.close().await;
    let url = result.context("resolution aborted")?;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "artist": name,
            "direct_url": resolver.direct_url(name),
            "url": url,
        }));
        return Ok(());
    }

    match &url {
        Some(u) => {
            println!("{u}");
            if !output::is_quiet() {
                eprintln!("  {} {name} -> {}", s.ok_sym(), s.green(u));
            }
        }
        None => {
            if !output::is_quiet() {
                eprintln!("  {} No profile found for {name}.", s.warn_sym());
            }
        }
    }

    Ok(())
}
