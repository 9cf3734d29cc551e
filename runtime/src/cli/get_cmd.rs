//! `fame get <name>`: fame score for one artist.

use crate::browser::chromium::ChromiumLauncher;
use crate::cli::output::{self, Styled};
use crate::config::FameConfig;
use crate::query::get_fame;
use anyhow::Result;

/// Run the get command.
pub async fn run(name: &str, config: &FameConfig) -> Result<()> {
    let s = Styled::new();

    if !output::is_quiet() && !output::is_json() {
        eprintln!("  Looking up {name}...");
    }

    let fame = get_fame(name, config, &ChromiumLauncher).await;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "artist": name,
            "fame": fame,
        }));
    } else {
        println!("{fame}");
        if !output::is_quiet() {
            let sym = if fame > 0 { s.ok_sym() } else { s.warn_sym() };
            eprintln!("  {sym} {name}: fame {}", s.bold(&fame.to_string()));
        }
    }

    Ok(())
}
