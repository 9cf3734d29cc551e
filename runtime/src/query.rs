//! Single-entity fame lookup.
//!
//! Each call launches and tears down its own browser, so looping over this
//! is slow; batches should go through `BatchOrchestrator`.

use crate::batch::{score_entity, UnresolvedSet};
use crate::browser::{BrowserSession, DriverLauncher, LaunchOptions};
use crate::config::FameConfig;
use crate::extract::BiographyExtractor;
use tracing::{info, warn};

/// Fame score for `name`. Never fails: any problem scores 0.
pub async fn get_fame(name: &str, config: &FameConfig, launcher: &dyn DriverLauncher) -> u32 {
    let mut session = BrowserSession::new();
    if let Err(e) = session
        .initialize(
            &config.browser.platform,
            &config.browser.platforms,
            launcher,
            &LaunchOptions::from(&config.browser),
        )
        .await
    {
        warn!("browser not initialized, cannot get fame: {e}");
        return 0;
    }

    let extractor = BiographyExtractor::new(config);
    let mut unresolved = UnresolvedSet::new();
    let outcome = score_entity(&extractor, name, &mut session, &mut unresolved).await;
    session.close().await;

    let fame = outcome.fame_or_zero();
    info!("fame for {name}: {fame}");
    fame
}
