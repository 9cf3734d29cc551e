//! Biography extraction from a resolved profile page.

use crate::batch::unresolved::UnresolvedSet;
use crate::browser::BrowserSession;
use crate::config::FameConfig;
use crate::error::{SessionError, WaitError};
use crate::resolve::{ProfileResolver, Strategy};
use tracing::{debug, info};

/// What a profile page showed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Biography text was read.
    Biography(String),
    /// The page explicitly has no biography.
    NoBiography,
    /// Neither a biography nor the no-biography indicator appeared.
    Unrecognized,
}

/// Extracts biographies, trying each resolution strategy in turn.
pub struct BiographyExtractor<'a> {
    config: &'a FameConfig,
    resolver: ProfileResolver<'a>,
}

impl<'a> BiographyExtractor<'a> {
    pub fn new(config: &'a FameConfig) -> Self {
        Self {
            config,
            resolver: ProfileResolver::new(config),
        }
    }

    /// Biography for `name`, or `None` when no strategy yields one.
    ///
    /// A strategy whose page shows no biography (or nothing recognizable)
    /// hands over to the next one; a strategy with no candidate URL ends the
    /// attempt. Exhausted names are recorded in `unresolved`. Only session
    /// faults are returned as errors.
    pub async fn extract(
        &self,
        name: &str,
        session: &mut BrowserSession,
        unresolved: &mut UnresolvedSet,
    ) -> Result<Option<String>, SessionError> {
        for strategy in Strategy::ORDER {
            let Some(url) = strategy.candidate(&self.resolver, name, session).await else {
                debug!("{name}: {} produced no candidate", strategy.name());
                break;
            };

            session.navigate(&url).await?;
            match self.read_page(session).await? {
                PageOutcome::Biography(text) => {
                    info!("{name}: biography via {} ({url})", strategy.name());
                    return Ok(Some(text));
                }
                PageOutcome::NoBiography => {
                    debug!("{name}: no biography at {url}");
                }
                PageOutcome::Unrecognized => {
                    debug!("{name}: biography not found at {url}");
                }
            }
        }

        info!("{name} unavailable");
        unresolved.record(name);
        Ok(None)
    }

    /// Classify the current page and read its biography if it has one.
    pub async fn read_page(&self, session: &mut BrowserSession) -> Result<PageOutcome, SessionError> {
        let sel = &self.config.site.selectors;
        let markers = [
            sel.no_biography.clone(),
            sel.read_more.clone(),
            sel.biography.clone(),
        ];

        let found = match session
            .wait_for_any(&markers, &self.config.extractor.page_wait)
            .await
        {
            Ok(found) => found,
            Err(WaitError::Timeout(_)) => return Ok(PageOutcome::Unrecognized),
            Err(WaitError::Session(e)) => return Err(e),
        };

        let bio = match found {
            (0, _) => return Ok(PageOutcome::NoBiography),
            (1, read_more) => {
                session.click(read_more).await?;
                match session
                    .wait_for(&sel.biography, &self.config.extractor.expand_wait)
                    .await
                {
                    Ok(bio) => bio,
                    Err(WaitError::Timeout(_)) => return Ok(PageOutcome::Unrecognized),
                    Err(WaitError::Session(e)) => return Err(e),
                }
            }
            (_, bio) => bio,
        };

        let text = session.read_text(bio).await?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(PageOutcome::Unrecognized);
        }
        Ok(PageOutcome::Biography(text.to_string()))
    }
}
