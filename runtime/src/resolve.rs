//! Resolve an artist name to a profile URL.
//!
//! Two strategies, tried in order: guess the profile URL from a slug of the
//! name, then fall back to the site's search widget and pick the closest
//! artist suggestion.

use crate::browser::{BrowserSession, ElementHandle};
use crate::config::FameConfig;
use crate::error::{SessionError, WaitError};
use crate::text::{similarity, slugify};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

/// A way of producing a candidate profile URL for a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    DirectGuess,
    SearchFallback,
}

impl Strategy {
    /// Strategies in the order they are tried.
    pub const ORDER: [Strategy; 2] = [Strategy::DirectGuess, Strategy::SearchFallback];

    pub fn name(self) -> &'static str {
        match self {
            Self::DirectGuess => "direct_guess",
            Self::SearchFallback => "search_fallback",
        }
    }

    /// Candidate URL for `name`, or `None` when the strategy has nothing.
    pub async fn candidate(
        self,
        resolver: &ProfileResolver<'_>,
        name: &str,
        session: &mut BrowserSession,
    ) -> Option<String> {
        match self {
            Self::DirectGuess => Some(resolver.direct_url(name)),
            Self::SearchFallback => resolver.search(name, session).await,
        }
    }
}

/// A scored search suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionMatch {
    pub index: usize,
    pub name: String,
    pub similarity: f64,
}

/// Profile URL resolution against the configured site.
pub struct ProfileResolver<'a> {
    config: &'a FameConfig,
}

impl<'a> ProfileResolver<'a> {
    pub fn new(config: &'a FameConfig) -> Self {
        Self { config }
    }

    /// Profile URL guessed from the name's slug.
    pub fn direct_url(&self, name: &str) -> String {
        let site = &self.config.site;
        format!(
            "{}/{}/{}",
            site.base_url.trim_end_matches('/'),
            site.profile_path.trim_matches('/'),
            slugify(name)
        )
    }

    /// URL of the page hosting the search widget.
    pub fn search_url(&self) -> String {
        let site = &self.config.site;
        format!(
            "{}/{}/",
            site.base_url.trim_end_matches('/'),
            site.search_path.trim_matches('/')
        )
    }

    /// Resolve `name` to a profile URL.
    ///
    /// The direct guess is navigated to and accepted unless the page shows
    /// the not-found indicator; only then is the search widget consulted.
    /// A page that shows no known marker before `resolver.page_wait` runs
    /// out is still accepted: the extractor will classify it as
    /// unrecognized and move on to the search fallback itself.
    pub async fn resolve(
        &self,
        name: &str,
        session: &mut BrowserSession,
    ) -> Result<Option<String>, SessionError> {
        let direct = self.direct_url(name);
        session.navigate(&direct).await?;

        if !self.shows_not_found(session).await? {
            info!("{name}: direct profile {direct}");
            return Ok(Some(direct));
        }

        debug!("{name}: direct guess not found, searching");
        Ok(self.search(name, session).await)
    }

    /// Wait for the page to settle into either the not-found state or a
    /// profile, and report whether it is the former.
    async fn shows_not_found(&self, session: &mut BrowserSession) -> Result<bool, SessionError> {
        let sel = &self.config.site.selectors;
        let markers = [sel.not_found.clone(), sel.read_more.clone(), sel.biography.clone()];
        match session
            .wait_for_any(&markers, &self.config.resolver.page_wait)
            .await
        {
            Ok((index, _)) => Ok(index == 0),
            // only an explicit not-found indicator sends the name to search
            Err(WaitError::Timeout(_)) => Ok(false),
            Err(WaitError::Session(e)) => Err(e),
        }
    }

    /// Search fallback. Never fails: any fault is logged and treated as
    /// "no candidate".
    pub async fn search(&self, name: &str, session: &mut BrowserSession) -> Option<String> {
        match self.try_search(name, session).await {
            Ok(url) => url,
            Err(e) => {
                warn!("{name}: search fallback failed: {e}");
                None
            }
        }
    }

    async fn try_search(
        &self,
        name: &str,
        session: &mut BrowserSession,
    ) -> Result<Option<String>, SessionError> {
        let sel = &self.config.site.selectors;
        let settings = &self.config.resolver;

        session.navigate(&self.search_url()).await?;
        let Some(input) = session.find(&sel.search_input).await? else {
            warn!("{name}: search field not found");
            return Ok(None);
        };
        session.type_text(input, name).await?;

        let list = match session
            .wait_for(&sel.suggestion_list, &settings.suggestion_wait)
            .await
        {
            Ok(list) => list,
            Err(WaitError::Timeout(waited)) => {
                debug!("{name}: no suggestions after {waited:?}");
                return Ok(None);
            }
            Err(WaitError::Session(e)) => return Err(e),
        };

        let Some((best, item)) = self.best_suggestion(name, list, session).await? else {
            info!("{name}: no artist suggestion");
            return Ok(None);
        };

        if best.similarity < settings.match_threshold {
            info!(
                "{name}: best suggestion '{}' ({:.3}) below threshold {}",
                best.name, best.similarity, settings.match_threshold
            );
            return Ok(None);
        }

        let Some(link) = session.find_in(item, &sel.suggestion_link).await? else {
            warn!("{name}: suggestion {} has no link", best.index);
            return Ok(None);
        };
        let href = session.attribute(link, "href").await?;
        let url = href.and_then(|h| self.absolute(&h));
        if let Some(u) = &url {
            info!("{name}: matched '{}' ({:.3}) -> {u}", best.name, best.similarity);
        }
        Ok(url)
    }

    /// Walk suggestions from index 0 until one is missing and keep the most
    /// similar artist entry. Ties keep the earlier suggestion.
    async fn best_suggestion(
        &self,
        name: &str,
        list: ElementHandle,
        session: &mut BrowserSession,
    ) -> Result<Option<(SuggestionMatch, ElementHandle)>, SessionError> {
        let sel = &self.config.site.selectors;
        let settings = &self.config.resolver;
        let mut best: Option<(SuggestionMatch, ElementHandle)> = None;

        for index in 0..settings.max_suggestions {
            let Some(item) = session.find_in(list, &sel.suggestion_at(index)).await? else {
                break;
            };
            let Some(label) = self.read_child(session, item, &sel.suggestion_type).await? else {
                continue;
            };
            if !label.trim().eq_ignore_ascii_case(&settings.artist_label) {
                continue;
            }
            let Some(candidate) = self.read_child(session, item, &sel.suggestion_name).await? else {
                continue;
            };

            let score = similarity(name, &candidate);
            debug!("{name}: suggestion {index} '{candidate}' = {score:.3}");
            let better = best.as_ref().map_or(score > 0.0, |(b, _)| score > b.similarity);
            if better {
                best = Some((
                    SuggestionMatch {
                        index,
                        name: candidate,
                        similarity: score,
                    },
                    item,
                ));
            }
        }

        Ok(best)
    }

    async fn read_child(
        &self,
        session: &mut BrowserSession,
        parent: ElementHandle,
        locator: &crate::browser::Locator,
    ) -> Result<Option<String>, SessionError> {
        match session.find_in(parent, locator).await? {
            Some(el) => Ok(Some(session.read_text(el).await?)),
            None => Ok(None),
        }
    }

    /// Resolve a possibly relative link against the site base URL.
    fn absolute(&self, href: &str) -> Option<String> {
        let base = Url::parse(&self.config.site.base_url).ok()?;
        base.join(href.trim()).ok().map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_url() {
        let config = FameConfig::default();
        let r = ProfileResolver::new(&config);
        assert_eq!(
            r.direct_url("Frida Kahló"),
            "https://www.artsy.net/artist/frida-kahlo"
        );
        assert_eq!(r.search_url(), "https://www.artsy.net/artists/");
    }

    #[test]
    fn test_direct_url_custom_site() {
        let mut config = FameConfig::default();
        config.site.base_url = "http://localhost:8080/".to_string();
        config.site.profile_path = "profiles".to_string();
        let r = ProfileResolver::new(&config);
        assert_eq!(
            r.direct_url("Yayoi  Kusama"),
            "http://localhost:8080/profiles/yayoi-kusama"
        );
    }

    #[test]
    fn test_absolute_links() {
        let config = FameConfig::default();
        let r = ProfileResolver::new(&config);
        assert_eq!(
            r.absolute("/artist/yayoi-kusama").as_deref(),
            Some("https://www.artsy.net/artist/yayoi-kusama")
        );
        assert_eq!(
            r.absolute("https://other.example/artist/x").as_deref(),
            Some("https://other.example/artist/x")
        );
    }

    #[test]
    fn test_strategy_order() {
        assert_eq!(
            Strategy::ORDER.map(Strategy::name),
            ["direct_guess", "search_fallback"]
        );
    }
}
