//! Runtime configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes. Load order: defaults, then `--config` or `$FAME_HOME/config.json`,
//! then `FAME_*` environment overrides. CLI flags are applied last by the
//! binary.

use crate::browser::platform::{BrowserKind, PlatformRule};
use crate::browser::wait::PollPolicy;
use crate::browser::Locator;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FameConfig {
    pub browser: BrowserSettings,
    pub site: SiteSettings,
    pub resolver: ResolverSettings,
    pub extractor: ExtractorSettings,
    pub batch: BatchSettings,
}

/// Browser launch and platform matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Requested platform name, fuzzy-matched against `platforms`.
    pub platform: String,
    /// Explicit browser executable. Searched on PATH when unset.
    pub executable: Option<PathBuf>,
    /// Pass `--no-sandbox` and `--disable-dev-shm-usage`.
    pub no_sandbox: bool,
    pub headless: bool,
    /// Page-load timeout for navigation.
    pub page_timeout_ms: u64,
    /// Candidate platforms in match order.
    pub platforms: Vec<PlatformRule>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            platform: "chrome".to_string(),
            executable: None,
            no_sandbox: true,
            headless: true,
            page_timeout_ms: 10_000,
            platforms: vec![
                PlatformRule::new(BrowserKind::Chrome, "chrome", 0.6),
                PlatformRule::new(BrowserKind::Firefox, "firefox", 0.6),
                // longer reference name, so a looser threshold
                PlatformRule::new(BrowserKind::Edge, "microsoft edge", 0.4),
            ],
        }
    }
}

impl BrowserSettings {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }
}

/// Target site URLs and markup selectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub base_url: String,
    /// Path prefix for profile pages; the slug is appended.
    pub profile_path: String,
    /// Path of the page hosting the search widget.
    pub search_path: String,
    pub selectors: Selectors,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.artsy.net".to_string(),
            profile_path: "/artist/".to_string(),
            search_path: "/artists/".to_string(),
            selectors: Selectors::default(),
        }
    }
}

/// CSS selectors for the site's markup.
///
/// `suggestion_item` contains an `{index}` placeholder for the suggestion
/// position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub not_found: Locator,
    pub no_biography: Locator,
    pub read_more: Locator,
    pub biography: Locator,
    pub search_input: Locator,
    pub suggestion_list: Locator,
    pub suggestion_item: String,
    pub suggestion_type: Locator,
    pub suggestion_name: Locator,
    pub suggestion_link: Locator,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            not_found: Locator::css("div.Box-sc-15se88d-0.Text-sc-18gcpao-0.bTXFzS"),
            no_biography: Locator::css("div.Box-sc-15se88d-0.Text-sc-18gcpao-0.bTXFzS"),
            read_more: Locator::css("button.Clickable-sc-10cr82y-0.dgMPBb"),
            biography: Locator::css("div.ReadMore__Container-sc-1bqy0ya-0.hSZzlP"),
            search_input: Locator::css("input.Input__StyledInput-bysdh7-0.gFWniP"),
            suggestion_list: Locator::css("ul.react-autosuggest__suggestions-list"),
            suggestion_item: "li[data-suggestion-index='{index}']".to_string(),
            suggestion_type: Locator::css("div.Box-sc-15se88d-0.Text-sc-18gcpao-0.caIGcn.wvERG"),
            suggestion_name: Locator::css("div.Box-sc-15se88d-0.Text-sc-18gcpao-0.dYxhVR"),
            suggestion_link: Locator::css("a.RouterLink__RouterAwareLink-sc-1nwbtp5-0"),
        }
    }
}

impl Selectors {
    /// Selector for the suggestion at `index`.
    pub fn suggestion_at(&self, index: usize) -> Locator {
        Locator::css(self.suggestion_item.replace("{index}", &index.to_string()))
    }
}

/// Search-fallback tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Minimum name similarity for a suggestion to be accepted.
    pub match_threshold: f64,
    /// Suggestion type label that marks an artist entry.
    pub artist_label: String,
    /// Upper bound on suggestions inspected per search.
    pub max_suggestions: usize,
    /// Wait for the suggestion list to render.
    pub suggestion_wait: PollPolicy,
    /// Wait for the profile page to settle after a direct guess.
    pub page_wait: PollPolicy,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            match_threshold: 0.6,
            artist_label: "artist".to_string(),
            max_suggestions: 50,
            suggestion_wait: PollPolicy::new(5_000, 100, 1_000),
            page_wait: PollPolicy::new(10_000, 100, 1_000),
        }
    }
}

/// Biography extraction tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorSettings {
    /// Wait for the biography-or-indicator state after navigation.
    pub page_wait: PollPolicy,
    /// Wait for the expanded biography after clicking "read more".
    pub expand_wait: PollPolicy,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            page_wait: PollPolicy::new(10_000, 100, 1_000),
            expand_wait: PollPolicy::new(3_000, 50, 500),
        }
    }
}

/// Batch run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Column holding entity names.
    pub entity_column: String,
    /// Name of the inserted score column.
    pub fame_column: String,
    /// Concurrent browser sessions. 1 runs sequentially on one session.
    pub workers: usize,
    pub unresolved_log: PathBuf,
    pub output: PathBuf,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            entity_column: "artist".to_string(),
            fame_column: "fame".to_string(),
            workers: 1,
            unresolved_log: PathBuf::from("unavailable_artists.txt"),
            output: PathBuf::from("artist_fame.csv"),
        }
    }
}

/// Fame home directory (`$FAME_HOME`, default `~/.fame`).
pub fn fame_home() -> PathBuf {
    if let Ok(p) = std::env::var("FAME_HOME") {
        return PathBuf::from(p);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".fame")
}

impl FameConfig {
    /// Load configuration from an explicit file, or the default location if
    /// it exists, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = fame_home().join("config.json");
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply `FAME_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(p) = lookup("FAME_BROWSER_PATH") {
            self.browser.executable = Some(PathBuf::from(p));
        }
        if let Some(p) = lookup("FAME_PLATFORM") {
            self.browser.platform = p;
        }
        if let Some(v) = lookup("FAME_NO_SANDBOX") {
            self.browser.no_sandbox = parse_bool("FAME_NO_SANDBOX", &v)?;
        }
        if let Some(v) = lookup("FAME_WORKERS") {
            self.batch.workers = v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "FAME_WORKERS".to_string(),
                value: v.clone(),
            })?;
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let c = FameConfig::default();
        assert_eq!(c.browser.platform, "chrome");
        assert_eq!(c.browser.platforms.len(), 3);
        assert_eq!(c.resolver.match_threshold, 0.6);
        assert_eq!(c.batch.entity_column, "artist");
        assert_eq!(c.batch.workers, 1);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{ "resolver": {{ "match_threshold": 0.8 }}, "batch": {{ "workers": 3 }} }}"#
        )
        .unwrap();
        let c = FameConfig::from_file(f.path()).unwrap();
        assert_eq!(c.resolver.match_threshold, 0.8);
        assert_eq!(c.resolver.artist_label, "artist");
        assert_eq!(c.batch.workers, 3);
        assert_eq!(c.site.base_url, "https://www.artsy.net");
    }

    #[test]
    fn test_invalid_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();
        assert!(matches!(
            FameConfig::from_file(f.path()),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            FameConfig::from_file(Path::new("/nonexistent/fame.json")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("FAME_BROWSER_PATH", "/opt/chrome/chrome"),
            ("FAME_PLATFORM", "edge"),
            ("FAME_NO_SANDBOX", "false"),
            ("FAME_WORKERS", "4"),
        ]
        .into_iter()
        .collect();
        let mut c = FameConfig::default();
        c.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(c.browser.executable, Some(PathBuf::from("/opt/chrome/chrome")));
        assert_eq!(c.browser.platform, "edge");
        assert!(!c.browser.no_sandbox);
        assert_eq!(c.batch.workers, 4);

        let err = c
            .apply_env(|k| (k == "FAME_NO_SANDBOX").then(|| "maybe".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_suggestion_selector() {
        let s = Selectors::default();
        assert_eq!(
            s.suggestion_at(3).as_str(),
            "li[data-suggestion-index='3']"
        );
    }
}
