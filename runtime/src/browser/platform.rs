//! Map a free-form platform name to a supported browser.

use crate::text::similarity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Browsers the session manager knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    Chrome,
    Firefox,
    Edge,
}

impl BrowserKind {
    /// Executable names searched on PATH, most specific first.
    pub fn executable_names(self) -> &'static [&'static str] {
        match self {
            Self::Chrome => &[
                "google-chrome",
                "google-chrome-stable",
                "chromium",
                "chromium-browser",
                "chrome",
            ],
            Self::Firefox => &["firefox"],
            Self::Edge => &["microsoft-edge", "microsoft-edge-stable", "msedge"],
        }
    }

    /// Whether the browser speaks the Chrome DevTools Protocol.
    pub fn is_chromium_family(self) -> bool {
        matches!(self, Self::Chrome | Self::Edge)
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Edge => "edge",
        };
        f.write_str(name)
    }
}

/// A reference name and the similarity a requested name must reach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformRule {
    pub kind: BrowserKind,
    pub reference: String,
    pub threshold: f64,
}

impl PlatformRule {
    pub fn new(kind: BrowserKind, reference: &str, threshold: f64) -> Self {
        Self {
            kind,
            reference: reference.to_string(),
            threshold,
        }
    }
}

/// First rule (in order) whose reference name is similar enough to
/// `requested`.
pub fn match_platform(requested: &str, rules: &[PlatformRule]) -> Option<BrowserKind> {
    rules
        .iter()
        .find(|r| similarity(requested, &r.reference) >= r.threshold)
        .map(|r| r.kind)
}
